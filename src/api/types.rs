// src/api/types.rs
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};

use crate::core::comparator::Comparison;
use crate::utils::error::ServiceError;

#[derive(Debug, Serialize, Deserialize)]
pub struct VerificationResponse {
    pub verified: bool,
    pub distance: Option<f64>,
    pub threshold: Option<f64>,
    pub similarity: Option<f64>,
}

impl From<&Comparison> for VerificationResponse {
    fn from(comparison: &Comparison) -> Self {
        Self {
            verified: comparison.verified,
            distance: comparison.distance,
            threshold: comparison.threshold,
            similarity: comparison.similarity(),
        }
    }
}

/// Structured failure body; `kind` is stable, `message` is free text.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub kind: String,
    pub message: String,
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::NoFaceDetected(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::Verifier(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            kind: self.kind().to_string(),
            message: self.to_string(),
        })
    }
}
