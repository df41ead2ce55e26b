// src/utils/error.rs
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Initialization error: {0}")]
    Init(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Staging error: {0}")]
    Staging(String),

    #[error("Detection error: {0}")]
    NoFaceDetected(String),

    #[error("Verifier error: {0}")]
    Verifier(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Stable identifier callers can branch on, independent of the message text.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::Config(_) => "config",
            ServiceError::Init(_) => "init",
            ServiceError::Validation(_) => "validation",
            ServiceError::Staging(_) => "staging",
            ServiceError::NoFaceDetected(_) => "no_face_detected",
            ServiceError::Verifier(_) => "verifier",
            ServiceError::Internal(_) => "internal",
        }
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
