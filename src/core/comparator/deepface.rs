// src/core/comparator/deepface.rs
use async_trait::async_trait;
use base64::Engine;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

use super::{Comparison, FaceComparator};
use crate::utils::config::VerifierConfig;
use crate::utils::error::{Result, ServiceError};

/// Client for a DeepFace-compatible verification service.
///
/// The service exposes `POST /verify` taking both images as base64 data URIs
/// together with the embedding model, detector backend and strict-detection
/// flag, and replies with the verdict plus the raw distance/threshold pair.
pub struct DeepFaceClient {
    config: VerifierConfig,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct VerifyRequest<'a> {
    img1_path: String,
    img2_path: String,
    model_name: &'a str,
    detector_backend: &'a str,
    enforce_detection: bool,
}

#[derive(Debug, Deserialize)]
struct VerifyReply {
    verified: bool,
    distance: Option<f64>,
    threshold: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ErrorReply {
    error: String,
}

impl DeepFaceClient {
    pub fn new(config: VerifierConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ServiceError::Init(format!("Failed to build verifier HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn verify_url(&self) -> String {
        format!("{}/verify", self.config.endpoint.trim_end_matches('/'))
    }

    async fn encode_image(path: &Path) -> Result<String> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ServiceError::Staging(format!("Failed to read staged image {}: {}", path.display(), e)))?;

        let mime = match path.extension().and_then(|ext| ext.to_str()) {
            Some("png") | Some("PNG") => "image/png",
            _ => "image/jpeg",
        };

        Ok(format!(
            "data:{};base64,{}",
            mime,
            base64::engine::general_purpose::STANDARD.encode(bytes)
        ))
    }
}

#[async_trait]
impl FaceComparator for DeepFaceClient {
    async fn compare(&self, reference: &Path, probe: &Path) -> Result<Comparison> {
        let request = VerifyRequest {
            img1_path: Self::encode_image(reference).await?,
            img2_path: Self::encode_image(probe).await?,
            model_name: &self.config.model_name,
            detector_backend: &self.config.detector_backend,
            enforce_detection: self.config.enforce_detection,
        };

        debug!(
            model = %self.config.model_name,
            backend = %self.config.detector_backend,
            "Submitting verification to {}",
            self.verify_url()
        );

        let response = self
            .client
            .post(self.verify_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| ServiceError::Verifier(format!("Verification request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            let reply: VerifyReply = response
                .json()
                .await
                .map_err(|e| ServiceError::Verifier(format!("Malformed verifier reply: {}", e)))?;

            Ok(Comparison {
                verified: reply.verified,
                distance: reply.distance,
                threshold: reply.threshold,
            })
        } else {
            let body = response.text().await.unwrap_or_default();
            warn!("Verifier returned {}: {}", status, body);
            Err(classify_failure(status, &body))
        }
    }
}

/// Maps a non-2xx verifier reply onto the error taxonomy. Detection
/// failures arrive as free-text messages, so classification goes by the
/// message body.
fn classify_failure(status: StatusCode, body: &str) -> ServiceError {
    let message = serde_json::from_str::<ErrorReply>(body)
        .map(|reply| reply.error)
        .unwrap_or_else(|_| {
            if body.is_empty() {
                format!("verifier replied with status {}", status)
            } else {
                body.to_string()
            }
        });

    let lowered = message.to_lowercase();
    if lowered.contains("could not be detected") || lowered.contains("no face") {
        ServiceError::NoFaceDetected(message)
    } else {
        ServiceError::Verifier(message)
    }
}
