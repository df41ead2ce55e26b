// src/core/services/verification.rs
use std::sync::Arc;
use tracing::{error, info};

use crate::core::comparator::{Comparison, FaceComparator};
use crate::core::staging::StagingArea;
use crate::utils::error::Result;

/// One uploaded image as received from the endpoint, alive for a single
/// request only.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub filename: String,
    pub bytes: Vec<u8>,
}

pub struct VerificationService {
    staging: StagingArea,
    comparator: Arc<dyn FaceComparator>,
}

impl VerificationService {
    pub fn new(staging: StagingArea, comparator: Arc<dyn FaceComparator>) -> Self {
        Self { staging, comparator }
    }

    /// Stages both uploads, runs the comparison, and releases the staged
    /// files when the guards drop — on the failure paths as well as on
    /// success.
    pub async fn verify(&self, id_card: UploadedImage, selfie: UploadedImage) -> Result<Comparison> {
        let staged_id_card = self.staging.stage(&id_card.filename, &id_card.bytes).await?;
        let staged_selfie = self.staging.stage(&selfie.filename, &selfie.bytes).await?;

        let outcome = self
            .comparator
            .compare(staged_id_card.path(), staged_selfie.path())
            .await;

        match &outcome {
            Ok(comparison) => {
                info!(
                    verified = comparison.verified,
                    distance = ?comparison.distance,
                    threshold = ?comparison.threshold,
                    "Verification completed"
                );
            }
            Err(e) => error!("Verification failed: {}", e),
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::comparator::MockFaceComparator;
    use crate::utils::config::StagingConfig;
    use crate::utils::error::ServiceError;

    fn upload(name: &str) -> UploadedImage {
        UploadedImage {
            filename: name.to_string(),
            bytes: vec![0xFF, 0xD8, 0xFF, 0xE0],
        }
    }

    async fn service_with(
        dir: &std::path::Path,
        comparator: MockFaceComparator,
    ) -> VerificationService {
        let staging = StagingArea::new(&StagingConfig {
            directory: dir.to_string_lossy().into_owned(),
            max_upload_bytes: 1024,
        })
        .await
        .unwrap();

        VerificationService::new(staging, Arc::new(comparator))
    }

    fn staged_file_count(dir: &std::path::Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[test_log::test(tokio::test)]
    async fn returns_comparison_and_cleans_up() {
        let tmp = tempfile::tempdir().unwrap();

        let mut comparator = MockFaceComparator::new();
        comparator.expect_compare().times(1).returning(|reference, probe| {
            // Both staged files must exist while the comparator runs.
            assert!(reference.exists());
            assert!(probe.exists());
            Ok(Comparison {
                verified: true,
                distance: Some(0.34),
                threshold: Some(0.68),
            })
        });

        let service = service_with(tmp.path(), comparator).await;
        let comparison = service.verify(upload("id.jpg"), upload("selfie.jpg")).await.unwrap();

        assert!(comparison.verified);
        assert_eq!(comparison.similarity(), Some(50.0));
        assert_eq!(staged_file_count(tmp.path()), 0);
    }

    #[test_log::test(tokio::test)]
    async fn cleans_up_when_comparator_fails() {
        let tmp = tempfile::tempdir().unwrap();

        let mut comparator = MockFaceComparator::new();
        comparator
            .expect_compare()
            .times(1)
            .returning(|_, _| Err(ServiceError::NoFaceDetected("Face could not be detected.".into())));

        let service = service_with(tmp.path(), comparator).await;
        let error = service
            .verify(upload("id.jpg"), upload("selfie.jpg"))
            .await
            .unwrap_err();

        assert!(matches!(error, ServiceError::NoFaceDetected(_)));
        assert_eq!(staged_file_count(tmp.path()), 0);
    }
}
