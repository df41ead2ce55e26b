// src/core/comparator/mod.rs
pub mod deepface;

use async_trait::async_trait;
use std::path::Path;

use crate::utils::error::Result;

pub use deepface::DeepFaceClient;

/// Outcome of comparing two face images.
///
/// `distance` and `threshold` come straight from the verifier; either may be
/// absent when the verifier does not report them.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub verified: bool,
    pub distance: Option<f64>,
    pub threshold: Option<f64>,
}

impl Comparison {
    /// Percentage similarity derived from the distance/threshold pair,
    /// rounded to two decimals. A distance beyond the threshold clamps to
    /// 0.0 rather than going negative.
    pub fn similarity(&self) -> Option<f64> {
        match (self.distance, self.threshold) {
            (Some(distance), Some(threshold)) => {
                let raw = (1.0 - distance / threshold).max(0.0) * 100.0;
                Some((raw * 100.0).round() / 100.0)
            }
            _ => None,
        }
    }
}

/// Capability that decides whether two images show the same face.
///
/// The production implementation talks to an external verification service;
/// tests substitute a mock so the endpoint can be exercised without one.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FaceComparator: Send + Sync {
    async fn compare(&self, reference: &Path, probe: &Path) -> Result<Comparison>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comparison(distance: Option<f64>, threshold: Option<f64>) -> Comparison {
        Comparison {
            verified: false,
            distance,
            threshold,
        }
    }

    #[test]
    fn similarity_is_percentage_of_threshold_margin() {
        let similarity = comparison(Some(0.17), Some(0.68)).similarity().unwrap();
        assert_eq!(similarity, 75.0);
    }

    #[test]
    fn similarity_rounds_to_two_decimals() {
        let similarity = comparison(Some(0.2), Some(0.3)).similarity().unwrap();
        assert_eq!(similarity, 33.33);
    }

    #[test]
    fn similarity_clamps_to_zero_beyond_threshold() {
        let similarity = comparison(Some(1.2), Some(0.68)).similarity().unwrap();
        assert_eq!(similarity, 0.0);
    }

    #[test]
    fn similarity_stays_in_range() {
        for distance in [0.0, 0.1, 0.34, 0.68, 2.0] {
            let similarity = comparison(Some(distance), Some(0.68)).similarity().unwrap();
            assert!((0.0..=100.0).contains(&similarity), "similarity {} out of range", similarity);
        }
    }

    #[test]
    fn similarity_is_none_without_both_inputs() {
        assert_eq!(comparison(None, Some(0.68)).similarity(), None);
        assert_eq!(comparison(Some(0.2), None).similarity(), None);
        assert_eq!(comparison(None, None).similarity(), None);
    }
}
