// src/core/staging.rs
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::utils::config::StagingConfig;
use crate::utils::error::{Result, ServiceError};

/// Scoped directory where uploaded images are staged for the duration of a
/// single verification request.
///
/// Collision safety under concurrent requests comes from the UUIDv4 prefix on
/// every staged file; no locking is involved.
pub struct StagingArea {
    root: PathBuf,
}

impl StagingArea {
    /// Creates the staging directory if it does not exist yet.
    pub async fn new(config: &StagingConfig) -> Result<Self> {
        let root = PathBuf::from(&config.directory);
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| ServiceError::Staging(format!("Failed to create staging directory {}: {}", root.display(), e)))?;

        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes `bytes` under a fresh unique name and returns a guard that
    /// removes the file when dropped.
    pub async fn stage(&self, original_name: &str, bytes: &[u8]) -> Result<StagedFile> {
        let file_name = format!("{}_{}", Uuid::new_v4(), sanitize_file_name(original_name));
        let path = self.root.join(file_name);

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| ServiceError::Staging(format!("Failed to write {}: {}", path.display(), e)))?;

        debug!("Staged upload at {}", path.display());
        Ok(StagedFile { path })
    }
}

/// A staged upload, removed from disk on drop regardless of how the request
/// ends.
pub struct StagedFile {
    path: PathBuf,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            warn!("Failed to remove staged file {}: {}", self.path.display(), e);
        }
    }
}

/// Reduces a client-supplied filename to its final path component so that
/// staged files can never escape the staging directory.
fn sanitize_file_name(original: &str) -> String {
    Path::new(original)
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .unwrap_or("upload")
        .to_string()
}
