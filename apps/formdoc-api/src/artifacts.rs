//! Artifact generation collaborator
//!
//! The core hands rendered text to a black-box generator and records the
//! handle it returns. Failures surface to the caller unchanged; the core
//! never retries on its own.

use sha2::{Digest, Sha256};
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// Reference to a stored artifact
#[derive(Debug, Clone, serde::Serialize)]
pub struct ArtifactHandle {
    /// Relative URL the artifact is served under
    pub url: String,
    /// Hex SHA-256 of the rendered content
    pub hash: String,
}

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub trait ArtifactGenerator: Send + Sync {
    fn generate(&self, title: &str, text: &str) -> Result<ArtifactHandle, ArtifactError>;
}

/// Writes rendered documents into the artifacts directory, served
/// read-only under `/artifacts`
pub struct FileArtifactGenerator {
    dir: PathBuf,
}

impl FileArtifactGenerator {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ArtifactGenerator for FileArtifactGenerator {
    fn generate(&self, title: &str, text: &str) -> Result<ArtifactHandle, ArtifactError> {
        std::fs::create_dir_all(&self.dir)?;

        let filename = format!("{}-{}.html", sanitize_filename(title), Uuid::new_v4());
        std::fs::write(self.dir.join(&filename), text)?;

        let hash = hex::encode(Sha256::digest(text.as_bytes()));
        tracing::info!("Generated artifact: {}", filename);

        Ok(ArtifactHandle {
            url: format!("/artifacts/{}", filename),
            hash,
        })
    }
}

/// Keep ASCII alphanumerics, collapse everything else to '_'
fn sanitize_filename(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "document".to_string()
    } else {
        cleaned
    }
}
