//! Filesystem-based output service implementation

use async_trait::async_trait;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::application::{ApplicationError, OutputService, WriteSummary};
use crate::generation::{Artifact, WritePolicy};

/// Output service that writes artifacts to the filesystem
pub struct FileSystemOutputService;

impl FileSystemOutputService {
    pub fn new() -> Self {
        Self
    }

    async fn write_artifact(&self, artifact: &Artifact) -> Result<(), ApplicationError> {
        // Create parent directory if needed
        if let Some(parent) = artifact.path.parent() {
            self.ensure_directory(parent).await?;
        }

        let mut file = fs::File::create(&artifact.path).await.map_err(|e| {
            ApplicationError::OutputError(format!(
                "Failed to create file {}: {e}",
                artifact.path.display()
            ))
        })?;

        file.write_all(artifact.content.as_bytes())
            .await
            .map_err(|e| {
                ApplicationError::OutputError(format!(
                    "Failed to write file {}: {e}",
                    artifact.path.display()
                ))
            })?;

        file.flush().await.map_err(|e| {
            ApplicationError::OutputError(format!(
                "Failed to flush file {}: {e}",
                artifact.path.display()
            ))
        })
    }
}

impl Default for FileSystemOutputService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OutputService for FileSystemOutputService {
    async fn write_artifacts(
        &self,
        artifacts: &[Artifact],
    ) -> Result<WriteSummary, ApplicationError> {
        let mut summary = WriteSummary::default();

        for artifact in artifacts {
            if artifact.policy == WritePolicy::CreateOnly {
                let exists = fs::try_exists(&artifact.path).await.map_err(|e| {
                    ApplicationError::OutputError(format!(
                        "Failed to check {}: {e}",
                        artifact.path.display()
                    ))
                })?;
                if exists {
                    tracing::debug!(path = %artifact.path.display(), "Keeping existing file");
                    summary.skipped.push(artifact.path.clone());
                    continue;
                }
            }

            self.write_artifact(artifact).await?;
            tracing::debug!(path = %artifact.path.display(), "Wrote file");
            summary.written.push(artifact.path.clone());
        }

        Ok(summary)
    }

    async fn ensure_directory(&self, path: &Path) -> Result<(), ApplicationError> {
        fs::create_dir_all(path).await.map_err(|e| {
            ApplicationError::OutputError(format!(
                "Failed to create directory {}: {e}",
                path.display()
            ))
        })
    }
}
