//! Port interfaces for the application layer

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::application::ApplicationError;
use crate::generation::Artifact;

/// Which artifacts were written and which were left alone
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub written: Vec<PathBuf>,
    /// Create-only artifacts whose file already existed
    pub skipped: Vec<PathBuf>,
}

/// Service for writing generated artifacts to the output destination
#[async_trait]
pub trait OutputService: Send + Sync {
    /// Write all artifacts, honouring each artifact's write policy
    async fn write_artifacts(&self, artifacts: &[Artifact])
    -> Result<WriteSummary, ApplicationError>;

    /// Ensure a directory exists
    async fn ensure_directory(&self, path: &Path) -> Result<(), ApplicationError>;
}
