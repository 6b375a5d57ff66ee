//! File-based schema loader
//!
//! This loader handles only file I/O. The actual parsing is done by the SchemaParser.

use async_trait::async_trait;
use tokio::fs;

use super::parser::{DocumentFormat, SchemaParser};
use crate::generation::{ApiSchema, GenerationError, SchemaLoader};

/// Loads schema documents from local files
pub struct FileSchemaLoader;

impl FileSchemaLoader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileSchemaLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SchemaLoader for FileSchemaLoader {
    async fn load(&self, source: &str) -> Result<ApiSchema, GenerationError> {
        let content = fs::read_to_string(source).await.map_err(|e| {
            GenerationError::LoadError(format!("Failed to read schema file {source}: {e}"))
        })?;

        SchemaParser::from_text(&content, DocumentFormat::from_hint(source))?.parse()
    }
}
