//! Composite schema loader that picks a loading strategy per source

use async_trait::async_trait;

use super::http_loader::is_http_source;
use super::{FileSchemaLoader, HttpSchemaLoader};
use crate::generation::{ApiSchema, GenerationError, SchemaLoader};

/// Dispatches URLs to the HTTP loader and everything else to the file loader
pub struct CompositeSchemaLoader {
    http: Box<dyn SchemaLoader>,
    file: Box<dyn SchemaLoader>,
}

impl CompositeSchemaLoader {
    pub fn try_new() -> Result<Self, GenerationError> {
        Ok(Self::with_loaders(
            Box::new(HttpSchemaLoader::try_new()?),
            Box::new(FileSchemaLoader::new()),
        ))
    }

    pub fn with_loaders(http: Box<dyn SchemaLoader>, file: Box<dyn SchemaLoader>) -> Self {
        Self { http, file }
    }
}

#[async_trait]
impl SchemaLoader for CompositeSchemaLoader {
    async fn load(&self, source: &str) -> Result<ApiSchema, GenerationError> {
        tracing::debug!("CompositeSchemaLoader: Loading from source: {source}");

        if is_http_source(source) {
            tracing::debug!("CompositeSchemaLoader: Using HTTP loader");
            self.http.load(source).await
        } else {
            tracing::debug!("CompositeSchemaLoader: Using file loader");
            self.file.load(source).await
        }
    }
}
