//! Data Transfer Objects for application layer

use serde::Serialize;
use std::path::PathBuf;
use url::Url;

use crate::application::ValidationError;
use crate::core::config::GeneratorConfig;
use crate::generation::{Diagnostic, GenerationSummary};
use crate::infrastructure::openapi::http_loader::is_http_source;

/// Request to generate a Python client from a schema
#[derive(Debug, Clone)]
pub struct GenerateClientRequest {
    /// File path or HTTP(S) URL of the schema document
    pub schema_source: String,
    pub config: GeneratorConfig,
}

impl GenerateClientRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.schema_source.trim().is_empty() {
            return Err(ValidationError::EmptySchemaSource);
        }

        if is_http_source(&self.schema_source) {
            Url::parse(&self.schema_source).map_err(|e| {
                ValidationError::InvalidSchemaUrl(self.schema_source.clone(), e.to_string())
            })?;
        }

        self.config
            .validate()
            .map_err(|e| ValidationError::InvalidConfiguration(e.to_string()))
    }
}

/// Response from client generation
#[derive(Debug, Clone, Serialize)]
pub struct GenerateClientResponse {
    pub output_path: PathBuf,
    pub written: Vec<PathBuf>,
    /// Create-only files that already existed
    pub skipped: Vec<PathBuf>,
    pub diagnostics: Vec<Diagnostic>,
    pub summary: GenerationSummary,
}
