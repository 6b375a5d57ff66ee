//! HTTP-based schema loader

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::parser::{DocumentFormat, SchemaParser};
use crate::generation::{ApiSchema, GenerationError, SchemaLoader};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Loads schema documents from HTTP/HTTPS URLs
pub struct HttpSchemaLoader {
    client: Client,
}

impl HttpSchemaLoader {
    pub fn try_new() -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| GenerationError::LoadError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl SchemaLoader for HttpSchemaLoader {
    async fn load(&self, source: &str) -> Result<ApiSchema, GenerationError> {
        // Only handle HTTP(S) URLs
        if !is_http_source(source) {
            return Err(GenerationError::LoadError(format!(
                "HttpSchemaLoader only handles HTTP(S) URLs, got: {source}"
            )));
        }

        let response = self.client.get(source).send().await.map_err(|e| {
            GenerationError::LoadError(format!("Failed to fetch schema from {source}: {e}"))
        })?;

        // Check status and get content type before consuming response
        let status = response.status();
        if !status.is_success() {
            return Err(GenerationError::LoadError(format!(
                "HTTP {status} when fetching {source}"
            )));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let content = response.text().await.map_err(|e| {
            GenerationError::LoadError(format!("Failed to read response body: {e}"))
        })?;

        // Content type wins over the URL extension
        let format = match DocumentFormat::from_hint(&content_type) {
            DocumentFormat::Unknown => DocumentFormat::from_hint(source),
            known => known,
        };
        SchemaParser::from_text(&content, format)?.parse()
    }
}

/// Whether a schema source should be fetched over HTTP
pub fn is_http_source(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}
