//! Port interfaces for the generation domain

use crate::generation::{GenerationError, ModuleKind, RenderContext};
use crate::infrastructure::openapi::ApiSchema;
use async_trait::async_trait;

/// Loads an API schema document from a path or URL
#[async_trait]
pub trait SchemaLoader: Send + Sync {
    async fn load(&self, source: &str) -> Result<ApiSchema, GenerationError>;
}

/// Turns a module's render context into Python source
pub trait ModuleRenderer: Send + Sync {
    fn render(&self, kind: ModuleKind, context: &RenderContext) -> Result<String, GenerationError>;
}
