//! Use case for generating a Python client

use std::sync::Arc;

use crate::application::{
    ApplicationError, GenerateClientRequest, GenerateClientResponse, OutputService,
};
use crate::generation::{GenerationOrchestrator, SchemaLoader};

/// Loads a schema, generates the client modules and writes them out
pub struct GenerateClientUseCase {
    schema_loader: Arc<dyn SchemaLoader>,
    generation_orchestrator: Arc<GenerationOrchestrator>,
    output_service: Arc<dyn OutputService>,
}

impl GenerateClientUseCase {
    pub fn new(
        schema_loader: Arc<dyn SchemaLoader>,
        generation_orchestrator: Arc<GenerationOrchestrator>,
        output_service: Arc<dyn OutputService>,
    ) -> Self {
        Self {
            schema_loader,
            generation_orchestrator,
            output_service,
        }
    }

    pub async fn execute(
        &self,
        request: GenerateClientRequest,
    ) -> Result<GenerateClientResponse, ApplicationError> {
        // 1. Validate request
        request.validate()?;

        // 2. Load the schema document
        tracing::info!(source = %request.schema_source, "Loading schema");
        let schema = self.schema_loader.load(&request.schema_source).await?;

        // 3. Generate code
        let result = self
            .generation_orchestrator
            .generate(&schema, &request.config)?;

        // 4. Strict mode refuses to write anything degraded
        if request.config.strict && !result.diagnostics.is_empty() {
            for diagnostic in &result.diagnostics {
                tracing::error!("{diagnostic}");
            }
            return Err(ApplicationError::StrictModeViolation(
                result.diagnostics.len(),
            ));
        }

        // 5. Ensure output directory exists and write
        self.output_service
            .ensure_directory(&request.config.output_dir)
            .await?;
        let written = self.output_service.write_artifacts(&result.artifacts).await?;

        Ok(GenerateClientResponse {
            output_path: request.config.output_dir,
            written: written.written,
            skipped: written.skipped,
            diagnostics: result.diagnostics,
            summary: result.summary,
        })
    }
}
