//! Generation orchestration - coordinates the generation workflow

use serde_json::json;
use std::sync::Arc;

use crate::core::config::GeneratorConfig;
use crate::generation::apis::ApiEmitter;
use crate::generation::models::ModelEmitter;
use crate::generation::ordering::{DeclarationOrdering, InsertBeforeFirstMention};
use crate::generation::type_mapper::TypeMapper;
use crate::generation::{
    ApiSchema, Artifact, GenerationContext, GenerationError, GenerationResult, GenerationSummary,
    ModuleKind, ModuleRenderer, RenderContext,
};

/// Orchestrates the code generation workflow
pub struct GenerationOrchestrator {
    renderer: Arc<dyn ModuleRenderer>,
    ordering: Arc<dyn DeclarationOrdering>,
}

impl GenerationOrchestrator {
    /// Create an orchestrator using the default class ordering
    pub fn new(renderer: Arc<dyn ModuleRenderer>) -> Self {
        Self {
            renderer,
            ordering: Arc::new(InsertBeforeFirstMention),
        }
    }

    /// Replace the class ordering policy
    pub fn with_ordering(mut self, ordering: Arc<dyn DeclarationOrdering>) -> Self {
        self.ordering = ordering;
        self
    }

    /// Execute the generation workflow.
    ///
    /// Models are emitted first because the API emitter reads the generic
    /// registry they fill.
    pub fn generate(
        &self,
        schema: &ApiSchema,
        config: &GeneratorConfig,
    ) -> Result<GenerationResult, GenerationError> {
        // 1. Validate configuration
        let mut context = GenerationContext::new(config.clone());
        context.validate()?;

        tracing::debug!(
            "Orchestrator starting generation with {} schemas and {} operations",
            schema.schemas.len(),
            schema.operations.len()
        );

        // 2. Emit models and enums, filling the registry
        let mapper = TypeMapper::new(config.models_module.as_str());
        let emission = ModelEmitter::new(&mapper, self.ordering.as_ref(), &config.enum_holder)
            .emit(
                &schema.schemas,
                &mut context.registry,
                &mut context.diagnostics,
            );

        // 3. Emit API functions against the finished registry
        let apis = ApiEmitter::new(&mapper, &context.registry)
            .emit(&schema.operations, &mut context.diagnostics);

        let summary = GenerationSummary {
            models: emission.models.classes.len(),
            generic_models: context.registry.len(),
            enums: emission.enums.enums.len(),
            functions: apis.functions.len(),
        };

        // 4. Render every module
        let mut artifacts = Vec::with_capacity(ModuleKind::all().len());
        for kind in ModuleKind::all() {
            let mut render_context = base_render_context(config);
            match kind {
                ModuleKind::Models => {
                    render_context
                        .add_serialized("type_params", &emission.models.type_params())?;
                    render_context.add_serialized("classes", &emission.models.classes)?;
                }
                ModuleKind::Enums => render_context.add_serialized("enums", &emission.enums.enums)?,
                ModuleKind::Apis => render_context.add_serialized("functions", &apis.functions)?,
                ModuleKind::Session => {}
            }

            let content = self.renderer.render(*kind, &render_context)?;
            artifacts.push(Artifact {
                path: config.module_path(module_name(config, *kind)),
                content,
                policy: kind.write_policy(),
            });
        }

        tracing::info!(
            models = summary.models,
            enums = summary.enums,
            functions = summary.functions,
            diagnostics = context.diagnostics.len(),
            "Generation finished"
        );

        Ok(GenerationResult {
            artifacts,
            diagnostics: context.diagnostics.into_vec(),
            summary,
        })
    }
}

fn module_name(config: &GeneratorConfig, kind: ModuleKind) -> &str {
    match kind {
        ModuleKind::Models => &config.models_module,
        ModuleKind::Enums => &config.enums_module,
        ModuleKind::Apis => &config.apis_module,
        ModuleKind::Session => &config.session_module,
    }
}

fn base_render_context(config: &GeneratorConfig) -> RenderContext {
    let mut context = RenderContext::new();
    context.add_variable("models_module", json!(config.models_module));
    context.add_variable("enums_module", json!(config.enums_module));
    context.add_variable("session_module", json!(config.session_module));
    context.add_variable("base_url", json!(config.base_url));
    context
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::diagnostics::DiagnosticKind;
    use crate::generation::ir::ClassDecl;
    use crate::generation::{HttpMethod, OperationSpec, PropertySpec, WritePolicy};
    use serde_json::json;
    use std::path::PathBuf;
    use tracing_test::traced_test;

    /// Renders the module kind followed by the JSON of its main variable
    struct EchoRenderer;

    impl ModuleRenderer for EchoRenderer {
        fn render(
            &self,
            kind: ModuleKind,
            context: &RenderContext,
        ) -> Result<String, GenerationError> {
            let key = match kind {
                ModuleKind::Models => "classes",
                ModuleKind::Enums => "enums",
                ModuleKind::Apis => "functions",
                ModuleKind::Session => "base_url",
            };
            Ok(format!("{kind}:{}", context.variables[key]))
        }
    }

    /// Appends every class, ignoring references
    struct AppendOnly;

    impl DeclarationOrdering for AppendOnly {
        fn place(&self, declared: &mut Vec<ClassDecl>, class: ClassDecl) {
            declared.push(class);
        }
    }

    fn schema() -> ApiSchema {
        let schemas = serde_json::from_value(json!({
            "Order": {
                "properties": {
                    "buyer": { "$ref": "#/components/schemas/User" }
                }
            },
            "User": { "properties": { "id": { "type": "integer" } } },
            "Page«List«User»»": {
                "properties": {
                    "records": {
                        "type": "array",
                        "items": { "$ref": "#/components/schemas/User" }
                    }
                }
            },
            "AllEnumsInfo": {
                "properties": { "role": { "enum": ["ADMIN", "GUEST"] } }
            }
        }))
        .unwrap();

        let mut list_users = OperationSpec::new("/users", HttpMethod::Get);
        list_users.operation_id = Some("list_users".to_string());
        list_users.response_schema = Some(PropertySpec::reference(
            "#/components/schemas/Page«List«User»»",
        ));

        ApiSchema {
            schemas,
            operations: vec![list_users, OperationSpec::new("/health", HttpMethod::Get)],
        }
    }

    #[test]
    fn test_generate_produces_every_module() {
        let orchestrator = GenerationOrchestrator::new(Arc::new(EchoRenderer));
        let config = GeneratorConfig {
            output_dir: PathBuf::from("client"),
            ..Default::default()
        };

        let result = orchestrator.generate(&schema(), &config).unwrap();

        let paths: Vec<_> = result.artifacts.iter().map(|a| a.path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("client/models.py"),
                PathBuf::from("client/enums.py"),
                PathBuf::from("client/apis.py"),
                PathBuf::from("client/request_session.py"),
            ]
        );
        assert_eq!(result.artifacts[3].policy, WritePolicy::CreateOnly);
        assert_eq!(result.artifacts[0].policy, WritePolicy::Overwrite);
        assert!(result.artifacts[2].content.contains("models.Page[models.User]"));

        assert_eq!(
            result.summary,
            GenerationSummary {
                models: 3,
                generic_models: 1,
                enums: 1,
                functions: 2,
            }
        );

        // Only the synthesized name for `/health` is reported
        assert_eq!(result.diagnostics.len(), 1);
        assert!(matches!(
            result.diagnostics[0].kind,
            DiagnosticKind::SynthesizedOperationId { .. }
        ));
    }

    #[test]
    fn test_default_ordering_declares_references_first() {
        let orchestrator = GenerationOrchestrator::new(Arc::new(EchoRenderer));
        let result = orchestrator
            .generate(&schema(), &GeneratorConfig::default())
            .unwrap();

        let models = &result.artifacts[0].content;
        let user = models.find("\"name\":\"User\"").unwrap();
        let order = models.find("\"name\":\"Order\"").unwrap();
        assert!(user < order);
    }

    #[test]
    fn test_custom_ordering_is_used() {
        let orchestrator =
            GenerationOrchestrator::new(Arc::new(EchoRenderer)).with_ordering(Arc::new(AppendOnly));
        let result = orchestrator
            .generate(&schema(), &GeneratorConfig::default())
            .unwrap();

        let models = &result.artifacts[0].content;
        let user = models.find("\"name\":\"User\"").unwrap();
        let order = models.find("\"name\":\"Order\"").unwrap();
        assert!(order < user);
    }

    #[test]
    #[traced_test]
    fn test_generation_logs_summary() {
        let orchestrator = GenerationOrchestrator::new(Arc::new(EchoRenderer));
        orchestrator
            .generate(&schema(), &GeneratorConfig::default())
            .unwrap();

        assert!(logs_contain("Generation finished"));
        assert!(logs_contain("functions=2"));
    }

    #[test]
    fn test_invalid_config_aborts() {
        let orchestrator = GenerationOrchestrator::new(Arc::new(EchoRenderer));
        let config = GeneratorConfig {
            apis_module: "models".to_string(),
            ..Default::default()
        };

        let result = orchestrator.generate(&schema(), &config);
        assert!(matches!(result, Err(GenerationError::InvalidConfiguration(_))));
    }
}
