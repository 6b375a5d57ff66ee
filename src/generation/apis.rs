//! Async API bindings, one per operation.

use std::collections::HashSet;

use crate::generation::diagnostics::{DiagnosticKind, Diagnostics};
use crate::generation::grammar::{inner_class, is_generic, ref_name};
use crate::generation::ir::{ApiFunction, ApiParam, ApisModule, CallPayload, ReturnHandling};
use crate::generation::registry::GenericRegistry;
use crate::generation::type_mapper::{TypeMapper, TypeResolution, map_primitive};
use crate::generation::unwrap::{SkipReason, UnwrapGenerator};
use crate::generation::utils::{is_python_identifier, to_snake_case};
use crate::infrastructure::openapi::{OperationSpec, ParameterSpec, PropertySpec};

/// Argument name used for request bodies
pub const BODY_ARGUMENT: &str = "data";

/// Reads the registry filled by model emission; must run after it.
pub struct ApiEmitter<'a> {
    mapper: &'a TypeMapper,
    registry: &'a GenericRegistry,
}

impl<'a> ApiEmitter<'a> {
    pub fn new(mapper: &'a TypeMapper, registry: &'a GenericRegistry) -> Self {
        Self { mapper, registry }
    }

    pub fn emit(&self, operations: &[OperationSpec], diagnostics: &mut Diagnostics) -> ApisModule {
        let mut module = ApisModule::default();
        let mut names = HashSet::new();

        for operation in operations {
            let function = self.emit_function(operation, diagnostics);
            if !names.insert(function.name.clone()) {
                diagnostics.push(
                    format!("{} {}", operation.method, operation.path),
                    DiagnosticKind::DuplicateFunctionName {
                        name: function.name.clone(),
                    },
                );
            }
            module.functions.push(function);
        }

        module
    }

    fn emit_function(
        &self,
        operation: &OperationSpec,
        diagnostics: &mut Diagnostics,
    ) -> ApiFunction {
        let name = self.function_name(operation, diagnostics);
        tracing::debug!(function = %name, method = %operation.method, path = %operation.path, "Emitting API function");

        let (params, payload) = match &operation.parameters {
            Some(parameters) if !parameters.is_empty() => {
                let params = self.parameters(&name, parameters, diagnostics);
                let keys = params.iter().map(|param| param.name.clone()).collect();
                (params, CallPayload::Json { keys })
            }
            _ => match operation.request_body.as_ref().and_then(|body| body.schema()) {
                Some(schema) => {
                    let annotation = self.argument_annotation(
                        &format!("{name}.{BODY_ARGUMENT}"),
                        Some(schema),
                        diagnostics,
                    );
                    let param = ApiParam {
                        name: BODY_ARGUMENT.to_string(),
                        annotation,
                        required: true,
                    };
                    let serialize = schema.reference.is_some();
                    (vec![param], CallPayload::Body { serialize })
                }
                None => (Vec::new(), CallPayload::None),
            },
        };

        let returns = self.return_handling(&name, operation.response_schema.as_ref(), diagnostics);

        ApiFunction {
            name,
            description: operation.description.clone(),
            http_method: operation.method.as_str().to_string(),
            path: operation.path.clone(),
            params,
            payload,
            returns,
        }
    }

    fn function_name(&self, operation: &OperationSpec, diagnostics: &mut Diagnostics) -> String {
        match &operation.operation_id {
            Some(operation_id) if !operation_id.is_empty() => {
                if !is_python_identifier(operation_id) {
                    diagnostics.push(
                        operation_id.clone(),
                        DiagnosticKind::InvalidIdentifier {
                            name: operation_id.clone(),
                        },
                    );
                }
                operation_id.clone()
            }
            _ => {
                let name = to_snake_case(&format!("{}_{}", operation.method, operation.path));
                diagnostics.push(
                    format!("{} {}", operation.method, operation.path),
                    DiagnosticKind::SynthesizedOperationId { name: name.clone() },
                );
                name
            }
        }
    }

    /// Arguments in declared order; ordering problems are reported, not fixed
    fn parameters(
        &self,
        function: &str,
        parameters: &[ParameterSpec],
        diagnostics: &mut Diagnostics,
    ) -> Vec<ApiParam> {
        let mut seen_optional = false;
        let mut params = Vec::with_capacity(parameters.len());

        for parameter in parameters {
            let location = format!("{function}.{}", parameter.name);
            if !is_python_identifier(&parameter.name) {
                diagnostics.push(
                    location.clone(),
                    DiagnosticKind::InvalidIdentifier {
                        name: parameter.name.clone(),
                    },
                );
            }
            if parameter.required && seen_optional {
                diagnostics.push(
                    location.clone(),
                    DiagnosticKind::RequiredAfterOptional {
                        parameter: parameter.name.clone(),
                    },
                );
            }
            seen_optional |= !parameter.required;

            params.push(ApiParam {
                name: parameter.name.clone(),
                annotation: self.argument_annotation(
                    &location,
                    parameter.schema.as_ref(),
                    diagnostics,
                ),
                required: parameter.required,
            });
        }

        params
    }

    fn argument_annotation(
        &self,
        location: &str,
        schema: Option<&PropertySpec>,
        diagnostics: &mut Diagnostics,
    ) -> String {
        let resolution = match schema {
            Some(schema) => self.mapper.resolve_argument(schema, self.registry),
            None => TypeResolution::Unresolved {
                fallback: crate::generation::type_mapper::FALLBACK_ANNOTATION.to_string(),
                reason: "parameter declares no schema".to_string(),
            },
        };

        match resolution {
            TypeResolution::Resolved(annotation) => annotation,
            TypeResolution::Unresolved { fallback, reason } => {
                diagnostics.push(
                    location,
                    DiagnosticKind::UnresolvedType {
                        reason,
                        fallback: fallback.clone(),
                    },
                );
                fallback
            }
        }
    }

    fn return_handling(
        &self,
        function: &str,
        response: Option<&PropertySpec>,
        diagnostics: &mut Diagnostics,
    ) -> ReturnHandling {
        let Some(reference) = response.and_then(|schema| schema.reference.as_deref()) else {
            return ReturnHandling::Raw;
        };

        let type_ref = ref_name(reference);
        let annotation = self.mapper.format_type(type_ref, self.registry);
        if !is_generic(type_ref) || map_primitive(inner_class(type_ref)).is_some() {
            return ReturnHandling::Parse { annotation };
        }

        let outcome = UnwrapGenerator::new(self.mapper, self.registry).generate(type_ref);
        for skipped in outcome.skipped {
            let kind = match skipped.reason {
                SkipReason::NoGenericSlot => DiagnosticKind::UnregisteredGenericSlot {
                    class: skipped.class,
                },
                SkipReason::NestedSequence => DiagnosticKind::NestedSequence {
                    class: skipped.class,
                },
            };
            diagnostics.push(function, kind);
        }

        if outcome.statements.is_empty() {
            ReturnHandling::Parse { annotation }
        } else {
            ReturnHandling::Unwrap {
                annotation,
                statements: outcome.statements,
            }
        }
    }
}
