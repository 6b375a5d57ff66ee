//! Enum classes from the enum-holder pseudo-schema.
//!
//! Some backends publish all of their enums as the properties of one schema,
//! each with an `enum` value list and, in `example`, the enum's class name.

use serde_json::Value as JsonValue;

use crate::generation::diagnostics::{DiagnosticKind, Diagnostics};
use crate::generation::ir::{EnumDecl, EnumsModule};
use crate::generation::utils::{capitalize_first, is_python_identifier};
use crate::infrastructure::openapi::ComponentSchema;

#[derive(Debug, Clone, Copy, Default)]
pub struct EnumEmitter;

impl EnumEmitter {
    pub fn new() -> Self {
        Self
    }

    /// One enum per property of `holder`, in declaration order
    pub fn emit(
        &self,
        holder_name: &str,
        holder: &ComponentSchema,
        diagnostics: &mut Diagnostics,
    ) -> EnumsModule {
        let mut module = EnumsModule::default();
        let Some(properties) = &holder.properties else {
            return module;
        };

        for (key, property) in properties {
            let name = match &property.example {
                Some(JsonValue::String(example)) if !example.trim().is_empty() => {
                    example.trim().to_string()
                }
                _ => capitalize_first(key),
            };
            let location = format!("{holder_name}.{key}");

            let values = match &property.enum_values {
                Some(values) if !values.is_empty() => values,
                _ => {
                    diagnostics.push(location, DiagnosticKind::MissingEnumValues { name });
                    continue;
                }
            };

            if !is_python_identifier(&name) {
                diagnostics.push(
                    location.clone(),
                    DiagnosticKind::InvalidIdentifier { name: name.clone() },
                );
            }

            let members: Vec<String> = values.iter().map(member_name).collect();
            for member in &members {
                if !is_python_identifier(member) {
                    diagnostics.push(
                        format!("{location}.{member}"),
                        DiagnosticKind::InvalidIdentifier {
                            name: member.clone(),
                        },
                    );
                }
            }

            tracing::debug!(enum_name = %name, members = members.len(), "Emitting enum");
            module.enums.push(EnumDecl {
                name,
                description: property.description.clone(),
                members,
            });
        }

        module
    }
}

fn member_name(value: &JsonValue) -> String {
    match value {
        JsonValue::String(value) => value.clone(),
        other => other.to_string(),
    }
}
