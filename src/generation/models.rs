//! Model classes from component schemas.
//!
//! A generic schema such as `Page«List«User»»` becomes a single `Page` class
//! bound to a `TypeVar`; the property holding the payload is typed with that
//! parameter and recorded in the [`GenericRegistry`] so responses can be
//! rebuilt later.

use indexmap::IndexMap;

use crate::generation::diagnostics::{DiagnosticKind, Diagnostics};
use crate::generation::enums::EnumEmitter;
use crate::generation::grammar::{is_generic, parse_chain, ref_name, root_class};
use crate::generation::ir::{ClassDecl, EnumsModule, ModelsModule, PropertyDecl};
use crate::generation::ordering::DeclarationOrdering;
use crate::generation::registry::GenericRegistry;
use crate::generation::sanitizers::comment_lines;
use crate::generation::type_mapper::{TypeMapper, TypeResolution};
use crate::generation::utils::is_python_identifier;
use crate::infrastructure::openapi::{ComponentSchema, PropertySpec};

/// Everything emitted from the component schemas
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaEmission {
    pub models: ModelsModule,
    pub enums: EnumsModule,
}

pub struct ModelEmitter<'a> {
    mapper: &'a TypeMapper,
    ordering: &'a dyn DeclarationOrdering,
    enum_holder: &'a str,
    enums: EnumEmitter,
}

impl<'a> ModelEmitter<'a> {
    pub fn new(
        mapper: &'a TypeMapper,
        ordering: &'a dyn DeclarationOrdering,
        enum_holder: &'a str,
    ) -> Self {
        Self {
            mapper,
            ordering,
            enum_holder,
            enums: EnumEmitter::new(),
        }
    }

    /// Walk the schemas once, in document order.
    ///
    /// The enum holder is handed to the [`EnumEmitter`]; a root class that was
    /// already emitted is skipped together with its properties.
    pub fn emit(
        &self,
        schemas: &IndexMap<String, ComponentSchema>,
        registry: &mut GenericRegistry,
        diagnostics: &mut Diagnostics,
    ) -> SchemaEmission {
        let mut emission = SchemaEmission::default();

        for (name, schema) in schemas {
            let root = root_class(name);

            if root == self.enum_holder {
                let module = self.enums.emit(name, schema, diagnostics);
                emission.enums.enums.extend(module.enums);
                continue;
            }

            let already_declared = registry.contains(root)
                || emission.models.classes.iter().any(|class| class.name == root);
            if already_declared {
                tracing::debug!(schema = %name, class = root, "Class already emitted, skipping");
                continue;
            }

            tracing::debug!(schema = %name, "Emitting model");
            let class = self.emit_class(name, schema, registry, diagnostics);
            self.ordering.place(&mut emission.models.classes, class);
        }

        emission
    }

    fn emit_class(
        &self,
        name: &str,
        schema: &ComponentSchema,
        registry: &mut GenericRegistry,
        diagnostics: &mut Diagnostics,
    ) -> ClassDecl {
        let root = root_class(name);
        if !is_python_identifier(root) {
            diagnostics.push(
                name,
                DiagnosticKind::InvalidIdentifier {
                    name: root.to_string(),
                },
            );
        }

        let chain = parse_chain(name);
        let type_param = if is_generic(name) {
            registry.register(root)
        } else {
            None
        };

        let mut properties = Vec::new();
        for (property_name, property) in schema.properties.iter().flatten() {
            let location = format!("{name}.{property_name}");
            if !is_python_identifier(property_name) {
                diagnostics.push(
                    location.clone(),
                    DiagnosticKind::InvalidIdentifier {
                        name: property_name.clone(),
                    },
                );
            }

            let mut annotation = match self.mapper.resolve_property(property, root) {
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
            };

            if let Some(param) = &type_param {
                let open_slot = registry.slot(root).is_none();
                if open_slot && carries_parameter(property, chain.get(1..).unwrap_or_default()) {
                    let sequence = property.is_array();
                    annotation = if sequence {
                        format!("list[{param}]")
                    } else {
                        param.clone()
                    };
                    registry.record_slot(root, property_name, sequence);
                }
            }

            properties.push(PropertyDecl {
                name: property_name.clone(),
                annotation,
                comment_lines: property
                    .description
                    .as_deref()
                    .map(comment_lines)
                    .unwrap_or_default(),
            });
        }

        // Later responses through this class cannot be unwrapped
        if type_param.is_some() && registry.slot(root).is_none() {
            diagnostics.push(
                name,
                DiagnosticKind::UnregisteredGenericSlot {
                    class: root.to_string(),
                },
            );
        }

        ClassDecl {
            name: root.to_string(),
            type_param,
            description: schema.description.clone(),
            properties,
        }
    }
}

/// Whether a property is typed by the generic parameters of its class.
///
/// A referenced type (directly or as array items) must appear as a contiguous
/// run of the parameter tokens; a primitive kind must be one of them.
fn carries_parameter(property: &PropertySpec, parameters: &[String]) -> bool {
    let element = match &property.items {
        Some(items) if property.is_array() => &**items,
        _ => property,
    };

    if let Some(reference) = &element.reference {
        let referenced = parse_chain(ref_name(reference));
        return !referenced.is_empty()
            && parameters
                .windows(referenced.len())
                .any(|window| window == referenced.as_slice());
    }

    element
        .kind
        .as_deref()
        .is_some_and(|kind| parameters.iter().any(|parameter| parameter == kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::ordering::InsertBeforeFirstMention;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn schemas(value: serde_json::Value) -> IndexMap<String, ComponentSchema> {
        serde_json::from_value(value).unwrap()
    }

    fn emit(
        value: serde_json::Value,
    ) -> (SchemaEmission, GenericRegistry, Diagnostics) {
        let mapper = TypeMapper::new("models");
        let ordering = InsertBeforeFirstMention;
        let emitter = ModelEmitter::new(&mapper, &ordering, "AllEnumsInfo");
        let mut registry = GenericRegistry::new();
        let mut diagnostics = Diagnostics::new();
        let emission = emitter.emit(&schemas(value), &mut registry, &mut diagnostics);
        (emission, registry, diagnostics)
    }

    fn annotations(class: &ClassDecl) -> Vec<(&str, &str)> {
        class
            .properties
            .iter()
            .map(|property| (property.name.as_str(), property.annotation.as_str()))
            .collect()
    }

    #[test]
    fn test_plain_model() {
        let (emission, registry, diagnostics) = emit(json!({
            "User": {
                "description": "A registered user",
                "properties": {
                    "id": { "type": "integer", "description": "Primary key" },
                    "name": { "type": "string" },
                    "score": { "type": "number" },
                    "tags": { "type": "array", "items": { "type": "string" } }
                }
            }
        }));

        assert!(registry.is_empty());
        assert!(diagnostics.is_empty());
        let user = &emission.models.classes[0];
        assert_eq!(user.name, "User");
        assert_eq!(user.type_param, None);
        assert_eq!(user.description.as_deref(), Some("A registered user"));
        assert_eq!(
            annotations(user),
            vec![("id", "int"), ("name", "str"), ("score", "float"), ("tags", "list[str]")]
        );
        assert_eq!(user.properties[0].comment_lines, vec!["Primary key"]);
    }

    #[test]
    fn test_generic_sequence_slot() {
        let (emission, registry, _) = emit(json!({
            "Page«List«User»»": {
                "properties": {
                    "total": { "type": "integer" },
                    "records": {
                        "type": "array",
                        "items": { "$ref": "#/components/schemas/User" }
                    }
                }
            },
            "User": { "properties": { "id": { "type": "integer" } } }
        }));

        let page = emission
            .models
            .classes
            .iter()
            .find(|class| class.name == "Page")
            .unwrap();
        assert_eq!(page.type_param.as_deref(), Some("T0"));
        assert_eq!(annotations(page), vec![("total", "int"), ("records", "list[T0]")]);

        let slot = registry.slot("Page").unwrap();
        assert_eq!(slot.property, "records");
        assert!(slot.sequence);
    }

    #[test]
    fn test_generic_nested_reference_slot() {
        let (emission, registry, _) = emit(json!({
            "Result«Page«List«User»»»": {
                "properties": {
                    "code": { "type": "integer" },
                    "data": { "$ref": "#/components/schemas/Page«List«User»»" }
                }
            }
        }));

        let result = &emission.models.classes[0];
        assert_eq!(annotations(result), vec![("code", "int"), ("data", "T0")]);
        assert_eq!(registry.slot("Result").unwrap().property, "data");
        assert!(!registry.slot_is_sequence("Result"));
    }

    #[test]
    fn test_primitive_parameter_slot() {
        let (emission, registry, _) = emit(json!({
            "Result«boolean»": {
                "properties": {
                    "code": { "type": "integer" },
                    "data": { "type": "boolean" }
                }
            }
        }));

        assert_eq!(annotations(&emission.models.classes[0])[1], ("data", "T0"));
        assert_eq!(registry.slot("Result").unwrap().property, "data");
    }

    #[test]
    fn test_java_primitive_parameter_leaves_no_slot() {
        let (emission, registry, diagnostics) = emit(json!({
            "Result«int»": {
                "properties": {
                    "code": { "type": "integer" },
                    "data": { "type": "integer" }
                }
            },
            "Result«User»": {
                "properties": { "data": { "$ref": "#/components/schemas/User" } }
            }
        }));

        assert_eq!(
            annotations(&emission.models.classes[0]),
            vec![("code", "int"), ("data", "int")]
        );
        assert!(registry.contains("Result"));
        assert!(registry.slot("Result").is_none());

        let reported: Vec<_> = diagnostics.iter().collect();
        assert_eq!(reported.len(), 1);
        assert_eq!(reported[0].location, "Result«int»");
        assert_eq!(
            reported[0].kind,
            DiagnosticKind::UnregisteredGenericSlot {
                class: "Result".to_string()
            }
        );
    }

    #[test]
    fn test_first_matching_property_wins() {
        let (emission, registry, _) = emit(json!({
            "Pair«User»": {
                "properties": {
                    "left": { "$ref": "#/components/schemas/User" },
                    "right": { "$ref": "#/components/schemas/User" }
                }
            }
        }));

        let pair = &emission.models.classes[0];
        assert_eq!(annotations(pair), vec![("left", "T0"), ("right", "User")]);
        assert_eq!(registry.slot("Pair").unwrap().property, "left");
    }

    #[test]
    fn test_second_instantiation_is_skipped() {
        let (emission, registry, _) = emit(json!({
            "Result«User»": {
                "properties": { "data": { "$ref": "#/components/schemas/User" } }
            },
            "Result«Order»": {
                "properties": {
                    "data": { "$ref": "#/components/schemas/Order" },
                    "extra": { "type": "string" }
                }
            }
        }));

        assert_eq!(emission.models.classes.len(), 1);
        assert_eq!(emission.models.classes[0].properties.len(), 1);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("Result").unwrap().type_param, "T0");
    }

    #[test]
    fn test_type_params_follow_document_order() {
        let (emission, registry, _) = emit(json!({
            "Result«User»": {
                "properties": { "data": { "$ref": "#/components/schemas/User" } }
            },
            "Page«User»": {
                "properties": { "records": { "$ref": "#/components/schemas/User" } }
            }
        }));

        assert_eq!(registry.get("Result").unwrap().type_param, "T0");
        assert_eq!(registry.get("Page").unwrap().type_param, "T1");
        assert_eq!(emission.models.classes.len(), 2);
    }

    #[test]
    fn test_enum_holder_is_redirected() {
        let (emission, _, _) = emit(json!({
            "AllEnumsInfo": {
                "properties": {
                    "status": { "enum": ["ACTIVE", "DISABLED"], "example": "UserStatus" }
                }
            },
            "User": { "properties": { "id": { "type": "integer" } } }
        }));

        assert_eq!(emission.models.classes.len(), 1);
        assert_eq!(emission.enums.enums.len(), 1);
        assert_eq!(emission.enums.enums[0].name, "UserStatus");
    }

    #[test]
    fn test_referenced_class_is_declared_first() {
        let (emission, _, _) = emit(json!({
            "Order": {
                "properties": {
                    "items": {
                        "type": "array",
                        "items": { "$ref": "#/components/schemas/LineItem" }
                    }
                }
            },
            "LineItem": { "properties": { "sku": { "type": "string" } } }
        }));

        let names: Vec<_> = emission
            .models
            .classes
            .iter()
            .map(|class| class.name.as_str())
            .collect();
        assert_eq!(names, vec!["LineItem", "Order"]);
    }

    #[test]
    fn test_self_reference_is_quoted() {
        let (emission, _, _) = emit(json!({
            "Node": {
                "properties": {
                    "parent": { "$ref": "#/components/schemas/Node" },
                    "children": {
                        "type": "array",
                        "items": { "$ref": "#/components/schemas/Node" }
                    }
                }
            }
        }));

        assert_eq!(
            annotations(&emission.models.classes[0]),
            vec![("parent", "'Node'"), ("children", "list['Node']")]
        );
    }

    #[test]
    fn test_diagnostics_for_unresolved_and_invalid_names() {
        let (emission, _, diagnostics) = emit(json!({
            "Upload": {
                "properties": {
                    "file": { "type": "file" },
                    "class": { "type": "string" },
                    "meta": {}
                }
            }
        }));

        assert_eq!(
            annotations(&emission.models.classes[0]),
            vec![("file", "Any"), ("class", "str"), ("meta", "Any")]
        );
        let kinds: Vec<_> = diagnostics.iter().map(|d| d.location.as_str()).collect();
        assert_eq!(kinds, vec!["Upload.file", "Upload.class", "Upload.meta"]);
    }

    #[test]
    fn test_schema_without_properties() {
        let (emission, _, diagnostics) = emit(json!({ "Empty": {} }));
        assert!(emission.models.classes[0].properties.is_empty());
        assert!(diagnostics.is_empty());
    }
}
