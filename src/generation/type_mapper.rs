//! Mapping of schema types onto Python annotations.

use crate::generation::grammar::{self, is_generic, parse_chain, ref_name, root_class};
use crate::generation::registry::GenericRegistry;
use crate::infrastructure::openapi::PropertySpec;

/// Annotation used when a type cannot be determined
pub const FALLBACK_ANNOTATION: &str = "Any";

/// Python name for a schema primitive kind, `None` for anything else.
///
/// ```
/// use clientgen::generation::type_mapper::map_primitive;
///
/// assert_eq!(map_primitive("integer"), Some("int"));
/// assert_eq!(map_primitive("Void"), Some("None"));
/// assert_eq!(map_primitive("User"), None);
/// ```
pub fn map_primitive(kind: &str) -> Option<&'static str> {
    match kind {
        "integer" => Some("int"),
        // `float`, not `int`: JSON numbers may be fractional and an `int`
        // field rejects `1.5`.
        "number" => Some("float"),
        "string" => Some("str"),
        "array" => Some("list"),
        "boolean" => Some("bool"),
        "object" => Some("dict"),
        "Void" | "void" => Some("None"),
        _ => None,
    }
}

/// Outcome of resolving a schema type to an annotation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeResolution {
    Resolved(String),
    /// The type could not be determined; `fallback` is emitted instead
    Unresolved { fallback: String, reason: String },
}

impl TypeResolution {
    fn unresolved(fallback: impl Into<String>, reason: impl Into<String>) -> Self {
        TypeResolution::Unresolved {
            fallback: fallback.into(),
            reason: reason.into(),
        }
    }

    /// The annotation to emit, resolved or not
    pub fn annotation(&self) -> &str {
        match self {
            TypeResolution::Resolved(annotation) => annotation,
            TypeResolution::Unresolved { fallback, .. } => fallback,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, TypeResolution::Resolved(_))
    }

    fn map(self, wrap: impl Fn(&str) -> String) -> Self {
        match self {
            TypeResolution::Resolved(annotation) => TypeResolution::Resolved(wrap(&annotation)),
            TypeResolution::Unresolved { fallback, reason } => TypeResolution::Unresolved {
                fallback: wrap(&fallback),
                reason,
            },
        }
    }
}

/// Builds annotations for the models module and for modules importing it.
#[derive(Debug, Clone)]
pub struct TypeMapper {
    models_module: String,
}

impl TypeMapper {
    pub fn new(models_module: impl Into<String>) -> Self {
        Self {
            models_module: models_module.into(),
        }
    }

    /// `User` as seen from outside the models module
    pub fn qualify(&self, class: &str) -> String {
        format!("{}.{}", self.models_module, class)
    }

    /// A single chain token: a primitive or a qualified model class
    pub fn map_token(&self, token: &str) -> String {
        match map_primitive(token) {
            Some(primitive) => primitive.to_string(),
            None => self.qualify(token),
        }
    }

    /// Qualified annotation for a schema type ref.
    ///
    /// Generic refs become nested parametric types. A `List` marker wraps the
    /// parameter in `list[...]` unless the enclosing class already declares
    /// its payload slot as `list[T]`.
    pub fn format_type(&self, type_ref: &str, registry: &GenericRegistry) -> String {
        if !is_generic(type_ref) {
            return self.map_token(type_ref);
        }

        let chain = parse_chain(type_ref);
        let levels = grammar::levels(&chain);

        let mut annotation: Option<String> = None;
        for (index, level) in levels.iter().enumerate().rev() {
            let mut current = self.map_token(level.class);
            if let Some(parameter) = annotation.take() {
                current = format!("{current}[{parameter}]");
            }

            let mut depth = level.list_depth;
            if depth > 0 && index > 0 && registry.slot_is_sequence(levels[index - 1].class) {
                depth -= 1;
            }
            for _ in 0..depth {
                current = format!("list[{current}]");
            }
            annotation = Some(current);
        }

        annotation.unwrap_or_else(|| self.map_token(type_ref))
    }

    /// Annotation of a property inside the models module.
    ///
    /// References resolve to the bare root class; a reference to `owner` is
    /// quoted as a forward reference.
    pub fn resolve_property(&self, property: &PropertySpec, owner: &str) -> TypeResolution {
        self.resolve(property, &|reference| {
            let class = root_class(ref_name(reference));
            if class == owner {
                format!("'{class}'")
            } else {
                class.to_string()
            }
        })
    }

    /// Annotation of an API argument, qualified with the models module.
    pub fn resolve_argument(
        &self,
        property: &PropertySpec,
        registry: &GenericRegistry,
    ) -> TypeResolution {
        self.resolve(property, &|reference| {
            self.format_type(ref_name(reference), registry)
        })
    }

    fn resolve(
        &self,
        property: &PropertySpec,
        reference_annotation: &dyn Fn(&str) -> String,
    ) -> TypeResolution {
        if let Some(reference) = &property.reference {
            return TypeResolution::Resolved(reference_annotation(reference));
        }

        match property.kind.as_deref() {
            Some("array") => match &property.items {
                Some(items) => self
                    .resolve(items, reference_annotation)
                    .map(|inner| format!("list[{inner}]")),
                None => TypeResolution::Resolved("list".to_string()),
            },
            Some(kind) => match map_primitive(kind) {
                Some(primitive) => TypeResolution::Resolved(primitive.to_string()),
                None => TypeResolution::unresolved(
                    FALLBACK_ANNOTATION,
                    format!("unknown type '{kind}'"),
                ),
            },
            None => TypeResolution::unresolved(FALLBACK_ANNOTATION, "no type or $ref declared"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn mapper() -> TypeMapper {
        TypeMapper::new("models")
    }

    #[test]
    fn test_number_maps_to_float() {
        assert_eq!(map_primitive("number"), Some("float"));
        assert_eq!(
            mapper().resolve_property(&PropertySpec::of_kind("number"), "Price"),
            TypeResolution::Resolved("float".to_string())
        );
    }

    #[test]
    fn test_map_primitive_table() {
        assert_eq!(map_primitive("string"), Some("str"));
        assert_eq!(map_primitive("array"), Some("list"));
        assert_eq!(map_primitive("boolean"), Some("bool"));
        assert_eq!(map_primitive("object"), Some("dict"));
        assert_eq!(map_primitive("void"), Some("None"));
        assert_eq!(map_primitive("List"), None);
    }

    #[test]
    fn test_format_type_non_generic() {
        let registry = GenericRegistry::new();
        assert_eq!(mapper().format_type("User", &registry), "models.User");
        assert_eq!(mapper().format_type("string", &registry), "str");
    }

    #[test]
    fn test_format_type_nests_parameters() {
        let registry = GenericRegistry::new();
        assert_eq!(
            mapper().format_type("Result«Page«User»»", &registry),
            "models.Result[models.Page[models.User]]"
        );
        assert_eq!(
            mapper().format_type("Result«string»", &registry),
            "models.Result[str]"
        );
        assert_eq!(
            mapper().format_type("Result«Void»", &registry),
            "models.Result[None]"
        );
    }

    #[test]
    fn test_format_type_list_marker_without_sequence_slot() {
        let mut registry = GenericRegistry::new();
        registry.register("Result");
        registry.record_slot("Result", "data", false);

        assert_eq!(
            mapper().format_type("Result«List«User»»", &registry),
            "models.Result[list[models.User]]"
        );
    }

    #[test]
    fn test_format_type_list_marker_absorbed_by_sequence_slot() {
        let mut registry = GenericRegistry::new();
        registry.register("Page");
        registry.record_slot("Page", "records", true);

        assert_eq!(
            mapper().format_type("Page«List«User»»", &registry),
            "models.Page[models.User]"
        );
        assert_eq!(
            mapper().format_type("Result«Page«List«User»»»", &registry),
            "models.Result[models.Page[models.User]]"
        );
    }

    #[test]
    fn test_format_type_custom_module() {
        let registry = GenericRegistry::new();
        let mapper = TypeMapper::new("schema");
        assert_eq!(
            mapper.format_type("Page«User»", &registry),
            "schema.Page[schema.User]"
        );
    }

    #[test]
    fn test_resolve_property_primitives_and_refs() {
        let mapper = mapper();
        assert_eq!(
            mapper.resolve_property(&PropertySpec::of_kind("integer"), "User"),
            TypeResolution::Resolved("int".to_string())
        );
        assert_eq!(
            mapper
                .resolve_property(&PropertySpec::reference("#/components/schemas/Address"), "User")
                .annotation(),
            "Address"
        );
        assert_eq!(
            mapper
                .resolve_property(
                    &PropertySpec::reference("#/components/schemas/Page«User»"),
                    "Result"
                )
                .annotation(),
            "Page"
        );
    }

    #[test]
    fn test_resolve_property_arrays_and_self_reference() {
        let mapper = mapper();
        let children =
            PropertySpec::array_of(PropertySpec::reference("#/components/schemas/Node"));
        assert_eq!(
            mapper.resolve_property(&children, "Node").annotation(),
            "list['Node']"
        );

        let parent = PropertySpec::reference("#/components/schemas/Node");
        assert_eq!(mapper.resolve_property(&parent, "Node").annotation(), "'Node'");

        let tags = PropertySpec::array_of(PropertySpec::of_kind("string"));
        assert_eq!(mapper.resolve_property(&tags, "Node").annotation(), "list[str]");

        let bare = PropertySpec::of_kind("array");
        assert_eq!(mapper.resolve_property(&bare, "Node").annotation(), "list");
    }

    #[test]
    fn test_resolve_property_unresolved() {
        let mapper = mapper();
        let missing = mapper.resolve_property(&PropertySpec::default(), "User");
        assert!(!missing.is_resolved());
        assert_eq!(missing.annotation(), "Any");

        let unknown = mapper.resolve_property(&PropertySpec::of_kind("file"), "User");
        match unknown {
            TypeResolution::Unresolved { fallback, reason } => {
                assert_eq!(fallback, "Any");
                assert!(reason.contains("file"));
            }
            other => panic!("expected unresolved, got {other:?}"),
        }

        let nested = PropertySpec::array_of(PropertySpec::default());
        assert_eq!(mapper.resolve_property(&nested, "User").annotation(), "list[Any]");
    }

    #[test]
    fn test_resolve_argument_is_qualified() {
        let registry = GenericRegistry::new();
        let mapper = mapper();

        let body = PropertySpec::reference("#/components/schemas/User");
        assert_eq!(
            mapper.resolve_argument(&body, &registry).annotation(),
            "models.User"
        );

        let ids = PropertySpec::array_of(PropertySpec::of_kind("integer"));
        assert_eq!(mapper.resolve_argument(&ids, &registry).annotation(), "list[int]");
    }
}
