//! Typed view of the schema fields the generator consumes.
//!
//! Only the fields read by the emitters are modelled; everything else in the
//! document is ignored. Maps are `IndexMap`s so emission follows document order.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

/// HTTP methods an operation can be declared under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl HttpMethod {
    /// Get all HTTP methods in the order they are scanned within a path item
    pub fn all() -> &'static [HttpMethod] {
        &[
            HttpMethod::Get,
            HttpMethod::Post,
            HttpMethod::Put,
            HttpMethod::Delete,
            HttpMethod::Patch,
            HttpMethod::Head,
            HttpMethod::Options,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
            HttpMethod::Patch => "patch",
            HttpMethod::Head => "head",
            HttpMethod::Options => "options",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed schema document
#[derive(Debug, Clone, Default)]
pub struct ApiSchema {
    /// `components.schemas` (or Swagger 2 `definitions`), keyed by schema name
    pub schemas: IndexMap<String, ComponentSchema>,
    /// Every operation under `paths`, in document order
    pub operations: Vec<OperationSpec>,
}

/// One named component schema
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComponentSchema {
    #[serde(default)]
    pub properties: Option<IndexMap<String, PropertySpec>>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A property (or parameter/response) schema
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PropertySpec {
    #[serde(default, rename = "type", deserialize_with = "lenient_kind")]
    pub kind: Option<String>,
    #[serde(default, rename = "$ref")]
    pub reference: Option<String>,
    #[serde(default)]
    pub items: Option<Box<PropertySpec>>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub example: Option<JsonValue>,
    #[serde(default, rename = "enum")]
    pub enum_values: Option<Vec<JsonValue>>,
}

impl PropertySpec {
    /// Shorthand for a `{"$ref": ...}` schema
    pub fn reference(reference: impl Into<String>) -> Self {
        Self {
            reference: Some(reference.into()),
            ..Default::default()
        }
    }

    /// Shorthand for a `{"type": ...}` schema
    pub fn of_kind(kind: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
            ..Default::default()
        }
    }

    /// Shorthand for `{"type": "array", "items": ...}`
    pub fn array_of(items: PropertySpec) -> Self {
        Self {
            kind: Some("array".to_string()),
            items: Some(Box::new(items)),
            ..Default::default()
        }
    }

    pub fn is_array(&self) -> bool {
        self.kind.as_deref() == Some("array")
    }
}

/// An operation parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    pub name: String,
    pub required: bool,
    /// `in` value (`query`, `path`, ...), kept for diagnostics only
    pub location: Option<String>,
    pub schema: Option<PropertySpec>,
}

/// A request body; content keyed by media type
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RequestBodySpec {
    #[serde(default)]
    pub content: IndexMap<String, MediaTypeSpec>,
}

impl RequestBodySpec {
    /// Schema of the JSON body, or of the first declared media type
    pub fn schema(&self) -> Option<&PropertySpec> {
        self.content
            .get("application/json")
            .or_else(|| self.content.values().next())
            .and_then(|media| media.schema.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MediaTypeSpec {
    #[serde(default)]
    pub schema: Option<PropertySpec>,
}

/// One operation under `paths`
#[derive(Debug, Clone, PartialEq)]
pub struct OperationSpec {
    pub path: String,
    pub method: HttpMethod,
    pub operation_id: Option<String>,
    pub description: Option<String>,
    /// `None` when the operation declares no parameters at all
    pub parameters: Option<Vec<ParameterSpec>>,
    pub request_body: Option<RequestBodySpec>,
    /// Schema of the first media type of the `200` response
    pub response_schema: Option<PropertySpec>,
}

impl OperationSpec {
    pub fn new(path: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            path: path.into(),
            method,
            operation_id: None,
            description: None,
            parameters: None,
            request_body: None,
            response_schema: None,
        }
    }
}

/// Accept `"type": "string"` as well as OpenAPI 3.1 `"type": ["string", "null"]`
fn lenient_kind<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<JsonValue>::deserialize(deserializer)?;
    Ok(match value {
        Some(JsonValue::String(kind)) => Some(kind),
        Some(JsonValue::Array(kinds)) => kinds.into_iter().find_map(|kind| match kind {
            JsonValue::String(kind) if kind != "null" => Some(kind),
            _ => None,
        }),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_property_spec_deserialization() {
        let spec: PropertySpec = serde_json::from_value(json!({
            "type": "array",
            "items": { "$ref": "#/components/schemas/User" },
            "description": "All users"
        }))
        .unwrap();

        assert!(spec.is_array());
        assert_eq!(
            spec.items.unwrap().reference.as_deref(),
            Some("#/components/schemas/User")
        );
        assert_eq!(spec.description.as_deref(), Some("All users"));
    }

    #[test]
    fn test_lenient_kind_accepts_type_arrays() {
        let spec: PropertySpec =
            serde_json::from_value(json!({ "type": ["null", "integer"] })).unwrap();
        assert_eq!(spec.kind.as_deref(), Some("integer"));

        let spec: PropertySpec = serde_json::from_value(json!({ "type": 42 })).unwrap();
        assert_eq!(spec.kind, None);
    }

    #[test]
    fn test_component_schema_preserves_property_order() {
        let schema: ComponentSchema = serde_json::from_value(json!({
            "properties": {
                "zeta": { "type": "string" },
                "alpha": { "type": "string" },
                "mid": { "type": "string" }
            }
        }))
        .unwrap();

        let names: Vec<_> = schema.properties.unwrap().keys().cloned().collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_request_body_prefers_json() {
        let body: RequestBodySpec = serde_json::from_value(json!({
            "content": {
                "application/xml": { "schema": { "type": "string" } },
                "application/json": { "schema": { "$ref": "#/components/schemas/User" } }
            }
        }))
        .unwrap();

        assert_eq!(
            body.schema().unwrap().reference.as_deref(),
            Some("#/components/schemas/User")
        );
    }

    #[test]
    fn test_http_method_display() {
        assert_eq!(HttpMethod::Get.to_string(), "get");
        assert_eq!(HttpMethod::Options.as_str(), "options");
        assert_eq!(HttpMethod::all().len(), 7);
    }
}
