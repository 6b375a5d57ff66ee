//! Schema document parser
//!
//! Turns a raw JSON/YAML document into an [`ApiSchema`]. It handles:
//! - OpenAPI 3 `components.schemas` and Swagger 2 `definitions`
//! - Path-level and operation-level parameters, including `$ref`s into the document
//! - Swagger 2 inline parameter types and `in: body` parameters
//! - The `200` response schema, under `content` or directly under `schema`

use indexmap::IndexMap;
use serde_json::{Map, Value as JsonValue};

use crate::generation::GenerationError;
use crate::infrastructure::openapi::types::{
    ApiSchema, ComponentSchema, HttpMethod, MediaTypeSpec, OperationSpec, ParameterSpec,
    PropertySpec, RequestBodySpec,
};

/// Serialization format of a schema document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
    /// Try JSON first, then YAML
    Unknown,
}

impl DocumentFormat {
    /// Guess the format from a file name, URL or content type
    pub fn from_hint(hint: &str) -> Self {
        let hint = hint.to_ascii_lowercase();
        if hint.ends_with(".json") {
            DocumentFormat::Json
        } else if hint.ends_with(".yaml") || hint.ends_with(".yml") {
            DocumentFormat::Yaml
        } else if hint.contains("json") {
            DocumentFormat::Json
        } else if hint.contains("yaml") {
            DocumentFormat::Yaml
        } else {
            DocumentFormat::Unknown
        }
    }
}

/// Parser over one decoded schema document
pub struct SchemaParser {
    /// The raw JSON value of the document
    pub json: JsonValue,
}

impl SchemaParser {
    pub fn new(json: JsonValue) -> Self {
        Self { json }
    }

    /// Decode document text in the given format
    pub fn from_text(content: &str, format: DocumentFormat) -> Result<Self, GenerationError> {
        let json = match format {
            DocumentFormat::Json => serde_json::from_str(content)?,
            DocumentFormat::Yaml => serde_yaml::from_str(content)
                .map_err(|e| GenerationError::LoadError(format!("Failed to parse YAML: {e}")))?,
            DocumentFormat::Unknown => serde_json::from_str(content)
                .or_else(|_| serde_yaml::from_str(content))
                .map_err(|e| {
                    GenerationError::LoadError(format!("Failed to parse schema document: {e}"))
                })?,
        };
        Ok(Self::new(json))
    }

    /// Parse the schemas and every operation
    pub fn parse(&self) -> Result<ApiSchema, GenerationError> {
        let schema = ApiSchema {
            schemas: self.parse_schemas()?,
            operations: self.parse_operations()?,
        };
        tracing::debug!(
            schemas = schema.schemas.len(),
            operations = schema.operations.len(),
            "Parsed schema document"
        );
        Ok(schema)
    }

    /// `components.schemas`, falling back to Swagger 2 `definitions`
    pub fn parse_schemas(&self) -> Result<IndexMap<String, ComponentSchema>, GenerationError> {
        let schemas = self
            .json
            .pointer("/components/schemas")
            .or_else(|| self.json.get("definitions"));

        match schemas {
            Some(value) => serde_json::from_value(value.clone()).map_err(|e| {
                GenerationError::ValidationError(format!("Invalid component schemas: {e}"))
            }),
            None => Ok(IndexMap::new()),
        }
    }

    /// Every operation under `paths`, in document order
    pub fn parse_operations(&self) -> Result<Vec<OperationSpec>, GenerationError> {
        let paths = self
            .json
            .get("paths")
            .and_then(JsonValue::as_object)
            .ok_or_else(|| {
                GenerationError::ValidationError("Missing 'paths' object".to_string())
            })?;

        let mut operations = Vec::new();
        for (path, path_item) in paths {
            let path_item = self.resolve(path_item)?;
            // Path items are iterated in document key order, not method order
            let Some(item) = path_item.as_object() else {
                continue;
            };
            for (key, method_item) in item {
                let Some(method) = parse_method(key) else {
                    continue;
                };
                let Some(method_item) = method_item.as_object() else {
                    continue;
                };
                operations.push(self.build_operation(path, method, path_item, method_item)?);
            }
        }

        Ok(operations)
    }

    fn build_operation(
        &self,
        path: &str,
        method: HttpMethod,
        path_item: &JsonValue,
        method_item: &Map<String, JsonValue>,
    ) -> Result<OperationSpec, GenerationError> {
        let mut operation = OperationSpec::new(path, method);
        operation.operation_id = method_item
            .get("operationId")
            .and_then(JsonValue::as_str)
            .map(String::from);
        operation.description = method_item
            .get("description")
            .or_else(|| method_item.get("summary"))
            .and_then(JsonValue::as_str)
            .map(String::from);

        let (parameters, body_parameter) = self.merge_parameters(path_item, method_item)?;
        operation.parameters = parameters;

        operation.request_body = match method_item.get("requestBody") {
            Some(body) => Some(self.parse_request_body(body)?),
            None => body_parameter,
        };

        operation.response_schema = self.parse_success_response(method_item)?;

        tracing::debug!(%method, path, "Parsed operation");
        Ok(operation)
    }

    /// Path-level parameters not redeclared by the operation, then the
    /// operation's own. A Swagger 2 `in: body` parameter is split off as the
    /// request body.
    fn merge_parameters(
        &self,
        path_item: &JsonValue,
        method_item: &Map<String, JsonValue>,
    ) -> Result<(Option<Vec<ParameterSpec>>, Option<RequestBodySpec>), GenerationError> {
        let shared = self.raw_parameters(path_item.get("parameters"))?;
        let own = self.raw_parameters(method_item.get("parameters"))?;
        if shared.is_none() && own.is_none() {
            return Ok((None, None));
        }
        let shared = shared.unwrap_or_default();
        let own = own.unwrap_or_default();

        let mut merged: Vec<&JsonValue> = shared
            .iter()
            .copied()
            .filter(|candidate| !own.iter().any(|param| same_parameter(param, candidate)))
            .collect();
        merged.extend(own.iter().copied());

        let mut parameters = Vec::with_capacity(merged.len());
        let mut body = None;
        for param in merged {
            if param.get("in").and_then(JsonValue::as_str) == Some("body") {
                body = Some(body_from_parameter(param)?);
                continue;
            }
            parameters.push(parse_parameter(param)?);
        }

        Ok((Some(parameters), body))
    }

    fn raw_parameters<'a>(
        &'a self,
        parameters: Option<&'a JsonValue>,
    ) -> Result<Option<Vec<&'a JsonValue>>, GenerationError> {
        let Some(list) = parameters.and_then(JsonValue::as_array) else {
            return Ok(None);
        };
        list.iter()
            .map(|param| self.resolve(param))
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    fn parse_request_body(&self, body: &JsonValue) -> Result<RequestBodySpec, GenerationError> {
        let body = self.resolve(body)?;
        serde_json::from_value(body.clone())
            .map_err(|e| GenerationError::ValidationError(format!("Invalid request body: {e}")))
    }

    /// Schema of the first media type of the `200` response
    fn parse_success_response(
        &self,
        method_item: &Map<String, JsonValue>,
    ) -> Result<Option<PropertySpec>, GenerationError> {
        let Some(response) = method_item.get("responses").and_then(|r| r.get("200")) else {
            return Ok(None);
        };
        let response = self.resolve(response)?;

        let schema = response
            .get("content")
            .and_then(JsonValue::as_object)
            .and_then(|content| content.values().next())
            .and_then(|media| media.get("schema"))
            .or_else(|| response.get("schema"));

        schema
            .map(|schema| {
                serde_json::from_value(schema.clone()).map_err(|e| {
                    GenerationError::ValidationError(format!("Invalid response schema: {e}"))
                })
            })
            .transpose()
    }

    /// Follow a local `$ref` if `value` is a reference object
    fn resolve<'a>(&'a self, value: &'a JsonValue) -> Result<&'a JsonValue, GenerationError> {
        match value.get("$ref").and_then(JsonValue::as_str) {
            Some(reference) => reference
                .strip_prefix('#')
                .and_then(|pointer| self.json.pointer(pointer))
                .ok_or_else(|| {
                    GenerationError::ValidationError(format!(
                        "Unresolvable reference '{reference}'"
                    ))
                }),
            None => Ok(value),
        }
    }
}

fn parse_method(key: &str) -> Option<HttpMethod> {
    HttpMethod::all()
        .iter()
        .copied()
        .find(|method| method.as_str() == key)
}

fn same_parameter(a: &JsonValue, b: &JsonValue) -> bool {
    a.get("name") == b.get("name") && a.get("in") == b.get("in")
}

fn parse_parameter(param: &JsonValue) -> Result<ParameterSpec, GenerationError> {
    let name = param
        .get("name")
        .and_then(JsonValue::as_str)
        .ok_or_else(|| GenerationError::ValidationError("Parameter without a name".to_string()))?;

    // OpenAPI 3 nests the type under `schema`; Swagger 2 declares it inline
    let schema_value = param.get("schema").unwrap_or(param);
    let schema: PropertySpec = serde_json::from_value(schema_value.clone()).map_err(|e| {
        GenerationError::ValidationError(format!("Invalid schema for parameter '{name}': {e}"))
    })?;
    let schema = (schema.kind.is_some() || schema.reference.is_some()).then_some(schema);

    Ok(ParameterSpec {
        name: name.to_string(),
        required: param
            .get("required")
            .and_then(JsonValue::as_bool)
            .unwrap_or(false),
        location: param.get("in").and_then(JsonValue::as_str).map(String::from),
        schema,
    })
}

fn body_from_parameter(param: &JsonValue) -> Result<RequestBodySpec, GenerationError> {
    let schema = param
        .get("schema")
        .map(|schema| serde_json::from_value(schema.clone()))
        .transpose()
        .map_err(|e| GenerationError::ValidationError(format!("Invalid body parameter: {e}")))?;

    let mut body = RequestBodySpec::default();
    body.content
        .insert("application/json".to_string(), MediaTypeSpec { schema });
    Ok(body)
}
