//! Tera-based module renderer implementation

use serde_json::Value as JsonValue;
use std::collections::HashMap;
use tera::Tera;

use crate::generation::sanitizers::{python_string_literal, sanitize_docstring};
use crate::generation::{GenerationError, ModuleKind, ModuleRenderer, RenderContext};

const MODELS_TEMPLATE: &str = include_str!("../../../templates/python/models.py.tera");
const ENUMS_TEMPLATE: &str = include_str!("../../../templates/python/enums.py.tera");
const APIS_TEMPLATE: &str = include_str!("../../../templates/python/apis.py.tera");
const SESSION_TEMPLATE: &str = include_str!("../../../templates/python/request_session.py.tera");

/// Renders modules from the templates embedded in the binary
pub struct TeraModuleRenderer {
    tera: Tera,
}

impl TeraModuleRenderer {
    pub fn try_new() -> Result<Self, GenerationError> {
        let mut tera = Tera::default();
        // Python source, never HTML
        tera.autoescape_on(vec![]);
        tera.add_raw_templates(vec![
            (template_name(ModuleKind::Models), MODELS_TEMPLATE),
            (template_name(ModuleKind::Enums), ENUMS_TEMPLATE),
            (template_name(ModuleKind::Apis), APIS_TEMPLATE),
            (template_name(ModuleKind::Session), SESSION_TEMPLATE),
        ])
        .map_err(|e| GenerationError::RenderError(format!("Failed to add template: {e:?}")))?;
        tera.register_filter("docstring", docstring_filter);
        tera.register_filter("py_str", py_str_filter);

        Ok(Self { tera })
    }
}

impl ModuleRenderer for TeraModuleRenderer {
    fn render(&self, kind: ModuleKind, context: &RenderContext) -> Result<String, GenerationError> {
        tracing::debug!(module = %kind, "Rendering module");
        self.tera
            .render(template_name(kind), &context.to_tera_context())
            .map_err(|e| {
                GenerationError::RenderError(format!("Failed to render {kind} module: {e:?}"))
            })
    }
}

fn template_name(kind: ModuleKind) -> &'static str {
    match kind {
        ModuleKind::Models => "models.py",
        ModuleKind::Enums => "enums.py",
        ModuleKind::Apis => "apis.py",
        ModuleKind::Session => "request_session.py",
    }
}

fn string_argument<'a>(filter: &str, value: &'a JsonValue) -> tera::Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| tera::Error::msg(format!("Filter `{filter}` expects a string, got {value}")))
}

fn docstring_filter(value: &JsonValue, _: &HashMap<String, JsonValue>) -> tera::Result<JsonValue> {
    let text = string_argument("docstring", value)?;
    Ok(JsonValue::String(sanitize_docstring(text)))
}

fn py_str_filter(value: &JsonValue, _: &HashMap<String, JsonValue>) -> tera::Result<JsonValue> {
    let text = string_argument("py_str", value)?;
    Ok(JsonValue::String(python_string_literal(text)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn render(kind: ModuleKind, variables: JsonValue) -> String {
        let mut context = RenderContext::new();
        if let JsonValue::Object(map) = variables {
            for (key, value) in map {
                context.add_variable(&key, value);
            }
        }
        TeraModuleRenderer::try_new()
            .unwrap()
            .render(kind, &context)
            .unwrap()
    }

    #[test]
    fn test_render_models() {
        let output = render(
            ModuleKind::Models,
            json!({
                "type_params": ["T0"],
                "classes": [
                    {
                        "name": "User",
                        "type_param": null,
                        "description": "A user",
                        "properties": [
                            { "name": "id", "annotation": "int", "comment_lines": ["Primary key"] }
                        ]
                    },
                    {
                        "name": "Page",
                        "type_param": "T0",
                        "description": null,
                        "properties": [
                            { "name": "records", "annotation": "list[T0]", "comment_lines": [] }
                        ]
                    },
                    { "name": "Empty", "type_param": null, "description": null, "properties": [] }
                ]
            }),
        );

        let expected = r#"""" This file is automatically generated, please do not modify """
from typing import Any, Generic, TypeVar

from pydantic import BaseModel

T0 = TypeVar('T0')


class User(BaseModel):
    """A user"""
    # Primary key
    id: int = None


class Page(BaseModel, Generic[T0]):
    records: list[T0] = None


class Empty(BaseModel):
    pass
"#;
        assert_eq!(output, expected);
    }

    #[test]
    fn test_render_enums() {
        let output = render(
            ModuleKind::Enums,
            json!({
                "enums": [
                    { "name": "Status", "description": "Lifecycle", "members": ["ACTIVE", "DONE"] }
                ]
            }),
        );

        let expected = r#"""" This file is automatically generated, please do not modify """
from enum import Enum


class Status(str, Enum):
    """Lifecycle"""
    ACTIVE = 'ACTIVE'
    DONE = 'DONE'
"#;
        assert_eq!(output, expected);
    }

    #[test]
    fn test_render_apis() {
        let output = render(
            ModuleKind::Apis,
            json!({
                "models_module": "models",
                "session_module": "request_session",
                "functions": [
                    {
                        "name": "list_users",
                        "description": "List users",
                        "http_method": "get",
                        "path": "/users",
                        "params": [
                            { "name": "page", "annotation": "int", "required": true },
                            { "name": "name", "annotation": "str", "required": false }
                        ],
                        "payload": { "kind": "json", "keys": ["page", "name"] },
                        "returns": {
                            "kind": "unwrap",
                            "annotation": "models.Page[models.User]",
                            "statements": [
                                {
                                    "depth": 0,
                                    "step": {
                                        "kind": "each",
                                        "target": "resp.records",
                                        "constructor": "models.User"
                                    }
                                },
                                {
                                    "depth": 0,
                                    "step": { "kind": "loop", "var": "item1", "iterable": "resp.records" }
                                },
                                {
                                    "depth": 1,
                                    "step": {
                                        "kind": "single",
                                        "target": "item1.address",
                                        "constructor": "models.Address"
                                    }
                                }
                            ]
                        }
                    },
                    {
                        "name": "create_user",
                        "description": null,
                        "http_method": "post",
                        "path": "/users",
                        "params": [
                            { "name": "data", "annotation": "models.User", "required": true }
                        ],
                        "payload": { "kind": "body", "serialize": true },
                        "returns": { "kind": "parse", "annotation": "models.User" }
                    },
                    {
                        "name": "health",
                        "description": null,
                        "http_method": "get",
                        "path": "/health",
                        "params": [],
                        "payload": { "kind": "none" },
                        "returns": { "kind": "raw" }
                    }
                ]
            }),
        );

        let expected = r#"""" This file is automatically generated, please do not modify """
from typing import Any

from aiohttp import ClientSession

from . import models
from .request_session import provide_request_session


@provide_request_session
async def list_users(page: int, name: str = None, session: ClientSession = None):
    """List users"""
    async with session.get('/users', json={'page': page, 'name': name}) as response:
        data = await response.json()
    resp = models.Page[models.User].parse_obj(data)
    resp.records = [models.User(**v) for v in resp.records]
    for item1 in resp.records:
        item1.address = models.Address(**item1.address)
    return resp


@provide_request_session
async def create_user(data: models.User, session: ClientSession = None):
    async with session.post('/users', json=data.dict()) as response:
        data = await response.json()
    return models.User.parse_obj(data)


@provide_request_session
async def health(session: ClientSession = None):
    async with session.get('/health') as response:
        data = await response.json()
    return data
"#;
        assert_eq!(output, expected);
    }

    #[test]
    fn test_render_session_with_base_url() {
        let output = render(
            ModuleKind::Session,
            json!({ "base_url": "https://api.example.com" }),
        );
        assert!(output.contains("BASE_URL = 'https://api.example.com'"));
        assert!(output.contains("def provide_request_session(func):"));

        let output = render(ModuleKind::Session, json!({ "base_url": null }));
        assert!(output.contains("BASE_URL = None"));
    }

    #[test]
    fn test_docstring_filter_escapes_quotes() {
        let output = render(
            ModuleKind::Enums,
            json!({
                "enums": [
                    { "name": "Mode", "description": "say \"\"\"hi\"\"\"", "members": ["A"] }
                ]
            }),
        );
        assert!(output.contains(r#"    """say \"\"\"hi\"\"\""""#));
    }
}
