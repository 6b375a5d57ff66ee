//! Intermediate representation of the generated Python modules.
//!
//! Emitters build these descriptors; the renderer turns them into text. Every
//! type serializes into the shape the templates read.

use serde::Serialize;

/// One annotated field of a model class
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyDecl {
    pub name: String,
    pub annotation: String,
    /// Description lines rendered as `#` comments above the field
    pub comment_lines: Vec<String>,
}

/// A pydantic model class
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassDecl {
    pub name: String,
    /// `TypeVar` bound by `Generic[...]` when the schema name is generic
    pub type_param: Option<String>,
    pub description: Option<String>,
    pub properties: Vec<PropertyDecl>,
}

impl ClassDecl {
    /// Whether any field annotation refers to `name` as a whole identifier.
    ///
    /// `list['Node']` mentions `Node`; `UserInfo` does not mention `User`.
    pub fn mentions(&self, name: &str) -> bool {
        self.properties.iter().any(|property| {
            property
                .annotation
                .split(|c: char| !(c.is_alphanumeric() || c == '_'))
                .any(|identifier| identifier == name)
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModelsModule {
    pub classes: Vec<ClassDecl>,
}

impl ModelsModule {
    /// Distinct `TypeVar` names in first-use order
    pub fn type_params(&self) -> Vec<&str> {
        let mut params: Vec<&str> = Vec::new();
        for param in self.classes.iter().filter_map(|c| c.type_param.as_deref()) {
            if !params.contains(&param) {
                params.push(param);
            }
        }
        params
    }
}

/// A `str`-backed enum class
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumDecl {
    pub name: String,
    pub description: Option<String>,
    pub members: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnumsModule {
    pub enums: Vec<EnumDecl>,
}

/// One argument of an API function
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiParam {
    pub name: String,
    pub annotation: String,
    /// Required parameters carry no default; optional ones default to `None`
    pub required: bool,
}

/// What the emitted call sends
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CallPayload {
    None,
    /// `json={'a': a, 'b': b}` built from the parameters
    Json { keys: Vec<String> },
    /// `json=data.dict()` for models, `json=data` for primitive bodies
    Body { serialize: bool },
}

/// One step of rebuilding typed objects from a parsed generic response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UnwrapStep {
    /// `target = constructor(**target)`
    Single { target: String, constructor: String },
    /// `target = [constructor(**v) for v in target]`
    Each { target: String, constructor: String },
    /// `for var in iterable:`; following steps one level deeper run per element
    Loop { var: String, iterable: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnwrapStatement {
    /// Nesting below the function body, in loop levels
    pub depth: usize,
    pub step: UnwrapStep,
}

/// How the parsed JSON payload is turned into the return value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReturnHandling {
    /// `return data`
    Raw,
    /// `return Annotation.parse_obj(data)`
    Parse { annotation: String },
    /// `resp = Annotation.parse_obj(data)`, the statements, `return resp`
    Unwrap {
        annotation: String,
        statements: Vec<UnwrapStatement>,
    },
}

/// One async API binding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiFunction {
    pub name: String,
    pub description: Option<String>,
    pub http_method: String,
    pub path: String,
    pub params: Vec<ApiParam>,
    pub payload: CallPayload,
    pub returns: ReturnHandling,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApisModule {
    pub functions: Vec<ApiFunction>,
}
