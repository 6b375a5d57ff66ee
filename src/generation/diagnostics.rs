//! Non-fatal findings collected while generating.
//!
//! Generation is optimistic: an unknown schema type or a generic wrapper without a
//! recognisable payload slot still produces output. Each such degradation is
//! recorded here instead of being swallowed, so callers can log it or fail the
//! run in strict mode.

use serde::Serialize;
use std::fmt;

/// What went wrong
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A schema type could not be mapped; `fallback` was emitted instead
    UnresolvedType { reason: String, fallback: String },
    /// A generic class in a response chain has no registered payload slot
    UnregisteredGenericSlot { class: String },
    /// A list of lists in a response chain is parsed but not rebuilt element-wise
    NestedSequence { class: String },
    /// A name that is emitted verbatim is not a usable Python identifier
    InvalidIdentifier { name: String },
    /// A required parameter follows an optional one in the declared order
    RequiredAfterOptional { parameter: String },
    /// An enum-holder property has no `enum` values
    MissingEnumValues { name: String },
    /// An operation has no `operationId`; a name was derived from method and path
    SynthesizedOperationId { name: String },
    /// A function name is used twice; the later definition shadows the earlier
    DuplicateFunctionName { name: String },
}

/// A finding together with where it was found
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Schema or operation the finding belongs to, e.g. `Page«User».items`
    pub location: String,
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.location)?;
        match &self.kind {
            DiagnosticKind::UnresolvedType { reason, fallback } => {
                write!(f, "{reason}; emitted `{fallback}`")
            }
            DiagnosticKind::UnregisteredGenericSlot { class } => write!(
                f,
                "no generic payload property registered for `{class}`; level not unwrapped"
            ),
            DiagnosticKind::NestedSequence { class } => write!(
                f,
                "nested list inside `{class}` is left as raw values"
            ),
            DiagnosticKind::InvalidIdentifier { name } => {
                write!(f, "`{name}` is not a valid Python identifier")
            }
            DiagnosticKind::RequiredAfterOptional { parameter } => write!(
                f,
                "required parameter `{parameter}` follows an optional parameter"
            ),
            DiagnosticKind::MissingEnumValues { name } => {
                write!(f, "enum `{name}` declares no values and was skipped")
            }
            DiagnosticKind::SynthesizedOperationId { name } => {
                write!(f, "missing operationId; generated function `{name}`")
            }
            DiagnosticKind::DuplicateFunctionName { name } => write!(
                f,
                "function `{name}` is already defined and will be shadowed"
            ),
        }
    }
}

/// Collector passed by reference through the emitters
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finding
    pub fn push(&mut self, location: impl Into<String>, kind: DiagnosticKind) {
        let diagnostic = Diagnostic {
            location: location.into(),
            kind,
        };
        tracing::debug!("{diagnostic}");
        self.entries.push(diagnostic);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}
