//! Core types for the generation domain

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use crate::generation::diagnostics::Diagnostic;

// Re-export schema types from the infrastructure module
pub use crate::infrastructure::openapi::{
    ApiSchema, ComponentSchema, HttpMethod, OperationSpec, ParameterSpec, PropertySpec,
    RequestBodySpec,
};

/// The Python modules a run produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKind {
    Models,
    Enums,
    Apis,
    /// Session helper, written only when absent
    Session,
}

impl ModuleKind {
    pub fn all() -> &'static [ModuleKind] {
        &[
            ModuleKind::Models,
            ModuleKind::Enums,
            ModuleKind::Apis,
            ModuleKind::Session,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleKind::Models => "models",
            ModuleKind::Enums => "enums",
            ModuleKind::Apis => "apis",
            ModuleKind::Session => "session",
        }
    }

    /// How an existing file at the artifact path is treated
    pub fn write_policy(&self) -> WritePolicy {
        match self {
            ModuleKind::Session => WritePolicy::CreateOnly,
            _ => WritePolicy::Overwrite,
        }
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WritePolicy {
    Overwrite,
    /// Leave an existing file untouched
    CreateOnly,
}

/// Generated artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub content: String,
    pub policy: WritePolicy,
}

/// Counts reported after a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationSummary {
    pub models: usize,
    pub generic_models: usize,
    pub enums: usize,
    pub functions: usize,
}

/// Result of generation
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub artifacts: Vec<Artifact>,
    pub diagnostics: Vec<Diagnostic>,
    pub summary: GenerationSummary,
}
