//! Generation domain module - turns a parsed schema into Python modules
//!
//! Emission is synchronous and works on plain descriptors: the model emitter
//! fills the generic registry, the API emitter reads it, and the orchestrator
//! hands the resulting IR to a [`ModuleRenderer`].

pub mod apis;
pub mod context;
pub mod diagnostics;
pub mod enums;
pub mod errors;
pub mod grammar;
pub mod ir;
pub mod models;
pub mod orchestrator;
pub mod ordering;
pub mod registry;
pub mod sanitizers;
pub mod traits;
pub mod type_mapper;
pub mod types;
pub mod unwrap;
pub mod utils;

pub use context::*;
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use errors::*;
pub use orchestrator::*;
pub use registry::GenericRegistry;
pub use traits::*;
pub use types::*;
