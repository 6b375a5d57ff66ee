//! clientgen library
//!
//! Turns an OpenAPI/Swagger schema into a typed async Python client: pydantic
//! models (including generic wrappers such as `Page«List«User»»`), string enums
//! and `aiohttp` call bindings.
#![deny(unsafe_code)]

pub mod application;
pub mod core;
pub mod generation;
pub mod infrastructure;

pub use crate::core::config::GeneratorConfig;
pub use crate::generation::{GenerationError, GenerationOrchestrator, GenerationResult};
