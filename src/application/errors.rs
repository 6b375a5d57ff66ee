//! Application layer error types

use thiserror::Error;

/// Application layer errors
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Generation error: {0}")]
    GenerationError(#[from] crate::generation::GenerationError),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationError),

    #[error("Output error: {0}")]
    OutputError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Strict mode: generation reported {0} diagnostic(s)")]
    StrictModeViolation(usize),
}

/// Validation errors for requests
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Schema source cannot be empty")]
    EmptySchemaSource,

    #[error("Invalid schema URL '{0}': {1}")]
    InvalidSchemaUrl(String, String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}
