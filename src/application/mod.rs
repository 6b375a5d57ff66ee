//! Application layer - orchestrates use cases and coordinates between domains

pub mod commands;
pub mod errors;
pub mod generate_client;
pub mod traits;

pub use commands::*;
pub use errors::*;
pub use generate_client::GenerateClientUseCase;
pub use traits::*;
