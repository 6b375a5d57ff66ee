//! Infrastructure layer - concrete implementations of domain ports

pub mod openapi;
pub mod output;
pub mod rendering;

pub use openapi::{CompositeSchemaLoader, FileSchemaLoader, HttpSchemaLoader};
pub use output::FileSystemOutputService;
pub use rendering::TeraModuleRenderer;
