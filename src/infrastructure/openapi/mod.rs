//! Schema loading implementations

pub mod composite_loader;
pub mod file_loader;
pub mod http_loader;
pub mod parser;
pub mod types;

pub use composite_loader::CompositeSchemaLoader;
pub use file_loader::FileSchemaLoader;
pub use http_loader::HttpSchemaLoader;
pub use parser::{DocumentFormat, SchemaParser};
pub use types::*;
