//! Per-run state and the render context handed to templates.

use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::HashMap;

use crate::core::config::GeneratorConfig;
use crate::generation::diagnostics::Diagnostics;
use crate::generation::errors::GenerationError;
use crate::generation::registry::GenericRegistry;

/// State owned by one generation run
#[derive(Debug)]
pub struct GenerationContext {
    pub config: GeneratorConfig,
    pub registry: GenericRegistry,
    pub diagnostics: Diagnostics,
}

impl GenerationContext {
    /// Create a fresh context; registry and diagnostics start empty
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            registry: GenericRegistry::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Validate the configuration before anything is emitted
    pub fn validate(&self) -> Result<(), GenerationError> {
        self.config.validate()?;
        Ok(())
    }
}

/// Variables a module template is rendered with
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    pub variables: HashMap<String, JsonValue>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable to the render context
    pub fn add_variable(&mut self, key: &str, value: JsonValue) {
        self.variables.insert(key.to_string(), value);
    }

    /// Serialize `value` and add it under `key`
    pub fn add_serialized<T: Serialize>(
        &mut self,
        key: &str,
        value: &T,
    ) -> Result<(), GenerationError> {
        self.add_variable(key, serde_json::to_value(value)?);
        Ok(())
    }

    /// Check if a variable exists
    pub fn has_variable(&self, key: &str) -> bool {
        self.variables.contains_key(key)
    }

    pub fn to_tera_context(&self) -> tera::Context {
        let mut context = tera::Context::new();
        for (key, value) in &self.variables {
            context.insert(key.as_str(), value);
        }
        context
    }
}
