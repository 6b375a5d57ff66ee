//! Generator configuration.
//!
//! Settings can come from a `clientgen.toml` file; every key is optional and
//! falls back to [`GeneratorConfig::default`]. The CLI applies its flags on top of
//! whatever the file provides.
//!
//! ```toml
//! output_dir = "client"
//! models_module = "models"
//! enum_holder = "AllEnumsInfo"
//! strict = true
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::core::error::{Error, Result};
use crate::generation::utils::is_python_identifier;

/// Default name of the pseudo-schema that carries every enum definition
pub const DEFAULT_ENUM_HOLDER: &str = "AllEnumsInfo";

/// Configuration for one generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Directory the Python files are written to
    pub output_dir: PathBuf,
    /// Module holding the pydantic models
    pub models_module: String,
    /// Module holding the string enums
    pub enums_module: String,
    /// Module holding the async API functions
    pub apis_module: String,
    /// Module holding the request session helper (written once, never overwritten)
    pub session_module: String,
    /// Component schema whose properties describe enums instead of a model
    pub enum_holder: String,
    /// Base URL baked into the session helper when it is first created
    pub base_url: Option<String>,
    /// Fail the run when any diagnostic is reported
    pub strict: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            models_module: "models".to_string(),
            enums_module: "enums".to_string(),
            apis_module: "apis".to_string(),
            session_module: "request_session".to_string(),
            enum_holder: DEFAULT_ENUM_HOLDER.to_string(),
            base_url: None,
            strict: false,
        }
    }
}

impl GeneratorConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load a configuration file from disk
    pub async fn load(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading generator configuration");
        let content = tokio::fs::read_to_string(path).await?;
        Self::from_toml_str(&content)
    }

    /// Path of the `.py` file for a module inside the output directory
    pub fn module_path(&self, module: &str) -> PathBuf {
        self.output_dir.join(format!("{module}.py"))
    }

    /// Check module names are importable and distinct
    pub fn validate(&self) -> Result<()> {
        let modules = [
            ("models_module", &self.models_module),
            ("enums_module", &self.enums_module),
            ("apis_module", &self.apis_module),
            ("session_module", &self.session_module),
        ];

        let mut seen = HashSet::new();
        for (key, module) in modules {
            if module.is_empty() {
                return Err(Error::config(format!("{key} must not be empty")));
            }
            if !is_python_identifier(module) {
                return Err(Error::config(format!(
                    "{key} `{module}` is not a valid Python module name"
                )));
            }
            if !seen.insert(module.as_str()) {
                return Err(Error::config(format!(
                    "{key} `{module}` is used by more than one generated file"
                )));
            }
        }

        if self.enum_holder.trim().is_empty() {
            return Err(Error::config("enum_holder must not be empty"));
        }

        if let Some(base_url) = &self.base_url {
            Url::parse(base_url)
                .map_err(|e| Error::config(format!("base_url `{base_url}` is invalid: {e}")))?;
        }

        Ok(())
    }
}
