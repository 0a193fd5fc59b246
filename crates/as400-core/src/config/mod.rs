//! Connection configuration for the AS/400 adapter.
//!
//! The configuration is owned by the caller and only read by the adapter.
//! It can be built in code or loaded from YAML:
//!
//! ```yaml
//! schema: MYLIB
//! current_library: MYLIB
//! driver: toolbox
//! emulate_booleans: true
//! ```

pub mod driver;

pub use driver::DriverKind;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Settings consumed when a connection is set up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct As400Config {
    /// Explicit schema. When set, the session is switched to SQL naming
    /// with `SET SCHEMA` and the remote system is never asked for it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Library made current with `CHGCURLIB` at connection start.
    /// Used as the default namespace in system naming mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_library: Option<String>,

    /// JDBC driver to load.
    #[serde(default)]
    pub driver: DriverKind,

    /// Map `SMALLINT` columns to booleans.
    #[serde(default = "default_true")]
    pub emulate_booleans: bool,
}

impl Default for As400Config {
    fn default() -> Self {
        Self {
            schema: None,
            current_library: None,
            driver: DriverKind::default(),
            emulate_booleans: default_true(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn is_system_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '$' | '#' | '@' | '_' | '.'))
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl As400Config {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the names that end up inside generated statements.
    ///
    /// Library names are system names: at most ten characters of letters,
    /// digits, `$ # @ _ .`, or a `*` special value such as `*CRTDFT`. Schema
    /// names follow the same alphabet with up to 128 characters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(lib) = &self.current_library {
            let lib = lib.trim();
            if lib.is_empty() {
                return Err(ConfigError::Config(
                    "current_library must not be blank".to_string(),
                ));
            }
            let name = lib.strip_prefix('*').unwrap_or(lib);
            if lib.len() > 10 || !is_system_name(name) {
                return Err(ConfigError::Config(format!(
                    "invalid current_library '{}'",
                    lib
                )));
            }
        }
        if let Some(schema) = self.explicit_schema()
            && (schema.len() > 128 || !is_system_name(schema))
        {
            return Err(ConfigError::Config(format!("invalid schema '{}'", schema)));
        }
        Ok(())
    }

    /// The configured schema, treating blank values as absent.
    pub fn explicit_schema(&self) -> Option<&str> {
        self.schema
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// The configured current library, if any.
    pub fn current_library(&self) -> Option<&str> {
        self.current_library
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
