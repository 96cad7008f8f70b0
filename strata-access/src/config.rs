//! Configuration management using Figment
//!
//! Configuration is loaded from multiple sources with the following
//! precedence (highest to lowest):
//! 1. Environment variables (prefix: STRATA_, nested keys split on `__`)
//! 2. Current working directory: ./strata.toml
//! 3. Default values

use figment::{
    providers::{Data, Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{AccessError, Result};

/// Main configuration structure
///
/// # Example
///
/// ```rust
/// use strata_access::config::AccessConfig;
///
/// let config = AccessConfig::default();
/// assert_eq!(config.engine.default_page_size, 20);
/// assert_eq!(config.log_level, "info");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessConfig {
    /// Engine tunables
    #[serde(default)]
    pub engine: EngineConfig,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Engine-level tunables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Page size used when a page request does not specify one
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    /// Upper bound applied to requested page sizes
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl AccessConfig {
    /// Load configuration from defaults, `./strata.toml`, and `STRATA_*`
    /// environment variables
    pub fn load() -> Result<Self> {
        Self::figment(Toml::file("strata.toml")).extract().map_err(config_error)
    }

    /// Load configuration with an explicit TOML file path
    ///
    /// File values still sit between defaults and environment overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        Self::figment(Toml::file(path.as_ref())).extract().map_err(config_error)
    }

    fn figment(file: Data<Toml>) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(file)
            .merge(Env::prefixed("STRATA_").split("__"))
    }
}

fn config_error(error: figment::Error) -> AccessError {
    AccessError::Configuration(error.to_string())
}

fn default_log_level() -> String {
    "info".to_string()
}

const fn default_page_size() -> u32 {
    20
}

const fn default_max_page_size() -> u32 {
    100
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = AccessConfig::default();
        assert_eq!(config.engine.default_page_size, 20);
        assert_eq!(config.engine.max_page_size, 100);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        let config = AccessConfig::load_from("/nonexistent/strata.toml").unwrap();
        assert_eq!(config, AccessConfig::default());
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "log_level = \"debug\"\n\n[engine]\ndefault_page_size = 25"
        )
        .unwrap();
        let config = AccessConfig::load_from(file.path()).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.engine.default_page_size, 25);
        // Unset keys keep their defaults.
        assert_eq!(config.engine.max_page_size, 100);
    }

    #[test]
    fn test_malformed_file_is_configuration_error() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "log_level = [this is not toml").unwrap();
        let err = AccessConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, AccessError::Configuration(_)));
    }
}
