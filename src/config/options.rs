//! Resolved rewire options with provenance
//!
//! Options are the defaults overlaid by caller overrides. When loaded from a
//! file, the source records where the overrides came from and a digest of
//! the raw bytes.

use rule_tree::{Map, Value};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

use super::defaults::{BuiltinDefaults, DEFAULT_OPTIONS};
use super::merge::merge_defaults;

/// Origin of an options source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum OptionsOrigin {
    Builtin,
    File,
}

/// A contributing options source with provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsSource {
    /// Origin of this source
    pub origin: OptionsOrigin,

    /// File path (None for builtin)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 digest of raw file bytes (None for builtin)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// Options for a rewire pass
#[derive(Debug, Clone, PartialEq)]
pub struct RewireOptions {
    /// Add SASS and SASS modules rules
    pub sass: bool,

    /// Loader entry inserted after postcss-loader in SASS rules
    pub sass_loader: String,

    /// Options laid over css-loader's own options in the modules rules
    pub loader_options: Map,
}

/// Options resolved from a file, with their sources in precedence order
#[derive(Debug, Clone)]
pub struct LoadedOptions {
    pub options: RewireOptions,
    pub sources: Vec<OptionsSource>,
}

impl Default for RewireOptions {
    fn default() -> Self {
        let defaults = BuiltinDefaults::default();
        let loader_options = defaults
            .to_value()
            .get("loaderOptions")
            .and_then(Value::as_map)
            .cloned()
            .unwrap_or_default();
        Self {
            sass: defaults.sass,
            sass_loader: defaults.sass_loader,
            loader_options,
        }
    }
}

impl RewireOptions {
    /// Merge `overrides` over the built-in defaults and validate.
    pub fn resolve(overrides: Option<Value>) -> Result<Self, ConfigError> {
        let overrides = overrides.unwrap_or_else(|| Value::Map(Map::new()));
        if overrides.as_map().is_none() {
            return Err(ConfigError::ValidationError(
                "options must be a table".to_string(),
            ));
        }
        Self::from_value(&merge_defaults(&overrides, &DEFAULT_OPTIONS))
    }

    /// Parse TOML overrides and resolve them.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let value = Self::parse_toml(contents)?;
        Self::resolve(Some(value))
    }

    /// Load overrides from a TOML file.
    pub fn load(path: &Path) -> Result<LoadedOptions, ConfigError> {
        let bytes = fs::read(path)
            .map_err(|e| ConfigError::IoError(format!("{}: {}", path.display(), e)))?;
        let digest = hex::encode(Sha256::digest(&bytes));

        let contents = std::str::from_utf8(&bytes).map_err(|e| {
            ConfigError::ParseError(format!("{} is not UTF-8: {}", path.display(), e))
        })?;
        let options = Self::from_toml_str(contents)?;

        log::debug!("loaded rewire options from {} ({})", path.display(), &digest[..12]);

        Ok(LoadedOptions {
            options,
            sources: vec![
                OptionsSource {
                    origin: OptionsOrigin::Builtin,
                    path: None,
                    digest: None,
                },
                OptionsSource {
                    origin: OptionsOrigin::File,
                    path: Some(path.to_string_lossy().to_string()),
                    digest: Some(digest),
                },
            ],
        })
    }

    /// Read options out of a merged value. An explicit null `sass` reads as
    /// `false`.
    fn from_value(value: &Value) -> Result<Self, ConfigError> {
        let sass = match value.get("sass") {
            Some(Value::Bool(sass)) => *sass,
            Some(Value::Null) | None => false,
            Some(_) => {
                return Err(ConfigError::ValidationError(
                    "sass must be a boolean".to_string(),
                ))
            }
        };

        let sass_loader = value
            .get("sassLoader")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                ConfigError::ValidationError("sassLoader must be a non-empty string".to_string())
            })?;

        let loader_options = value
            .get("loaderOptions")
            .and_then(Value::as_map)
            .ok_or_else(|| {
                ConfigError::ValidationError("loaderOptions must be a table".to_string())
            })?;

        Ok(Self {
            sass,
            sass_loader: sass_loader.to_string(),
            loader_options: loader_options.clone(),
        })
    }

    fn parse_toml(contents: &str) -> Result<Value, ConfigError> {
        let toml_value: toml::Value = toml::from_str(contents)
            .map_err(|e| ConfigError::ParseError(format!("TOML parse error: {}", e)))?;
        Self::toml_to_value(toml_value)
    }

    /// Convert a TOML value to an option value. Non-finite floats have no
    /// option equivalent and are rejected.
    fn toml_to_value(toml: toml::Value) -> Result<Value, ConfigError> {
        Ok(match toml {
            toml::Value::String(s) => Value::String(s),
            toml::Value::Integer(i) => Value::from(i),
            toml::Value::Float(f) => serde_json::Number::from_f64(f)
                .map(Value::Number)
                .ok_or_else(|| ConfigError::ParseError(format!("unsupported float value {}", f)))?,
            toml::Value::Boolean(b) => Value::Bool(b),
            toml::Value::Datetime(dt) => Value::String(dt.to_string()),
            toml::Value::Array(items) => Value::List(
                items
                    .into_iter()
                    .map(Self::toml_to_value)
                    .collect::<Result<_, _>>()?,
            ),
            toml::Value::Table(table) => Value::Map(
                table
                    .into_iter()
                    .map(|(key, item)| Ok((key, Self::toml_to_value(item)?)))
                    .collect::<Result<_, ConfigError>>()?,
            ),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
