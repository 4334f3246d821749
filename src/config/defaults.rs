//! Built-in rewire defaults (layer 1)

use once_cell::sync::Lazy;
use rule_tree::{Map, Value};
use serde::{Deserialize, Serialize};

/// Default options, frozen on first use so that merging can only ever copy
/// out of them.
pub static DEFAULT_OPTIONS: Lazy<Value> = Lazy::new(|| BuiltinDefaults::default().to_value().frozen());

/// Built-in default option values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinDefaults {
    /// Add SASS rules next to the CSS ones (default: false)
    pub sass: bool,

    /// Loader entry appended after postcss-loader in SASS rules
    /// (default: "sass-loader")
    pub sass_loader: String,

    /// css-loader `modules` option (default: true)
    pub modules: bool,

    /// css-loader `localIdentName` option (default: "[local]___[hash:base64:5]")
    pub local_ident_name: String,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        Self {
            sass: false,
            sass_loader: "sass-loader".to_string(),
            modules: true,
            local_ident_name: "[local]___[hash:base64:5]".to_string(),
        }
    }
}

impl BuiltinDefaults {
    /// Convert to an option value for merging
    pub fn to_value(&self) -> Value {
        let loader_options: Map = [
            ("modules", Value::from(self.modules)),
            ("localIdentName", Value::from(self.local_ident_name.as_str())),
        ]
        .into_iter()
        .collect();

        [
            ("sass", Value::from(self.sass)),
            ("sassLoader", Value::from(self.sass_loader.as_str())),
            ("loaderOptions", Value::from(loader_options)),
        ]
        .into_iter()
        .collect::<Map>()
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let defaults = BuiltinDefaults::default();
        assert!(!defaults.sass);
        assert_eq!(defaults.sass_loader, "sass-loader");
        assert!(defaults.modules);
        assert_eq!(defaults.local_ident_name, "[local]___[hash:base64:5]");
    }

    #[test]
    fn test_to_value() {
        let value = BuiltinDefaults::default().to_value();

        assert_eq!(value.get("sass"), Some(&Value::from(false)));
        let loader_options = value.get("loaderOptions").unwrap();
        assert_eq!(loader_options.get("modules"), Some(&Value::from(true)));
        assert_eq!(
            loader_options.get("localIdentName").and_then(Value::as_str),
            Some("[local]___[hash:base64:5]")
        );
    }

    #[test]
    fn test_static_is_frozen_throughout() {
        assert!(DEFAULT_OPTIONS.is_frozen());
        assert!(DEFAULT_OPTIONS.get("loaderOptions").unwrap().is_frozen());

        let mut copy = DEFAULT_OPTIONS.clone();
        assert!(copy.as_map_mut().unwrap().insert("sass", true).is_err());
    }
}
