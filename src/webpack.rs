//! The slice of a webpack config the rewire reads.

use rule_tree::Node;
use serde::{Deserialize, Serialize};

/// A webpack configuration. Only `module.rules` is interpreted; every other
/// key is carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebpackConfig {
    #[serde(default)]
    pub module: ModuleConfig,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleConfig {
    #[serde(default)]
    pub rules: Vec<Node>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl WebpackConfig {
    pub fn from_rules(rules: Vec<Node>) -> Self {
        Self {
            module: ModuleConfig {
                rules,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_keys_survive() {
        let config = WebpackConfig::from_json_str(
            r#"{
                "mode": "development",
                "module": {"strictExportPresence": true, "rules": [{"loader": "/a/file-loader/index.js"}]}
            }"#,
        )
        .unwrap();

        assert_eq!(config.module.rules.len(), 1);
        assert_eq!(config.extra["mode"], "development");

        let json: serde_json::Value = serde_json::from_str(&config.to_json().unwrap()).unwrap();
        assert_eq!(json["module"]["strictExportPresence"], true);
        assert_eq!(json["module"]["rules"][0]["loader"], "/a/file-loader/index.js");
    }

    #[test]
    fn test_malformed_rule_rejected() {
        let result = WebpackConfig::from_json_str(r#"{"module": {"rules": [{"oneOf": [], "use": []}]}}"#);
        assert!(result.is_err());
    }
}
