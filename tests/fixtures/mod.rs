//! Shared webpack config fixtures
//!
//! Two stock shapes of the CSS rule:
//! - development: a `use` chain with a bare style-loader path
//! - production: a `loader` list with extract-text in front

use css_modules_rewire::WebpackConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Path to the webpack fixture directory
pub fn webpack_fixtures_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/webpack")
}

fn load(name: &str) -> WebpackConfig {
    let path = webpack_fixtures_path().join(name);
    let json = fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read {}: {}", path.display(), e));
    WebpackConfig::from_json_str(&json)
        .unwrap_or_else(|e| panic!("failed to parse {}: {}", path.display(), e))
}

pub fn development_config() -> WebpackConfig {
    load("development.config.json")
}

pub fn production_config() -> WebpackConfig {
    load("production.config.json")
}
