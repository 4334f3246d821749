//! CSS Modules rewire for webpack configurations
//!
//! This crate rewrites a webpack `module.rules` tree so that `*.module.css`
//! files (and, optionally, `*.scss`/`*.sass` and their module variants) get
//! their own rules, built from the existing CSS rule. Tree search and
//! splicing live in the [`rule_tree`] crate; this crate supplies the
//! predicates, the option defaults and the rewire pass.

pub mod config;
pub mod matchers;
mod rewire;
mod webpack;

pub use config::{ConfigError, LoadedOptions, RewireOptions};
pub use rewire::{rewire, rewire_rules, RewireError};
pub use webpack::{ModuleConfig, WebpackConfig};

pub use rule_tree;
