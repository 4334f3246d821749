//! Rewire options
//!
//! Options resolve in two layers:
//! 1. Built-in defaults (frozen, shared by every call)
//! 2. Caller overrides, either as a value or a TOML file
//!
//! Overrides win key by key; anything they leave out comes from the defaults.

mod defaults;
mod merge;
mod options;

pub use defaults::{BuiltinDefaults, DEFAULT_OPTIONS};
pub use merge::merge_defaults;
pub use options::{ConfigError, LoadedOptions, OptionsOrigin, OptionsSource, RewireOptions};
