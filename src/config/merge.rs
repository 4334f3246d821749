//! Option merge logic
//!
//! Defaults fill in what the caller left out:
//! - Maps: deep-merge by key, caller keys win
//! - Lists and scalars: caller value wins outright
//! - Null from the caller is kept, not replaced by the default

use rule_tree::Value;

/// Merge `defaults` underneath `options` into a new value.
///
/// Neither input is touched and every value in the result is a deep copy,
/// so the result is mutable even when either input is frozen.
pub fn merge_defaults(options: &Value, defaults: &Value) -> Value {
    match (options, defaults) {
        // Both maps: caller keys first, then the defaults they left out
        (Value::Map(option_map), Value::Map(default_map)) => {
            let merged = option_map.iter().map(|(key, option_value)| {
                let value = match default_map.get(key) {
                    Some(default_value) => merge_defaults(option_value, default_value),
                    None => option_value.deep_copy(),
                };
                (key.clone(), value)
            });
            let filled = default_map
                .iter()
                .filter(|(key, _)| !option_map.contains_key(key))
                .map(|(key, default_value)| (key.clone(), default_value.deep_copy()));
            Value::Map(merged.chain(filled).collect())
        }

        // Anything else: the caller's value stands
        (options, _) => options.deep_copy(),
    }
}
