//! Recursive immutability for attribute values.

use crate::value::Value;

/// Freeze `value` and everything reachable from it, in place.
///
/// Children are frozen before their parent. Primitives and already frozen
/// composites are left as they are, so repeated calls are harmless. Returns
/// the value for chaining.
pub fn deep_freeze(value: &mut Value) -> &mut Value {
    match value {
        Value::Map(map) => map.freeze_with(freeze_child),
        Value::List(list) => list.freeze_with(freeze_child),
        Value::Null
        | Value::Bool(_)
        | Value::Number(_)
        | Value::String(_)
        | Value::Pattern(_) => {}
    }
    value
}

fn freeze_child(value: &mut Value) {
    deep_freeze(value);
}

impl Value {
    /// Consuming form of [`deep_freeze`], handy for statics.
    pub fn frozen(mut self) -> Value {
        deep_freeze(&mut self);
        self
    }
}
