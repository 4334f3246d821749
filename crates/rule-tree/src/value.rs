//! Attribute values.
//!
//! `Value` is the composite-value model used for rule attributes and option
//! objects. Maps and lists carry a frozen bit set by [`deep_freeze`]; once
//! set, every mutating accessor returns [`FrozenError`].
//!
//! [`deep_freeze`]: crate::deep_freeze

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::Number;
use std::collections::BTreeMap;

use crate::error::{FrozenError, PatternError};
use crate::pattern::Pattern;

/// JSON key marking a pattern object: `{"$regex": "...", "$flags": "..."}`.
pub const REGEX_KEY: &str = "$regex";
/// JSON key carrying pattern flags.
pub const FLAGS_KEY: &str = "$flags";

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Pattern(Pattern),
    List(List),
    Map(Map),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_pattern(&self) -> Option<&Pattern> {
        match self {
            Value::Pattern(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a key when this value is a map.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// True for a map or list that has been frozen. Primitives report false
    /// even though they cannot be mutated through shared references.
    pub fn is_frozen(&self) -> bool {
        match self {
            Value::List(list) => list.is_frozen(),
            Value::Map(map) => map.is_frozen(),
            _ => false,
        }
    }

    /// Copy this value, dropping the frozen bit at every depth.
    pub fn deep_copy(&self) -> Value {
        match self {
            Value::List(list) => Value::List(list.deep_copy()),
            Value::Map(map) => Value::Map(map.deep_copy()),
            other => other.clone(),
        }
    }

    /// Convert from JSON. Objects shaped like `{"$regex": ..., "$flags": ...}`
    /// become patterns.
    pub fn from_json(json: serde_json::Value) -> Result<Value, PatternError> {
        Ok(match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => Value::List(
                items
                    .into_iter()
                    .map(Value::from_json)
                    .collect::<Result<List, _>>()?,
            ),
            serde_json::Value::Object(object) => {
                if let Some(pattern) = pattern_from_json(&object)? {
                    return Ok(Value::Pattern(pattern));
                }
                Value::Map(
                    object
                        .into_iter()
                        .map(|(k, v)| Ok::<_, PatternError>((k, Value::from_json(v)?)))
                        .collect::<Result<Map, PatternError>>()?,
                )
            }
        })
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Value::Number(n.clone()),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Pattern(p) => {
                let mut object = serde_json::Map::new();
                object.insert(REGEX_KEY.to_string(), p.source().into());
                object.insert(FLAGS_KEY.to_string(), p.flags().to_string().into());
                serde_json::Value::Object(object)
            }
            Value::List(list) => {
                serde_json::Value::Array(list.iter().map(Value::to_json).collect())
            }
            Value::Map(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }
}

fn pattern_from_json(
    object: &serde_json::Map<String, serde_json::Value>,
) -> Result<Option<Pattern>, PatternError> {
    let Some(source) = object.get(REGEX_KEY) else {
        return Ok(None);
    };
    let source = source
        .as_str()
        .ok_or_else(|| PatternError::MalformedLiteral(format!("{} must be a string", REGEX_KEY)))?;
    let flags = match object.get(FLAGS_KEY) {
        None => "",
        Some(flags) => flags.as_str().ok_or_else(|| {
            PatternError::MalformedLiteral(format!("{} must be a string", FLAGS_KEY))
        })?,
    };
    if object.keys().any(|k| k != REGEX_KEY && k != FLAGS_KEY) {
        return Err(PatternError::MalformedLiteral(format!(
            "unexpected keys next to {}",
            REGEX_KEY
        )));
    }
    Pattern::new(source, flags).map(Some)
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => n.serialize(serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::Pattern(p) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry(REGEX_KEY, p.source())?;
                map.serialize_entry(FLAGS_KEY, &p.flags().to_string())?;
                map.end()
            }
            Value::List(list) => {
                let mut seq = serializer.serialize_seq(Some(list.len()))?;
                for item in list.iter() {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map.iter() {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n.into())
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Number(n.into())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n.into())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Pattern> for Value {
    fn from(p: Pattern) -> Self {
        Value::Pattern(p)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Map(map)
    }
}

impl From<List> for Value {
    fn from(list: List) -> Self {
        Value::List(list)
    }
}

/// String-keyed composite. Equality ignores the frozen bit.
#[derive(Debug, Clone, Default)]
pub struct Map {
    entries: BTreeMap<String, Value>,
    frozen: bool,
}

impl Map {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Mutable access to an entry. Fails on a frozen map so that a frozen
    /// child can't be replaced wholesale through its parent.
    pub fn get_mut(&mut self, key: &str) -> Result<Option<&mut Value>, FrozenError> {
        self.check()?;
        Ok(self.entries.get_mut(key))
    }

    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Option<Value>, FrozenError> {
        self.check()?;
        Ok(self.entries.insert(key.into(), value.into()))
    }

    pub fn remove(&mut self, key: &str) -> Result<Option<Value>, FrozenError> {
        self.check()?;
        Ok(self.entries.remove(key))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn deep_copy(&self) -> Map {
        Map {
            entries: self
                .entries
                .iter()
                .map(|(k, v)| (k.clone(), v.deep_copy()))
                .collect(),
            frozen: false,
        }
    }

    pub(crate) fn freeze_with(&mut self, freeze: impl Fn(&mut Value)) {
        if self.frozen {
            // Children of a frozen map were frozen before it.
            return;
        }
        for value in self.entries.values_mut() {
            freeze(value);
        }
        self.frozen = true;
    }

    fn check(&self) -> Result<(), FrozenError> {
        if self.frozen {
            Err(FrozenError { kind: "map" })
        } else {
            Ok(())
        }
    }
}

impl PartialEq for Map {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Map {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Map {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            frozen: false,
        }
    }
}

/// Ordered composite. Equality ignores the frozen bit.
#[derive(Debug, Clone, Default)]
pub struct List {
    items: Vec<Value>,
    frozen: bool,
}

impl List {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Result<Option<&mut Value>, FrozenError> {
        self.check()?;
        Ok(self.items.get_mut(index))
    }

    pub fn push(&mut self, value: impl Into<Value>) -> Result<(), FrozenError> {
        self.check()?;
        self.items.push(value.into());
        Ok(())
    }

    /// Replace the element at `index`, returning the previous one.
    /// Out-of-range indices leave the list unchanged and return `None`.
    pub fn set(
        &mut self,
        index: usize,
        value: impl Into<Value>,
    ) -> Result<Option<Value>, FrozenError> {
        self.check()?;
        Ok(self
            .items
            .get_mut(index)
            .map(|slot| std::mem::replace(slot, value.into())))
    }

    pub fn remove(&mut self, index: usize) -> Result<Option<Value>, FrozenError> {
        self.check()?;
        if index < self.items.len() {
            Ok(Some(self.items.remove(index)))
        } else {
            Ok(None)
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    pub fn deep_copy(&self) -> List {
        List {
            items: self.items.iter().map(Value::deep_copy).collect(),
            frozen: false,
        }
    }

    pub(crate) fn freeze_with(&mut self, freeze: impl Fn(&mut Value)) {
        if self.frozen {
            return;
        }
        for value in &mut self.items {
            freeze(value);
        }
        self.frozen = true;
    }

    fn check(&self) -> Result<(), FrozenError> {
        if self.frozen {
            Err(FrozenError { kind: "list" })
        } else {
            Ok(())
        }
    }
}

impl PartialEq for List {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl FromIterator<Value> for List {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        List {
            items: iter.into_iter().collect(),
            frozen: false,
        }
    }
}
