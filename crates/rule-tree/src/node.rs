//! Rule tree nodes.
//!
//! A rule exposes at most one child shape:
//! - `oneOf`: fan-out list, the first applicable child wins
//! - `use`: chain list, every child applies in sequence; a single loader
//!   string or object is read as a one-element chain
//! - `loader`: a scalar loader path (kept as an attribute) or a list of
//!   loader entries (the rule's children)
//!
//! Chains may also hold bare loader paths, represented as [`Node::Plain`].

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{FrozenError, TreeError};
use crate::value::{Map, Value};

pub const ONE_OF_KEY: &str = "oneOf";
pub const USE_KEY: &str = "use";
pub const LOADER_KEY: &str = "loader";

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A bare loader reference, such as `"/path/to/style-loader/index.js"`.
    Plain(String),
    Rule(Rule),
}

/// The child collection of a rule.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Children {
    #[default]
    None,
    OneOf(Vec<Node>),
    Use(Vec<Node>),
    Loaders(Vec<Node>),
}

impl Children {
    fn key(&self) -> Option<&'static str> {
        match self {
            Children::None => None,
            Children::OneOf(_) => Some(ONE_OF_KEY),
            Children::Use(_) => Some(USE_KEY),
            Children::Loaders(_) => Some(LOADER_KEY),
        }
    }

    pub fn as_slice(&self) -> &[Node] {
        match self {
            Children::None => &[],
            Children::OneOf(nodes) | Children::Use(nodes) | Children::Loaders(nodes) => nodes,
        }
    }

    pub(crate) fn as_vec_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Children::None => None,
            Children::OneOf(nodes) | Children::Use(nodes) | Children::Loaders(nodes) => {
                Some(nodes)
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rule {
    attrs: Map,
    children: Children,
    // `use` was written as a single entry rather than a list.
    scalar_chain: bool,
}

impl Rule {
    pub fn new(attrs: Map, children: Children) -> Self {
        Self {
            attrs,
            children,
            scalar_chain: false,
        }
    }

    /// A rule with attributes only.
    pub fn leaf(attrs: Map) -> Self {
        Self::new(attrs, Children::None)
    }

    pub fn attr(&self, key: &str) -> Option<&Value> {
        self.attrs.get(key)
    }

    pub fn attrs(&self) -> &Map {
        &self.attrs
    }

    pub fn set_attr(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Option<Value>, FrozenError> {
        self.attrs.insert(key, value)
    }

    pub fn remove_attr(&mut self, key: &str) -> Result<Option<Value>, FrozenError> {
        self.attrs.remove(key)
    }

    /// The scalar `loader` attribute, when present.
    pub fn loader(&self) -> Option<&str> {
        self.attr(LOADER_KEY).and_then(Value::as_str)
    }

    pub fn children(&self) -> &Children {
        &self.children
    }

    pub fn deep_copy(&self) -> Rule {
        Rule {
            attrs: self.attrs.deep_copy(),
            children: match &self.children {
                Children::None => Children::None,
                Children::OneOf(nodes) => Children::OneOf(copy_all(nodes)),
                Children::Use(nodes) => Children::Use(copy_all(nodes)),
                Children::Loaders(nodes) => Children::Loaders(copy_all(nodes)),
            },
            scalar_chain: self.scalar_chain,
        }
    }

    /// The serialized form of the children, if the rule has any shape.
    fn children_json(&self) -> Option<(&'static str, serde_json::Value)> {
        let key = self.children.key()?;
        let nodes = self.children.as_slice();
        let json = match nodes {
            [only] if self.scalar_chain => only.to_json(),
            _ => serde_json::Value::Array(nodes.iter().map(Node::to_json).collect()),
        };
        Some((key, json))
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        self.children.as_vec_mut()
    }
}

fn copy_all(nodes: &[Node]) -> Vec<Node> {
    nodes.iter().map(Node::deep_copy).collect()
}

impl Node {
    pub fn plain(loader: impl Into<String>) -> Self {
        Node::Plain(loader.into())
    }

    pub fn as_rule(&self) -> Option<&Rule> {
        match self {
            Node::Rule(rule) => Some(rule),
            Node::Plain(_) => None,
        }
    }

    pub fn as_rule_mut(&mut self) -> Option<&mut Rule> {
        match self {
            Node::Rule(rule) => Some(rule),
            Node::Plain(_) => None,
        }
    }

    pub fn attr(&self, key: &str) -> Option<&Value> {
        self.as_rule().and_then(|rule| rule.attr(key))
    }

    /// Children searched beneath this node. Plain entries and leaf rules have
    /// none.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Rule(rule) => rule.children.as_slice(),
            Node::Plain(_) => &[],
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Rule(rule) => rule.children_mut(),
            Node::Plain(_) => None,
        }
    }

    /// Copy this node with every attribute thawed.
    pub fn deep_copy(&self) -> Node {
        match self {
            Node::Plain(loader) => Node::Plain(loader.clone()),
            Node::Rule(rule) => Node::Rule(rule.deep_copy()),
        }
    }

    /// Build a node from JSON. Strings become plain entries and objects
    /// become rules; an object carrying more than one child shape is
    /// rejected.
    pub fn from_json(json: serde_json::Value) -> Result<Node, TreeError> {
        match json {
            serde_json::Value::String(loader) => Ok(Node::Plain(loader)),
            serde_json::Value::Object(mut object) => {
                let shapes: Vec<&str> = [ONE_OF_KEY, USE_KEY, LOADER_KEY]
                    .into_iter()
                    .filter(|key| match object.get(*key) {
                        Some(serde_json::Value::Array(_)) => true,
                        Some(_) => *key != LOADER_KEY,
                        None => false,
                    })
                    .collect();
                if shapes.len() > 1 {
                    return Err(TreeError::MalformedNode(format!(
                        "rule declares more than one child shape: {}",
                        shapes.join(", ")
                    )));
                }

                // Fan-out first, then chain, then loader list.
                let mut scalar_chain = false;
                let children = match shapes.first().copied() {
                    Some(ONE_OF_KEY) => Children::OneOf(nodes_from_json(object.remove(ONE_OF_KEY))?),
                    Some(USE_KEY) => match object.remove(USE_KEY) {
                        Some(entry @ (serde_json::Value::String(_) | serde_json::Value::Object(_))) => {
                            scalar_chain = true;
                            Children::Use(vec![Node::from_json(entry)?])
                        }
                        chain => Children::Use(nodes_from_json(chain)?),
                    },
                    Some(_) => Children::Loaders(nodes_from_json(object.remove(LOADER_KEY))?),
                    None => Children::None,
                };

                let attrs = match Value::from_json(serde_json::Value::Object(object))? {
                    Value::Map(map) => map,
                    _ => {
                        return Err(TreeError::MalformedNode(
                            "rule object parsed as a pattern".to_string(),
                        ))
                    }
                };
                Ok(Node::Rule(Rule {
                    attrs,
                    children,
                    scalar_chain,
                }))
            }
            other => Err(TreeError::MalformedNode(format!(
                "expected a rule object or loader string, got {}",
                other
            ))),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Node::Plain(loader) => serde_json::Value::String(loader.clone()),
            Node::Rule(rule) => {
                let mut object = match Value::Map(rule.attrs.clone()).to_json() {
                    serde_json::Value::Object(object) => object,
                    _ => serde_json::Map::new(),
                };
                if let Some((key, children)) = rule.children_json() {
                    object.insert(key.to_string(), children);
                }
                serde_json::Value::Object(object)
            }
        }
    }
}

/// Parse a JSON array of rules.
pub fn nodes_from_json(json: Option<serde_json::Value>) -> Result<Vec<Node>, TreeError> {
    match json {
        Some(serde_json::Value::Array(items)) => items.into_iter().map(Node::from_json).collect(),
        Some(other) => Err(TreeError::MalformedNode(format!(
            "expected an array of rules, got {}",
            other
        ))),
        None => Ok(Vec::new()),
    }
}

impl From<Rule> for Node {
    fn from(rule: Rule) -> Self {
        Node::Rule(rule)
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Plain(loader) => serializer.serialize_str(loader),
            Node::Rule(rule) => {
                let len = rule.attrs.len() + usize::from(rule.children.key().is_some());
                let mut map = serializer.serialize_map(Some(len))?;
                for (k, v) in rule.attrs.iter() {
                    map.serialize_entry(k, v)?;
                }
                if let Some((key, children)) = rule.children_json() {
                    map.serialize_entry(key, &children)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = serde_json::Value::deserialize(deserializer)?;
        Node::from_json(json).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::Pattern;
    use serde_json::json;

    #[test]
    fn test_chain_with_plain_entries() {
        let node = Node::from_json(json!({
            "test": {"$regex": "\\.css$"},
            "use": [
                "/path/to/style-loader/index.js",
                {"loader": "/path/to/css-loader/index.js", "options": {"importLoaders": 1}}
            ]
        }))
        .unwrap();

        let rule = node.as_rule().unwrap();
        assert!(matches!(rule.children(), Children::Use(_)));
        assert_eq!(
            rule.attr("test").and_then(Value::as_pattern),
            Some(&Pattern::new(r"\.css$", "").unwrap())
        );

        let chain = node.children();
        assert_eq!(chain[0], Node::plain("/path/to/style-loader/index.js"));
        assert_eq!(
            chain[1].as_rule().and_then(Rule::loader),
            Some("/path/to/css-loader/index.js")
        );
    }

    #[test]
    fn test_scalar_loader_stays_attribute() {
        let node = Node::from_json(json!({
            "loader": "/path/to/file-loader/dist/cjs.js",
            "options": {"name": "static/media/[name].[hash:8].[ext]"}
        }))
        .unwrap();

        let rule = node.as_rule().unwrap();
        assert_eq!(rule.children(), &Children::None);
        assert_eq!(rule.loader(), Some("/path/to/file-loader/dist/cjs.js"));
        assert!(node.children().is_empty());
    }

    #[test]
    fn test_loader_list_becomes_children() {
        let node = Node::from_json(json!({
            "loader": [{"loader": "/a/style-loader/index.js"}, {"loader": "/a/css-loader/index.js"}]
        }))
        .unwrap();

        assert!(matches!(node.as_rule().unwrap().children(), Children::Loaders(_)));
        assert_eq!(node.children().len(), 2);
        assert!(node.attr(LOADER_KEY).is_none());
    }

    #[test]
    fn test_string_use_is_single_entry_chain() {
        let json = json!({"test": {"$regex": "\\.txt$", "$flags": ""}, "use": "raw-loader"});
        let node = Node::from_json(json.clone()).unwrap();

        assert!(matches!(node.as_rule().unwrap().children(), Children::Use(_)));
        assert_eq!(node.children(), &[Node::plain("raw-loader")]);
        assert_eq!(node.to_json(), json);
        assert_eq!(serde_json::to_value(&node).unwrap(), json);
    }

    #[test]
    fn test_object_use_is_single_entry_chain() {
        let json = json!({"use": {"loader": "raw-loader", "options": {"esModule": false}}});
        let node = Node::from_json(json.clone()).unwrap();

        assert_eq!(node.children().len(), 1);
        assert_eq!(node.children()[0].as_rule().and_then(Rule::loader), Some("raw-loader"));
        assert_eq!(node.to_json(), json);
    }

    #[test]
    fn test_grown_scalar_chain_serializes_as_list() {
        let mut node = Node::from_json(json!({"use": "/a/style-loader/index.js"})).unwrap();
        node.children_mut().unwrap().push(Node::plain("/a/css-loader/index.js"));

        assert_eq!(
            node.to_json(),
            json!({"use": ["/a/style-loader/index.js", "/a/css-loader/index.js"]})
        );
    }

    #[test]
    fn test_multiple_shapes_rejected() {
        let result = Node::from_json(json!({
            "oneOf": [],
            "use": ["/a/style-loader/index.js"]
        }));
        assert!(matches!(result, Err(TreeError::MalformedNode(_))));
    }

    #[test]
    fn test_non_rule_entries_rejected() {
        assert!(matches!(
            Node::from_json(json!(42)),
            Err(TreeError::MalformedNode(_))
        ));
        assert!(matches!(
            Node::from_json(json!({"oneOf": "not-a-list"})),
            Err(TreeError::MalformedNode(_))
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let original = json!({
            "oneOf": [
                {"test": [{"$regex": "\\.png$", "$flags": ""}], "loader": "/a/url-loader/index.js"},
                {"test": {"$regex": "\\.css$", "$flags": ""}, "use": ["/a/style-loader/index.js"]}
            ]
        });
        let node: Node = serde_json::from_value(original.clone()).unwrap();
        assert_eq!(node.to_json(), original);
        assert_eq!(serde_json::to_value(&node).unwrap(), original);
    }

    #[test]
    fn test_deep_copy_is_independent() {
        let original = Node::from_json(json!({"use": [{"loader": "/a/css-loader/index.js"}]})).unwrap();
        let mut copy = original.deep_copy();
        copy.as_rule_mut()
            .unwrap()
            .set_attr("test", Pattern::new(r"\.module\.css$", "").unwrap())
            .unwrap();

        assert!(original.attr("test").is_none());
        assert!(copy.attr("test").is_some());
        assert_eq!(copy.children(), original.children());
    }
}
