//! In-place edits anchored on a matched rule.
//!
//! Every edit first searches the tree; only once an anchor is found is the
//! containing collection touched. A failed search leaves the tree as it was.
//!
//! The tree is edited through `&mut`, so a rewrite pass has a single owner
//! for its duration.

use log::debug;

use crate::error::TreeError;
use crate::matcher::{find_match, Location, RuleSourceMut};
use crate::node::Node;

/// Insert `value` directly after the first node matching `predicate`.
pub fn insert_after<S, F>(source: &mut S, predicate: F, value: Node) -> Result<(), TreeError>
where
    S: RuleSourceMut + ?Sized,
    F: Fn(&Node) -> bool,
{
    splice(source, predicate, value, 1)
}

/// Insert `value` directly before the first node matching `predicate`.
pub fn insert_before<S, F>(source: &mut S, predicate: F, value: Node) -> Result<(), TreeError>
where
    S: RuleSourceMut + ?Sized,
    F: Fn(&Node) -> bool,
{
    splice(source, predicate, value, 0)
}

/// Run `edit` on the first node matching `predicate` and return its result.
pub fn edit_rule<S, F, E, R>(source: &mut S, predicate: F, edit: E) -> Result<R, TreeError>
where
    S: RuleSourceMut + ?Sized,
    F: Fn(&Node) -> bool,
    E: FnOnce(&mut Node) -> Result<R, TreeError>,
{
    let location = anchor(&*source, predicate)?;
    let node = location
        .resolve(source)
        .and_then(|rules| rules.get_mut(location.index()))
        .ok_or(TreeError::NoMatch)?;
    edit(node)
}

fn splice<S, F>(source: &mut S, predicate: F, value: Node, offset: usize) -> Result<(), TreeError>
where
    S: RuleSourceMut + ?Sized,
    F: Fn(&Node) -> bool,
{
    let location = anchor(&*source, predicate)?;
    let rules = location.resolve(source).ok_or(TreeError::NoMatch)?;
    let at = location.index() + offset;
    debug!(
        "inserting rule at index {} of {} (depth {})",
        at,
        rules.len(),
        location.path().len()
    );
    rules.insert(at, value);
    Ok(())
}

fn anchor<S, F>(source: &S, predicate: F) -> Result<Location, TreeError>
where
    S: RuleSourceMut + ?Sized,
    F: Fn(&Node) -> bool,
{
    find_match(source, predicate)
        .map(|found| found.into_location())
        .ok_or(TreeError::NoMatch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use serde_json::json;

    fn rule(name: &str) -> Node {
        Node::from_json(json!({ "name": name })).unwrap()
    }

    fn named(name: &'static str) -> impl Fn(&Node) -> bool {
        move |node: &Node| node.attr("name").and_then(Value::as_str) == Some(name)
    }

    fn names(rules: &[Node]) -> Vec<&str> {
        rules
            .iter()
            .map(|node| node.attr("name").and_then(Value::as_str).unwrap_or("?"))
            .collect()
    }

    #[test]
    fn test_insert_after() {
        let mut rules = vec![rule("A"), rule("B"), rule("C")];
        insert_after(&mut rules, named("B"), rule("X")).unwrap();
        assert_eq!(names(&rules), vec!["A", "B", "X", "C"]);
    }

    #[test]
    fn test_insert_before() {
        let mut rules = vec![rule("A"), rule("B"), rule("C")];
        insert_before(&mut rules, named("B"), rule("X")).unwrap();
        assert_eq!(names(&rules), vec!["A", "X", "B", "C"]);
    }

    #[test]
    fn test_insert_at_edges() {
        let mut rules = vec![rule("A"), rule("B")];
        insert_before(&mut rules, named("A"), rule("first")).unwrap();
        insert_after(&mut rules, named("B"), rule("last")).unwrap();
        assert_eq!(names(&rules), vec!["first", "A", "B", "last"]);
    }

    #[test]
    fn test_insert_into_nested_collection() {
        let mut root = Node::from_json(json!({
            "oneOf": [
                {"name": "outer", "use": [{"name": "A"}, {"name": "B"}]},
                {"name": "C"}
            ]
        }))
        .unwrap();

        insert_after(&mut root, named("A"), rule("X")).unwrap();

        assert_eq!(names(root.children()), vec!["outer", "C"]);
        assert_eq!(names(root.children()[0].children()), vec!["A", "X", "B"]);
    }

    #[test]
    fn test_no_match_is_error_and_leaves_tree() {
        let mut rules = vec![rule("A"), rule("B"), rule("C")];
        let before = rules.clone();

        let after = insert_after(&mut rules, named("missing"), rule("X"));
        let ahead = insert_before(&mut rules, named("missing"), rule("X"));

        assert!(matches!(after, Err(TreeError::NoMatch)));
        assert!(matches!(ahead, Err(TreeError::NoMatch)));
        assert_eq!(rules, before);
    }

    #[test]
    fn test_insert_plain_into_chain() {
        let mut rule = Node::from_json(json!({
            "use": ["/a/style-loader/index.js", {"name": "postcss"}]
        }))
        .unwrap();

        insert_after(&mut rule, named("postcss"), Node::plain("/a/sass-loader/lib/loader.js")).unwrap();

        assert_eq!(
            rule.children().last(),
            Some(&Node::plain("/a/sass-loader/lib/loader.js"))
        );
    }

    #[test]
    fn test_edit_rule_mutates_in_place() {
        let mut rules = vec![rule("A"), rule("B")];
        let previous = edit_rule(&mut rules, named("B"), |node| {
            let rule = node
                .as_rule_mut()
                .ok_or_else(|| TreeError::MalformedNode("expected rule".to_string()))?;
            Ok(rule.set_attr("exclude", "x")?)
        })
        .unwrap();

        assert!(previous.is_none());
        assert_eq!(rules[1].attr("exclude"), Some(&Value::from("x")));
    }

    #[test]
    fn test_edit_rule_no_match() {
        let mut rules = vec![rule("A")];
        let result = edit_rule(&mut rules, named("Z"), |_| Ok(()));
        assert!(matches!(result, Err(TreeError::NoMatch)));
    }
}
