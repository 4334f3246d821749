//! Depth-first rule lookup.
//!
//! Search is pre-order: within a collection each candidate is tested before
//! its descendants, and a candidate's whole subtree is explored before the
//! next sibling. The first hit stops the search.

use log::trace;

use crate::node::{Node, Rule};

/// Something that exposes an ordered collection of rules to search.
///
/// A collection is searched directly; a node is searched through its
/// children.
pub trait RuleSource {
    fn rules(&self) -> &[Node];
}

/// A rule source whose collection can be spliced by the editor.
pub trait RuleSourceMut: RuleSource {
    fn rules_mut(&mut self) -> Option<&mut Vec<Node>>;
}

impl RuleSource for [Node] {
    fn rules(&self) -> &[Node] {
        self
    }
}

impl RuleSource for Vec<Node> {
    fn rules(&self) -> &[Node] {
        self
    }
}

impl RuleSourceMut for Vec<Node> {
    fn rules_mut(&mut self) -> Option<&mut Vec<Node>> {
        Some(self)
    }
}

impl RuleSource for Node {
    fn rules(&self) -> &[Node] {
        self.children()
    }
}

impl RuleSourceMut for Node {
    fn rules_mut(&mut self) -> Option<&mut Vec<Node>> {
        self.children_mut()
    }
}

impl RuleSource for Rule {
    fn rules(&self) -> &[Node] {
        self.children().as_slice()
    }
}

impl RuleSourceMut for Rule {
    fn rules_mut(&mut self) -> Option<&mut Vec<Node>> {
        self.children_mut()
    }
}

/// Position of a match relative to the searched source: the child indices
/// leading to the containing collection, then the index within it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    path: Vec<usize>,
    index: usize,
}

impl Location {
    /// Indices of the ancestors between the source and the containing
    /// collection. Empty when the match sits directly in the source.
    pub fn path(&self) -> &[usize] {
        &self.path
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn resolve<'a, S>(&self, source: &'a mut S) -> Option<&'a mut Vec<Node>>
    where
        S: RuleSourceMut + ?Sized,
    {
        let mut rules = source.rules_mut()?;
        for &step in &self.path {
            rules = rules.get_mut(step)?.children_mut()?;
        }
        Some(rules)
    }
}

/// A match: the collection holding the matched node and its index there.
#[derive(Debug, Clone)]
pub struct MatchResult<'a> {
    collection: &'a [Node],
    location: Location,
}

impl<'a> MatchResult<'a> {
    /// The collection that contains the match, borrowed from the tree.
    pub fn collection(&self) -> &'a [Node] {
        self.collection
    }

    pub fn index(&self) -> usize {
        self.location.index
    }

    pub fn node(&self) -> &'a Node {
        &self.collection[self.location.index]
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn into_location(self) -> Location {
        self.location
    }
}

/// Find the first node satisfying `predicate`, returning it together with
/// its containing collection. `None` when nothing in the tree matches.
pub fn find_match<'a, S, F>(source: &'a S, predicate: F) -> Option<MatchResult<'a>>
where
    S: RuleSource + ?Sized,
    F: Fn(&Node) -> bool,
{
    let mut path = Vec::new();
    let (collection, index) = locate(source.rules(), &predicate, &mut path)?;
    trace!("rule matched at depth {} index {}", path.len(), index);
    Some(MatchResult {
        collection,
        location: Location { path, index },
    })
}

/// Find the first node satisfying `predicate`.
pub fn find_rule<'a, S, F>(source: &'a S, predicate: F) -> Option<&'a Node>
where
    S: RuleSource + ?Sized,
    F: Fn(&Node) -> bool,
{
    find_match(source, predicate).map(|found| found.node())
}

fn locate<'a, F>(
    rules: &'a [Node],
    predicate: &F,
    path: &mut Vec<usize>,
) -> Option<(&'a [Node], usize)>
where
    F: Fn(&Node) -> bool,
{
    for (index, node) in rules.iter().enumerate() {
        if predicate(node) {
            return Some((rules, index));
        }
        path.push(index);
        if let Some(found) = locate(node.children(), predicate, path) {
            return Some(found);
        }
        path.pop();
    }
    None
}
