//! Search and splice over webpack-style rule trees.
//!
//! A rule tree is an ordered collection of [`Node`]s, each possibly holding
//! children under a fan-out (`oneOf`), chain (`use`) or loader-list
//! (`loader`) shape. [`find_match`] locates the first node satisfying a
//! predicate in depth-first pre-order and reports its containing collection;
//! [`insert_before`], [`insert_after`] and [`edit_rule`] mutate that
//! collection in place. [`deep_freeze`] makes attribute values immutable so
//! shared defaults can't be edited by accident.
//!
//! Everything here is synchronous and single-owner: edits take `&mut` to the
//! tree and there is no internal locking.

mod editor;
mod error;
mod freeze;
mod matcher;
mod node;
mod pattern;
mod value;

pub use editor::{edit_rule, insert_after, insert_before};
pub use error::{FrozenError, PatternError, TreeError};
pub use freeze::deep_freeze;
pub use matcher::{find_match, find_rule, Location, MatchResult, RuleSource, RuleSourceMut};
pub use node::{nodes_from_json, Children, Node, Rule, LOADER_KEY, ONE_OF_KEY, USE_KEY};
pub use pattern::{Flags, Pattern};
pub use value::{List, Map, Value, FLAGS_KEY, REGEX_KEY};
