//! Rule predicates for the stock style rules.

use once_cell::sync::Lazy;
use rule_tree::{Node, Pattern, Value};

fn pattern(source: &str) -> Pattern {
    Pattern::new(source, "").expect("built-in pattern has no flags")
}

pub static CSS_FILE_MATCHER: Lazy<Pattern> = Lazy::new(|| pattern(r"\.css$"));
pub static CSS_MODULE_FILE_MATCHER: Lazy<Pattern> = Lazy::new(|| pattern(r"\.module\.css$"));
pub static SASS_FILE_MATCHER: Lazy<Pattern> = Lazy::new(|| pattern(r"\.s[ac]ss$"));
pub static SASS_MODULE_FILE_MATCHER: Lazy<Pattern> = Lazy::new(|| pattern(r"\.module\.s[ac]ss$"));

/// Does the node's `test` attribute equal `pattern` (source and flags)?
pub fn test_equals(node: &Node, pattern: &Pattern) -> bool {
    node.attr("test").and_then(Value::as_pattern) == Some(pattern)
}

/// Does the node's scalar `loader` path name `loader_name` as a package
/// directory, e.g. `/path/to/css-loader/index.js` or `@scope/css-loader/...`?
/// Both `/` and `\` are accepted as separators.
pub fn loader_name_matches(node: &Node, loader_name: &str) -> bool {
    let Some(loader) = node.as_rule().and_then(|rule| rule.loader()) else {
        return false;
    };
    ['/', '\\'].into_iter().any(|sep| {
        loader.contains(&format!("{sep}{loader_name}{sep}"))
            || loader.contains(&format!("@{loader_name}{sep}"))
    })
}

/// A predicate matching rules that use the named loader.
pub fn loader_matcher(loader_name: &str) -> impl Fn(&Node) -> bool + '_ {
    move |node: &Node| loader_name_matches(node, loader_name)
}

pub fn is_css_rule(node: &Node) -> bool {
    test_equals(node, &CSS_FILE_MATCHER)
}

pub fn is_css_loader(node: &Node) -> bool {
    loader_name_matches(node, "css-loader")
}

pub fn is_postcss_loader(node: &Node) -> bool {
    loader_name_matches(node, "postcss-loader")
}

pub fn is_file_loader(node: &Node) -> bool {
    loader_name_matches(node, "file-loader")
}
