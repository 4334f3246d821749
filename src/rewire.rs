//! Adds CSS modules (and optionally SASS) rules next to the stock CSS rule.

use log::debug;
use rule_tree::{
    edit_rule, find_rule, insert_after, insert_before, Map, Node, Pattern, TreeError,
    Value,
};

use crate::config::RewireOptions;
use crate::matchers::{
    is_css_loader, is_css_rule, is_file_loader, is_postcss_loader, CSS_MODULE_FILE_MATCHER,
    SASS_FILE_MATCHER, SASS_MODULE_FILE_MATCHER,
};
use crate::webpack::WebpackConfig;

#[derive(Debug, thiserror::Error)]
pub enum RewireError {
    /// An anchor the rewire relies on is absent from the tree.
    #[error("no {0} found in the rule tree")]
    MissingRule(&'static str),

    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// Rewire `config.module.rules` in place.
pub fn rewire(config: &mut WebpackConfig, options: &RewireOptions) -> Result<(), RewireError> {
    rewire_rules(&mut config.module.rules, options)
}

/// Rewire a rule collection in place.
///
/// Afterwards the CSS rule excludes `*.module.css`, and a modules variant
/// sits right before the file-loader rule. With `options.sass`, SASS and
/// SASS modules variants follow it, each with the sass loader chained after
/// postcss-loader.
pub fn rewire_rules(rules: &mut Vec<Node>, options: &RewireOptions) -> Result<(), RewireError> {
    let css_rule =
        find_rule(rules.as_slice(), is_css_rule).ok_or(RewireError::MissingRule("CSS rule"))?;

    // Check every anchor up front so a failed pass leaves the tree untouched.
    find_rule(css_rule, is_css_loader).ok_or(RewireError::MissingRule("css-loader entry"))?;
    if options.sass {
        find_rule(css_rule, is_postcss_loader)
            .ok_or(RewireError::MissingRule("postcss-loader entry"))?;
    }
    find_rule(rules.as_slice(), is_file_loader)
        .ok_or(RewireError::MissingRule("file-loader rule"))?;

    let sass_rule = css_rule.deep_copy();
    let mut css_modules_rule = css_rule.deep_copy();

    edit_rule(rules, is_css_rule, |node| {
        set_pattern(node, "exclude", &CSS_MODULE_FILE_MATCHER)
    })?;

    set_pattern(&mut css_modules_rule, "test", &CSS_MODULE_FILE_MATCHER)?;
    edit_rule(&mut css_modules_rule, is_css_loader, |loader| {
        overlay_options(loader, &options.loader_options)
    })
    .map_err(missing("css-loader entry"))?;

    debug!("adding CSS modules rule");
    let sass_modules_rule = options.sass.then(|| css_modules_rule.clone());
    insert_before(rules, is_file_loader, css_modules_rule).map_err(missing("file-loader rule"))?;

    if let Some(sass_modules_rule) = sass_modules_rule {
        debug!("adding SASS rules using {}", options.sass_loader);
        let mut sass_rule = sass_rule;
        set_pattern(&mut sass_rule, "test", &SASS_FILE_MATCHER)?;
        set_pattern(&mut sass_rule, "exclude", &SASS_MODULE_FILE_MATCHER)?;
        add_sass_loader(rules, sass_rule, options)?;

        let mut sass_modules_rule = sass_modules_rule;
        set_pattern(&mut sass_modules_rule, "test", &SASS_MODULE_FILE_MATCHER)?;
        add_sass_loader(rules, sass_modules_rule, options)?;
    }

    Ok(())
}

fn add_sass_loader(
    rules: &mut Vec<Node>,
    mut rule: Node,
    options: &RewireOptions,
) -> Result<(), RewireError> {
    insert_after(&mut rule, is_postcss_loader, Node::plain(options.sass_loader.as_str()))
        .map_err(missing("postcss-loader entry"))?;
    insert_before(rules, is_file_loader, rule).map_err(missing("file-loader rule"))?;
    Ok(())
}

fn set_pattern(node: &mut Node, key: &str, pattern: &Pattern) -> Result<(), TreeError> {
    let rule = node
        .as_rule_mut()
        .ok_or_else(|| TreeError::MalformedNode(format!("cannot set {} on a plain entry", key)))?;
    rule.set_attr(key, pattern.clone())?;
    Ok(())
}

/// Replace the loader's `options` with its existing options overlaid by
/// `overlay`. Neither input map is modified.
fn overlay_options(node: &mut Node, overlay: &Map) -> Result<(), TreeError> {
    let rule = node
        .as_rule_mut()
        .ok_or_else(|| TreeError::MalformedNode("css-loader entry is a plain path".to_string()))?;
    let mut merged = match rule.attr("options") {
        Some(Value::Map(existing)) => existing.deep_copy(),
        _ => Map::new(),
    };
    for (key, value) in overlay.iter() {
        merged.insert(key.clone(), value.deep_copy())?;
    }
    rule.set_attr("options", merged)?;
    Ok(())
}

fn missing(anchor: &'static str) -> impl Fn(TreeError) -> RewireError {
    move |err| match err {
        TreeError::NoMatch => RewireError::MissingRule(anchor),
        other => RewireError::Tree(other),
    }
}
