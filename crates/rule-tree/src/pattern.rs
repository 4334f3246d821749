//! Regular-expression attribute values.
//!
//! Rule attributes such as `test` and `exclude` hold patterns written in
//! JavaScript literal form (`/\.css$/i`). Two patterns are equal when their
//! source text and every flag bit match; the compiled matcher is not compared.

use once_cell::sync::OnceCell;
use regex_lite::{Regex, RegexBuilder};
use std::fmt;

use crate::error::PatternError;

/// Pattern flags, in canonical JavaScript order `gimsuy`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Flags {
    pub global: bool,
    pub ignore_case: bool,
    pub multiline: bool,
    pub dot_all: bool,
    pub unicode: bool,
    pub sticky: bool,
}

impl Flags {
    /// Parse a flag string such as `"gi"`.
    pub fn parse(flags: &str) -> Result<Self, PatternError> {
        let mut parsed = Flags::default();
        for c in flags.chars() {
            let slot = match c {
                'g' => &mut parsed.global,
                'i' => &mut parsed.ignore_case,
                'm' => &mut parsed.multiline,
                's' => &mut parsed.dot_all,
                'u' => &mut parsed.unicode,
                'y' => &mut parsed.sticky,
                other => return Err(PatternError::UnknownFlag(other)),
            };
            if *slot {
                return Err(PatternError::DuplicateFlag(c));
            }
            *slot = true;
        }
        Ok(parsed)
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bits = [
            (self.global, 'g'),
            (self.ignore_case, 'i'),
            (self.multiline, 'm'),
            (self.dot_all, 's'),
            (self.unicode, 'u'),
            (self.sticky, 'y'),
        ];
        for (set, c) in bits {
            if set {
                write!(f, "{}", c)?;
            }
        }
        Ok(())
    }
}

/// A pattern identified by its source text and flags.
///
/// The source is kept as written and only compiled when [`Pattern::is_match`]
/// is first called, so syntax the matcher engine lacks (look-around,
/// backreferences) never stops a tree from loading.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    flags: Flags,
    compiled: OnceCell<Regex>,
}

impl Pattern {
    /// Build a pattern from `source` and a flag string such as `"gi"`.
    pub fn new(source: &str, flags: &str) -> Result<Self, PatternError> {
        Ok(Self::with_flags(source, Flags::parse(flags)?))
    }

    pub fn with_flags(source: &str, flags: Flags) -> Self {
        Self {
            source: source.to_string(),
            flags,
            compiled: OnceCell::new(),
        }
    }

    /// Parse a literal of the form `/source/flags`.
    pub fn parse(literal: &str) -> Result<Self, PatternError> {
        let body = literal
            .strip_prefix('/')
            .ok_or_else(|| PatternError::MalformedLiteral(literal.to_string()))?;
        let end = body
            .rfind('/')
            .ok_or_else(|| PatternError::MalformedLiteral(literal.to_string()))?;
        let (source, flags) = (&body[..end], &body[end + 1..]);
        if source.is_empty() {
            return Err(PatternError::MalformedLiteral(literal.to_string()));
        }
        Self::new(source, flags)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// Test `haystack` against the pattern, compiling it on first use.
    pub fn is_match(&self, haystack: &str) -> Result<bool, PatternError> {
        Ok(self.regex()?.is_match(haystack))
    }

    fn regex(&self) -> Result<&Regex, PatternError> {
        self.compiled.get_or_try_init(|| {
            // global, unicode and sticky only affect iteration state in JS.
            RegexBuilder::new(&self.source)
                .case_insensitive(self.flags.ignore_case)
                .multi_line(self.flags.multiline)
                .dot_matches_new_line(self.flags.dot_all)
                .build()
                .map_err(|e| PatternError::InvalidSource {
                    pattern: self.source.clone(),
                    message: e.to_string(),
                })
        })
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.flags == other.flags
    }
}

impl Eq for Pattern {}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.source, self.flags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_source_and_flags() {
        let a = Pattern::new(r"\.css$", "").unwrap();
        let b = Pattern::parse(r"/\.css$/").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_differing_flags_not_equal() {
        let plain = Pattern::new(r"\.css$", "").unwrap();
        for flags in ["g", "i", "m", "gim"] {
            let flagged = Pattern::new(r"\.css$", flags).unwrap();
            assert_ne!(plain, flagged, "flags {:?} should break equality", flags);
        }
    }

    #[test]
    fn test_differing_source_not_equal() {
        let css = Pattern::new(r"\.css$", "").unwrap();
        let module = Pattern::new(r"\.module\.css$", "").unwrap();
        assert_ne!(css, module);
    }

    #[test]
    fn test_is_match_respects_ignore_case() {
        let strict = Pattern::new(r"\.css$", "").unwrap();
        let loose = Pattern::new(r"\.css$", "i").unwrap();
        assert_eq!(strict.is_match("app.css"), Ok(true));
        assert_eq!(strict.is_match("APP.CSS"), Ok(false));
        assert_eq!(loose.is_match("APP.CSS"), Ok(true));
    }

    #[test]
    fn test_sass_pattern_matches_both_syntaxes() {
        let sass = Pattern::parse(r"/\.s[ac]ss$/").unwrap();
        assert_eq!(sass.is_match("theme.scss"), Ok(true));
        assert_eq!(sass.is_match("theme.sass"), Ok(true));
        assert_eq!(sass.is_match("theme.css"), Ok(false));
    }

    #[test]
    fn test_display_round_trips_literal() {
        let p = Pattern::parse(r"/\.module\.s[ac]ss$/gi").unwrap();
        assert_eq!(p.to_string(), r"/\.module\.s[ac]ss$/gi");
        assert_eq!(Pattern::parse(&p.to_string()).unwrap(), p);
    }

    #[test]
    fn test_flag_errors() {
        assert_eq!(Flags::parse("q"), Err(PatternError::UnknownFlag('q')));
        assert_eq!(Flags::parse("gg"), Err(PatternError::DuplicateFlag('g')));
    }

    #[test]
    fn test_malformed_literal() {
        assert!(matches!(
            Pattern::parse(r"\.css$"),
            Err(PatternError::MalformedLiteral(_))
        ));
        assert!(matches!(
            Pattern::parse("//"),
            Err(PatternError::MalformedLiteral(_))
        ));
    }

    #[test]
    fn test_invalid_source_fails_only_on_match() {
        let unclosed = Pattern::new("(unclosed", "").unwrap();
        assert_eq!(unclosed.source(), "(unclosed");
        assert!(matches!(
            unclosed.is_match("x"),
            Err(PatternError::InvalidSource { .. })
        ));
    }

    #[test]
    fn test_look_around_source_is_kept() {
        let lookahead = Pattern::new("node_modules/(?!foo)", "").unwrap();
        assert_eq!(lookahead.source(), "node_modules/(?!foo)");
        assert_eq!(lookahead.to_string(), "/node_modules/(?!foo)/");
        assert_eq!(Pattern::parse("/node_modules/(?!foo)/").unwrap(), lookahead);
        assert!(lookahead.is_match("node_modules/bar").is_err());
    }
}
