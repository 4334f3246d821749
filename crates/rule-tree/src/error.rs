//! Error types for the rule tree.

/// A mutation was attempted on a frozen composite value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot mutate frozen {kind}")]
pub struct FrozenError {
    /// Which kind of composite rejected the mutation ("map" or "list").
    pub kind: &'static str,
}

/// Invalid pattern source or flags.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("invalid pattern /{pattern}/: {message}")]
    InvalidSource { pattern: String, message: String },

    #[error("unknown pattern flag '{0}'")]
    UnknownFlag(char),

    #[error("duplicate pattern flag '{0}'")]
    DuplicateFlag(char),

    #[error("malformed pattern literal: {0}")]
    MalformedLiteral(String),
}

/// Errors raised while reading or editing a rule tree.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// The predicate matched nothing, so there is no anchor for the edit.
    #[error("no rule matched the predicate")]
    NoMatch,

    #[error("malformed node: {0}")]
    MalformedNode(String),

    #[error(transparent)]
    Frozen(#[from] FrozenError),

    #[error(transparent)]
    Pattern(#[from] PatternError),
}
