//! Build-time configuration errors.
//!
//! A malformed rule table is rejected while the table is being built,
//! before any tokenization begins. Input text can never produce these;
//! malformed input surfaces as `Error`-kind tokens and run diagnostics
//! instead.

use thiserror::Error;

/// An error detected while building a `LexerTable` from specifications.
#[derive(Debug, Error)]
pub enum TableError {
    /// The same state name was declared more than once (including an
    /// alias colliding with a state or another alias).
    #[error("duplicate state `{0}`")]
    DuplicateState(String),

    /// No `root` state was declared.
    #[error("missing entry state `root`")]
    MissingRoot,

    /// Inclusions form a cycle; the payload is the offending path.
    #[error("inclusion cycle: {0}")]
    IncludeCycle(String),

    /// A rule's pattern failed to compile.
    #[error("state `{state}`: invalid pattern `{pattern}`: {source}")]
    Pattern {
        state: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A by-groups emission does not have one entry per capturing group.
    #[error(
        "state `{state}`: pattern `{pattern}` has {groups} capturing group(s), \
         but by-groups lists {listed}"
    )]
    GroupArity {
        state: String,
        pattern: String,
        groups: usize,
        listed: usize,
    },

    /// An include, push, using, or alias target does not exist.
    #[error("state `{state}` references unknown state `{target}`")]
    UnknownState { state: String, target: String },

    /// A state declared more than one fallback action.
    #[error("state `{state}` declares more than one default action")]
    DuplicateDefault { state: String },

    /// `Pop(0)` is a no-op and always a mistake.
    #[error("state `{state}`: pop count must be at least 1")]
    ZeroPop { state: String },

    /// `Push` with no target states.
    #[error("state `{state}`: push requires at least one target state")]
    EmptyPush { state: String },

    /// `tokenize_from` was given a state name the table does not define.
    #[error("unknown entry state `{0}`")]
    UnknownEntryState(String),

    /// `tokenize_from` was given an empty seed stack.
    #[error("entry state stack must not be empty")]
    EmptyEntryStack,
}
