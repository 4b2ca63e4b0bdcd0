//! tint_lexer: a rule-driven tokenizer engine.
//!
//! The engine interprets declarative rule tables: named lexer states, each
//! an ordered list of regex rules, with token emission per match (single
//! kind, per-capture-group kinds, or recursive sub-lexing) and state-stack
//! transitions (push, pop, build-time inclusion, no-match defaults).
//!
//! A table is built once with [`TableBuilder`], validated eagerly, and
//! reused read-only across runs:
//!
//! ```
//! use tint_lexer::{rule, Action, TableBuilder, TokenKind};
//!
//! let table = TableBuilder::new()
//!     .state("root", [
//!         rule(r"\s+", TokenKind::Text, Action::None),
//!         rule(r"[a-z]+", TokenKind::Keyword, Action::None),
//!     ])
//!     .build()
//!     .unwrap();
//!
//! let tokens: Vec<_> = table.tokenize("  if").collect();
//! assert_eq!(tokens[1].text, "if");
//! ```

mod engine;
mod error;
mod pattern;
mod rule;
mod table;
mod token;

pub use engine::{TokenStream, MAX_STACK_DEPTH, MAX_STALLED_STEPS, MAX_SUB_LEXER_DEPTH};
pub use error::TableError;
pub use pattern::MatchFlags;
pub use rule::{
    by_groups, fallback, include, rule, using, Action, EmitSpec, GroupEmit, RuleSpec, StateId,
    StateItem,
};
pub use table::{LexerTable, TableBuilder, ROOT_STATE};
pub use token::{Token, TokenKind};
