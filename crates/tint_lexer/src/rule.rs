//! The rule model: pattern + emission + state transition, as a unit.
//!
//! Rule tables are declared with the builder-facing types in this module
//! (state names as strings, patterns as source text). `TableBuilder`
//! compiles them into the crate-internal resolved form with interned
//! state ids and compiled patterns.

use crate::pattern::Pattern;
use crate::token::TokenKind;
use tint_core::intern::InternedString;

/// An interned state name, valid for the table that produced it.
pub type StateId = InternedString;

/// What a rule emits when its pattern matches.
#[derive(Debug, Clone)]
pub enum EmitSpec {
    /// One token of this kind covering the whole match.
    Token(TokenKind),
    /// One emission per capturing group, in group order. The list length
    /// must equal the pattern's capturing-group count.
    ByGroups(Vec<GroupEmit>),
    /// Re-tokenize the whole match with a fresh sub-run seeded with the
    /// named state, splicing its tokens into the output.
    Using(String),
}

impl From<TokenKind> for EmitSpec {
    fn from(kind: TokenKind) -> Self {
        EmitSpec::Token(kind)
    }
}

/// What one capturing group of a `ByGroups` rule emits.
#[derive(Debug, Clone)]
pub enum GroupEmit {
    /// One token of this kind covering the group's span.
    Token(TokenKind),
    /// Re-tokenize the group's span with the named state.
    Using(String),
}

impl GroupEmit {
    /// Sub-lex this group with the named state.
    pub fn using(state: &str) -> GroupEmit {
        GroupEmit::Using(state.to_owned())
    }
}

impl From<TokenKind> for GroupEmit {
    fn from(kind: TokenKind) -> Self {
        GroupEmit::Token(kind)
    }
}

/// The state-stack transition a rule performs after matching.
#[derive(Debug, Clone)]
pub enum Action {
    /// Stay in the current state.
    None,
    /// Push the named states left-to-right; the last one ends up on top.
    Push(Vec<String>),
    /// Pop this many states. The stack is never popped below its bottom
    /// entry; a pop that would do so is clamped and flagged at run time.
    Pop(usize),
}

impl Action {
    /// Push one or more states; the last name ends up on top.
    pub fn push<'a>(names: impl IntoIterator<Item = &'a str>) -> Action {
        Action::Push(names.into_iter().map(str::to_owned).collect())
    }
}

/// A single rule specification: pattern, emission, transition.
#[derive(Debug, Clone)]
pub struct RuleSpec {
    /// Pattern source text, compiled once at table-build time.
    pub pattern: String,
    /// What to emit when the pattern matches.
    pub emit: EmitSpec,
    /// How to mutate the state stack after emitting.
    pub action: Action,
}

/// One entry of a state's specification list.
#[derive(Debug, Clone)]
pub enum StateItem {
    /// A concrete rule.
    Rule(RuleSpec),
    /// Splice the named state's resolved rules here, at build time.
    Include(String),
    /// The state's fallback action, applied with zero emission and a
    /// length-0 span when no rule matches. At most one per state.
    Default(Action),
}

/// A rule entry: pattern, emission, state action.
pub fn rule(pattern: &str, emit: impl Into<EmitSpec>, action: Action) -> StateItem {
    StateItem::Rule(RuleSpec {
        pattern: pattern.to_owned(),
        emit: emit.into(),
        action,
    })
}

/// An inclusion entry: splice `state`'s rules here at build time.
pub fn include(state: &str) -> StateItem {
    StateItem::Include(state.to_owned())
}

/// The state's fallback action when no rule matches.
pub fn fallback(action: Action) -> StateItem {
    StateItem::Default(action)
}

/// Emit by re-tokenizing the whole match with the named state.
pub fn using(state: &str) -> EmitSpec {
    EmitSpec::Using(state.to_owned())
}

/// Emit one token (or sub-run) per capturing group, in group order.
pub fn by_groups<T, I>(groups: I) -> EmitSpec
where
    T: Into<GroupEmit>,
    I: IntoIterator<Item = T>,
{
    EmitSpec::ByGroups(groups.into_iter().map(Into::into).collect())
}

// ---------------------------------------------------------------------------
// Resolved form, produced by TableBuilder::build
// ---------------------------------------------------------------------------

/// A compiled rule with interned state ids.
#[derive(Debug, Clone)]
pub(crate) struct Rule {
    pub(crate) pattern: Pattern,
    pub(crate) emit: Emit,
    pub(crate) action: StackOp,
}

/// Resolved emission.
#[derive(Debug, Clone)]
pub(crate) enum Emit {
    Token(TokenKind),
    ByGroups(Vec<Group>),
    Using(StateId),
}

/// Resolved per-group emission.
#[derive(Debug, Clone)]
pub(crate) enum Group {
    Token(TokenKind),
    Using(StateId),
}

/// Resolved state-stack operation.
#[derive(Debug, Clone)]
pub(crate) enum StackOp {
    None,
    Push(Vec<StateId>),
    Pop(usize),
}
