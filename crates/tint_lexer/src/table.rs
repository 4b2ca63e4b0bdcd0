//! Rule-table construction: validation, inclusion resolution, interning.
//!
//! A table is built once from specifications, validated eagerly, and is
//! immutable afterwards. It can be shared read-only across any number of
//! concurrent tokenization runs; each run owns its own state stack and
//! cursor.

use crate::engine::TokenStream;
use crate::error::TableError;
use crate::pattern::{MatchFlags, Pattern};
use crate::rule::{
    Action, Emit, EmitSpec, Group, GroupEmit, Rule, RuleSpec, StackOp, StateId, StateItem,
};
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;
use tint_core::collections::OrderedMap;
use tint_core::intern::StringInterner;

/// The entry state every table must define; `tokenize` seeds the stack
/// with it.
pub const ROOT_STATE: &str = "root";

/// A resolved state: concrete rules in declaration order, plus the
/// optional fallback action applied when none of them match.
#[derive(Debug, Clone)]
pub(crate) struct StateDef {
    pub(crate) rules: Arc<[Rule]>,
    pub(crate) fallback: Option<StackOp>,
}

/// Builds a [`LexerTable`] from state specifications.
///
/// States are declared in order with [`TableBuilder::state`]; `build`
/// performs all validation and inclusion resolution, so a table that
/// builds successfully can never fail at match time.
#[derive(Debug, Default)]
pub struct TableBuilder {
    states: OrderedMap<String, Vec<StateItem>>,
    aliases: Vec<(String, String)>,
    flags: MatchFlags,
    duplicate: Option<String>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the match flags applied to every pattern in the table.
    pub fn flags(mut self, flags: MatchFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Declare a state with its ordered specification list.
    pub fn state(mut self, name: &str, items: impl IntoIterator<Item = StateItem>) -> Self {
        let items: Vec<StateItem> = items.into_iter().collect();
        if self.states.insert(name.to_owned(), items).is_some() && self.duplicate.is_none() {
            self.duplicate = Some(name.to_owned());
        }
        self
    }

    /// Bind `name` as an exact alias of the declared state `target`.
    ///
    /// The alias shares the target's resolved rule list (and fallback)
    /// structurally; the engine sees it as an ordinary state. The target
    /// must be a state declared with [`TableBuilder::state`], not another
    /// alias.
    pub fn alias(mut self, name: &str, target: &str) -> Self {
        self.aliases.push((name.to_owned(), target.to_owned()));
        self
    }

    /// Validate the specifications and produce an immutable table.
    pub fn build(self) -> Result<LexerTable, TableError> {
        if let Some(name) = self.duplicate {
            return Err(TableError::DuplicateState(name));
        }
        let mut alias_names: FxHashSet<&str> = FxHashSet::default();
        for (name, _) in &self.aliases {
            if self.states.contains_key(name) || !alias_names.insert(name.as_str()) {
                return Err(TableError::DuplicateState(name.clone()));
            }
        }

        // Push/using/alias targets may name any state or alias.
        let mut known: FxHashSet<&str> = self.states.keys().map(String::as_str).collect();
        known.extend(alias_names.iter().copied());
        if !known.contains(ROOT_STATE) {
            return Err(TableError::MissingRoot);
        }

        let interner = StringInterner::new();

        // Compile each state's own rules, keeping includes as markers.
        let mut pre: FxHashMap<&str, PreState> = FxHashMap::default();
        for (name, items) in self.states.iter() {
            let mut compiled = Vec::with_capacity(items.len());
            let mut fallback = None;
            for item in items {
                match item {
                    StateItem::Rule(spec) => {
                        compiled.push(PreItem::Rule(compile_rule(
                            name, spec, self.flags, &known, &interner,
                        )?));
                    }
                    StateItem::Include(target) => {
                        // Includes splice rule lists, so the target must be
                        // a declared state, not an alias.
                        if !self.states.contains_key(target) {
                            return Err(TableError::UnknownState {
                                state: name.clone(),
                                target: target.clone(),
                            });
                        }
                        compiled.push(PreItem::Include(target.clone()));
                    }
                    StateItem::Default(action) => {
                        if fallback.is_some() {
                            return Err(TableError::DuplicateDefault {
                                state: name.clone(),
                            });
                        }
                        fallback = Some(compile_action(name, action, &known, &interner)?);
                    }
                }
            }
            pre.insert(
                name.as_str(),
                PreState {
                    items: compiled,
                    fallback,
                },
            );
        }

        // Splice inclusions depth-first, rejecting cycles.
        let mut resolved: FxHashMap<String, Vec<Rule>> = FxHashMap::default();
        for name in self.states.keys() {
            let mut visiting = Vec::new();
            flatten(name, &pre, &mut resolved, &mut visiting)?;
        }

        let mut states: FxHashMap<StateId, StateDef> = FxHashMap::default();
        for name in self.states.keys() {
            let id = interner.intern(name);
            let rules: Arc<[Rule]> = resolved.remove(name.as_str()).unwrap_or_default().into();
            let fallback = pre[name.as_str()].fallback.clone();
            states.insert(id, StateDef { rules, fallback });
        }
        for (name, target) in &self.aliases {
            if !self.states.contains_key(target) {
                return Err(TableError::UnknownState {
                    state: name.clone(),
                    target: target.clone(),
                });
            }
            let def = states[&interner.intern(target)].clone();
            tracing::trace!(alias = %name, target = %target, "state alias bound");
            states.insert(interner.intern(name), def);
        }

        let root = interner.intern(ROOT_STATE);
        tracing::debug!(states = states.len(), "lexer table built");
        Ok(LexerTable {
            states,
            interner,
            root,
        })
    }
}

/// A state's compiled items before inclusion splicing.
struct PreState {
    items: Vec<PreItem>,
    fallback: Option<StackOp>,
}

enum PreItem {
    Rule(Rule),
    Include(String),
}

/// Splice `name`'s inclusions recursively into `resolved`, preserving
/// rule order at each inclusion point.
fn flatten(
    name: &str,
    pre: &FxHashMap<&str, PreState>,
    resolved: &mut FxHashMap<String, Vec<Rule>>,
    visiting: &mut Vec<String>,
) -> Result<(), TableError> {
    if resolved.contains_key(name) {
        return Ok(());
    }
    if visiting.iter().any(|n| n == name) {
        let mut path = visiting.join(" -> ");
        if !path.is_empty() {
            path.push_str(" -> ");
        }
        path.push_str(name);
        return Err(TableError::IncludeCycle(path));
    }
    visiting.push(name.to_owned());
    let mut rules = Vec::new();
    for item in &pre[name].items {
        match item {
            PreItem::Rule(rule) => rules.push(rule.clone()),
            PreItem::Include(target) => {
                flatten(target, pre, resolved, visiting)?;
                rules.extend(resolved[target.as_str()].iter().cloned());
            }
        }
    }
    visiting.pop();
    resolved.insert(name.to_owned(), rules);
    Ok(())
}

fn compile_rule(
    state: &str,
    spec: &RuleSpec,
    flags: MatchFlags,
    known: &FxHashSet<&str>,
    interner: &StringInterner,
) -> Result<Rule, TableError> {
    let pattern = Pattern::compile(&spec.pattern, flags).map_err(|source| TableError::Pattern {
        state: state.to_owned(),
        pattern: spec.pattern.clone(),
        source,
    })?;
    let emit = match &spec.emit {
        EmitSpec::Token(kind) => Emit::Token(*kind),
        EmitSpec::Using(target) => Emit::Using(resolve_target(state, target, known, interner)?),
        EmitSpec::ByGroups(groups) => {
            if groups.len() != pattern.group_count() {
                return Err(TableError::GroupArity {
                    state: state.to_owned(),
                    pattern: spec.pattern.clone(),
                    groups: pattern.group_count(),
                    listed: groups.len(),
                });
            }
            let groups = groups
                .iter()
                .map(|group| match group {
                    GroupEmit::Token(kind) => Ok(Group::Token(*kind)),
                    GroupEmit::Using(target) => {
                        Ok(Group::Using(resolve_target(state, target, known, interner)?))
                    }
                })
                .collect::<Result<Vec<_>, TableError>>()?;
            Emit::ByGroups(groups)
        }
    };
    let action = compile_action(state, &spec.action, known, interner)?;
    Ok(Rule {
        pattern,
        emit,
        action,
    })
}

fn compile_action(
    state: &str,
    action: &Action,
    known: &FxHashSet<&str>,
    interner: &StringInterner,
) -> Result<StackOp, TableError> {
    match action {
        Action::None => Ok(StackOp::None),
        Action::Push(names) => {
            if names.is_empty() {
                return Err(TableError::EmptyPush {
                    state: state.to_owned(),
                });
            }
            let ids = names
                .iter()
                .map(|name| resolve_target(state, name, known, interner))
                .collect::<Result<Vec<_>, TableError>>()?;
            Ok(StackOp::Push(ids))
        }
        Action::Pop(count) => {
            if *count == 0 {
                return Err(TableError::ZeroPop {
                    state: state.to_owned(),
                });
            }
            Ok(StackOp::Pop(*count))
        }
    }
}

fn resolve_target(
    state: &str,
    target: &str,
    known: &FxHashSet<&str>,
    interner: &StringInterner,
) -> Result<StateId, TableError> {
    if !known.contains(target) {
        return Err(TableError::UnknownState {
            state: state.to_owned(),
            target: target.to_owned(),
        });
    }
    Ok(interner.intern(target))
}

/// A resolved, immutable rule table.
///
/// Built once, reused read-only across tokenization runs; safe to share
/// between threads.
#[derive(Debug)]
pub struct LexerTable {
    states: FxHashMap<StateId, StateDef>,
    interner: StringInterner,
    root: StateId,
}

impl LexerTable {
    /// Tokenize `text` with the stack seeded `[root]`.
    ///
    /// The returned stream is lazy and single-pass; dropping it abandons
    /// the run.
    pub fn tokenize<'t, 's>(&'t self, text: &'s str) -> TokenStream<'t, 's> {
        TokenStream::new(self, text, vec![self.root])
    }

    /// Tokenize `text` with a caller-chosen seed stack, given bottom to
    /// top: the last name becomes the current state.
    pub fn tokenize_from<'t, 's>(
        &'t self,
        entry: &[&str],
        text: &'s str,
    ) -> Result<TokenStream<'t, 's>, TableError> {
        if entry.is_empty() {
            return Err(TableError::EmptyEntryStack);
        }
        let mut stack = Vec::with_capacity(entry.len());
        for name in entry {
            let id = self
                .interner
                .get(name)
                .filter(|id| self.states.contains_key(id))
                .ok_or_else(|| TableError::UnknownEntryState((*name).to_owned()))?;
            stack.push(id);
        }
        Ok(TokenStream::new(self, text, stack))
    }

    /// Whether the table defines a state (or alias) with this name.
    pub fn contains_state(&self, name: &str) -> bool {
        self.interner
            .get(name)
            .is_some_and(|id| self.states.contains_key(&id))
    }

    /// The number of states (aliases included).
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    #[inline]
    pub(crate) fn state(&self, id: StateId) -> &StateDef {
        &self.states[&id]
    }

    pub(crate) fn name_of(&self, id: StateId) -> &str {
        self.interner.resolve(id)
    }
}
