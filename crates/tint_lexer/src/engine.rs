//! The tokenizer engine.
//!
//! A [`TokenStream`] drives one rule table over one input text: it scans
//! the current state's rules in declaration order, emits tokens for the
//! first rule that matches at the cursor, applies the rule's stack action,
//! and advances. The stream is a lazy, single-pass iterator; a run always
//! covers the whole input unless the caller stops pulling.

use crate::rule::{Emit, Group, StackOp, StateId};
use crate::table::LexerTable;
use crate::token::{Token, TokenKind};
use regex::Captures;
use std::collections::VecDeque;
use tint_core::text::TextSpan;
use tint_diagnostics::{codes, Diagnostic, DiagnosticCollection, Severity};

/// Maximum state-stack depth. A push beyond this is refused and flagged;
/// a well-formed table never comes near it.
pub const MAX_STACK_DEPTH: usize = 4096;

/// Maximum consecutive iterations without cursor advance before the
/// engine forces progress. Bounds default-action ping-pong between
/// states that never consumes input.
pub const MAX_STALLED_STEPS: u32 = 1000;

/// Maximum nesting of sub-lexer runs. Bounds tables whose sub-lexing
/// states re-enter themselves over the same text.
pub const MAX_SUB_LEXER_DEPTH: usize = 128;

/// One in-progress tokenization run.
///
/// Owns its state stack and cursor exclusively; the table is shared
/// read-only. Diagnostics raised along the way are accumulated on the
/// run and never abort it.
#[derive(Debug)]
pub struct TokenStream<'t, 's> {
    table: &'t LexerTable,
    text: &'s str,
    stack: Vec<StateId>,
    pos: usize,
    queue: VecDeque<Token<'s>>,
    diagnostics: DiagnosticCollection,
    stalled: u32,
    depth: usize,
}

impl<'t, 's> TokenStream<'t, 's> {
    pub(crate) fn new(table: &'t LexerTable, text: &'s str, stack: Vec<StateId>) -> Self {
        Self::new_at_depth(table, text, stack, 0)
    }

    fn new_at_depth(
        table: &'t LexerTable,
        text: &'s str,
        stack: Vec<StateId>,
        depth: usize,
    ) -> Self {
        debug_assert!(!stack.is_empty());
        Self {
            table,
            text,
            stack,
            pos: 0,
            queue: VecDeque::new(),
            diagnostics: DiagnosticCollection::new(),
            stalled: 0,
            depth,
        }
    }

    /// Diagnostics accumulated so far by this run.
    pub fn diagnostics(&self) -> &DiagnosticCollection {
        &self.diagnostics
    }

    /// Consume the run, returning its diagnostics.
    pub fn into_diagnostics(self) -> DiagnosticCollection {
        self.diagnostics
    }

    /// Current state-stack depth.
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    /// Current cursor offset in bytes.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Run one iteration of the core loop. Returns false once the cursor
    /// has reached the end of the input.
    fn step(&mut self) -> bool {
        let table = self.table;
        let text = self.text;
        if self.pos >= text.len() {
            return false;
        }
        let state_id = self.stack[self.stack.len() - 1];
        let def = table.state(state_id);

        // First match wins, in declaration order.
        for rule in def.rules.iter() {
            let Some(caps) = rule.pattern.try_match(text, self.pos) else {
                continue;
            };
            let Some(matched) = caps.get(0) else {
                continue;
            };
            if matched.end() == self.pos {
                // Zero-width match: legal only while the action itself
                // guarantees progress by changing the stack.
                if self.apply(&rule.action) {
                    self.note_stalled();
                } else {
                    self.error_advance();
                }
                return true;
            }
            self.emit(&rule.emit, &caps, matched.start(), matched.end());
            self.apply(&rule.action);
            self.pos = matched.end();
            self.stalled = 0;
            return true;
        }

        // No rule matched in the current state.
        if let Some(op) = def.fallback.as_ref() {
            if self.apply(op) {
                self.note_stalled();
            } else {
                self.error_advance();
            }
            return true;
        }
        self.error_advance();
        true
    }

    /// Emit tokens for a matched rule spanning `start..end`.
    fn emit(&mut self, emit: &Emit, caps: &Captures<'s>, start: usize, end: usize) {
        match emit {
            Emit::Token(kind) => self.push_token(*kind, start, end),
            Emit::Using(state) => self.sub_lex(*state, start, end),
            Emit::ByGroups(groups) => {
                // `cover` tracks how far the match is already emitted;
                // stretches no listed group covers are emitted as Text so
                // the output still reconstructs the input exactly.
                let mut cover = start;
                for (i, group) in groups.iter().enumerate() {
                    let Some(m) = caps.get(i + 1) else {
                        continue;
                    };
                    if m.start() < cover {
                        continue;
                    }
                    if m.start() > cover {
                        self.push_token(TokenKind::Text, cover, m.start());
                    }
                    match group {
                        Group::Token(kind) => self.push_token(*kind, m.start(), m.end()),
                        Group::Using(state) => self.sub_lex(*state, m.start(), m.end()),
                    }
                    cover = m.end();
                }
                if cover < end {
                    self.push_token(TokenKind::Text, cover, end);
                }
            }
        }
    }

    /// Queue one token. Zero-length tokens are never emitted.
    fn push_token(&mut self, kind: TokenKind, start: usize, end: usize) {
        if start == end {
            return;
        }
        self.queue.push_back(Token {
            kind,
            text: &self.text[start..end],
            span: TextSpan::from_bounds(start as u32, end as u32),
        });
    }

    /// Tokenize `start..end` as an independent run seeded with `state`,
    /// splicing its tokens (re-based to absolute offsets) into this run.
    fn sub_lex(&mut self, state: StateId, start: usize, end: usize) {
        let table = self.table;
        let text = self.text;
        if self.depth >= MAX_SUB_LEXER_DEPTH {
            tracing::warn!(
                state = table.name_of(state),
                depth = self.depth,
                "sub-lexer nesting limit reached"
            );
            self.diagnostics.add(Diagnostic::with_span(
                Severity::Error,
                codes::SUB_LEXER_DEPTH_EXCEEDED,
                TextSpan::from_bounds(start as u32, end as u32),
                format!("sub-lexer nesting limit ({MAX_SUB_LEXER_DEPTH}) reached"),
            ));
            self.push_token(TokenKind::Error, start, end);
            return;
        }
        let mut sub =
            TokenStream::new_at_depth(table, &text[start..end], vec![state], self.depth + 1);
        let offset = start as u32;
        while let Some(token) = sub.next() {
            // The sub-run's token text already borrows from the full
            // input; only the span needs re-basing.
            self.queue.push_back(Token {
                kind: token.kind,
                text: token.text,
                span: token.span.shifted(offset),
            });
        }
        for diagnostic in sub.into_diagnostics().into_diagnostics() {
            self.diagnostics.add(diagnostic.shifted(offset));
        }
    }

    /// Apply a stack operation. Returns whether the stack actually
    /// changed; clamped pops and refused pushes do not count.
    fn apply(&mut self, op: &StackOp) -> bool {
        match op {
            StackOp::None => false,
            StackOp::Push(ids) => {
                let mut changed = false;
                for &id in ids {
                    if self.stack.len() >= MAX_STACK_DEPTH {
                        tracing::warn!(
                            state = self.table.name_of(id),
                            pos = self.pos,
                            "state stack depth limit reached; push refused"
                        );
                        self.diagnostics.add(Diagnostic::with_span(
                            Severity::Error,
                            codes::STACK_DEPTH_EXCEEDED,
                            TextSpan::empty(self.pos as u32),
                            format!(
                                "state stack depth limit ({MAX_STACK_DEPTH}) reached; \
                                 push of `{}` refused",
                                self.table.name_of(id)
                            ),
                        ));
                        break;
                    }
                    self.stack.push(id);
                    changed = true;
                }
                changed
            }
            StackOp::Pop(count) => {
                // The bottom entry is never popped.
                let available = self.stack.len() - 1;
                let take = (*count).min(available);
                if *count > available {
                    tracing::warn!(
                        count,
                        depth = self.stack.len(),
                        pos = self.pos,
                        "pop below stack bottom clamped"
                    );
                    self.diagnostics.add(Diagnostic::with_span(
                        Severity::Error,
                        codes::POP_BELOW_BOTTOM,
                        TextSpan::empty(self.pos as u32),
                        format!(
                            "pop of {count} with {} state(s) on the stack was clamped",
                            self.stack.len()
                        ),
                    ));
                }
                self.stack.truncate(self.stack.len() - take);
                take > 0
            }
        }
    }

    /// Count an iteration that changed state without consuming input; if
    /// too many accumulate, force forward progress.
    fn note_stalled(&mut self) {
        self.stalled += 1;
        if self.stalled >= MAX_STALLED_STEPS {
            tracing::warn!(pos = self.pos, "stall fail-safe engaged");
            self.diagnostics.add(Diagnostic::with_span(
                Severity::Error,
                codes::STALL_FAILSAFE,
                TextSpan::empty(self.pos as u32),
                format!("no forward progress after {MAX_STALLED_STEPS} state transitions"),
            ));
            self.error_advance();
        }
    }

    /// The no-match fallback: emit one Error token covering exactly one
    /// code point and advance past it.
    fn error_advance(&mut self) {
        let start = self.pos;
        let width = self.text[start..].chars().next().map_or(1, char::len_utf8);
        let end = start + width;
        self.push_token(TokenKind::Error, start, end);
        self.diagnostics.add(Diagnostic::with_span(
            Severity::Warning,
            codes::UNMATCHED_INPUT,
            TextSpan::from_bounds(start as u32, end as u32),
            format!("no rule matched at offset {start}"),
        ));
        self.pos = end;
        self.stalled = 0;
    }
}

impl<'t, 's> Iterator for TokenStream<'t, 's> {
    type Item = Token<'s>;

    fn next(&mut self) -> Option<Token<'s>> {
        loop {
            if let Some(token) = self.queue.pop_front() {
                return Some(token);
            }
            if !self.step() {
                return None;
            }
        }
    }
}
