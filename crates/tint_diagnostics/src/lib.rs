//! tint_diagnostics: Runtime diagnostics for tokenization runs.
//!
//! A tokenization run never aborts; inconsistencies between a rule table
//! and the input it meets (a pop that would empty the state stack, a
//! fail-safe firing) are flagged here while the run continues. The engine
//! accumulates a [`DiagnosticCollection`] per run, which callers inspect
//! after consuming (or abandoning) the token stream.

use std::fmt;
use tint_core::text::TextSpan;

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Malformed input handled by the engine's fallback path.
    Warning,
    /// A rule-table inconsistency observed at run time.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Stable diagnostic codes emitted by the engine.
pub mod codes {
    /// No rule matched; one code point was emitted as an error token.
    pub const UNMATCHED_INPUT: u32 = 1;
    /// A pop would have emptied the state stack and was clamped.
    pub const POP_BELOW_BOTTOM: u32 = 2;
    /// A push beyond the maximum stack depth was refused.
    pub const STACK_DEPTH_EXCEEDED: u32 = 3;
    /// The stall fail-safe forced forward progress.
    pub const STALL_FAILSAFE: u32 = 4;
    /// A sub-lexer run beyond the maximum nesting depth was refused.
    pub const SUB_LEXER_DEPTH_EXCEEDED: u32 = 5;
}

/// A single diagnostic produced during a tokenization run.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// The severity of this diagnostic.
    pub severity: Severity,
    /// Where in the input the diagnostic was raised, if location applies.
    pub span: Option<TextSpan>,
    /// The stable code, one of [`codes`].
    pub code: u32,
    /// Human-readable description.
    pub message: String,
}

impl Diagnostic {
    /// Create a new diagnostic without location info.
    pub fn new(severity: Severity, code: u32, message: impl Into<String>) -> Self {
        Self {
            severity,
            span: None,
            code,
            message: message.into(),
        }
    }

    /// Create a new diagnostic with a span.
    pub fn with_span(
        severity: Severity,
        code: u32,
        span: TextSpan,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            span: Some(span),
            code,
            message: message.into(),
        }
    }

    /// Whether this is an error diagnostic.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Return a copy with the span shifted right by `offset` bytes.
    ///
    /// Used to re-base diagnostics raised inside a sub-lexer run.
    pub fn shifted(mut self, offset: u32) -> Self {
        self.span = self.span.map(|s| s.shifted(offset));
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(span) = self.span {
            write!(f, "{}: ", span)?;
        }
        write!(f, "{} T{:03}: {}", self.severity, self.code, self.message)
    }
}

/// A collection of diagnostics accumulated by one tokenization run.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticCollection {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn extend(&mut self, other: DiagnosticCollection) {
        self.diagnostics.extend(other.diagnostics);
    }
}
