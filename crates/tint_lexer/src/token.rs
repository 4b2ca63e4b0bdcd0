//! Token kinds and the token type produced by the engine.

use std::fmt;
use tint_core::text::TextSpan;

/// The kind of an emitted token.
///
/// This is a fixed, closed enumeration: rule tables select kinds from it,
/// they cannot extend it. The vocabulary covers what the supported rule
/// tables emit; consumers map kinds to display classes themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum TokenKind {
    /// Plain text with no more specific classification.
    Text = 0,
    /// Whitespace runs, when a table distinguishes them from text.
    Whitespace,
    /// One code point the engine could not match against any rule.
    Error,

    // Comments
    CommentSingle,
    CommentMultiline,

    // Keywords
    Keyword,
    KeywordDeclaration,

    // Operators and punctuation
    Operator,
    OperatorWord,
    Punctuation,

    // Names
    Name,
    NameAttribute,
    NameBuiltin,
    NameEntity,
    NameFunction,
    NameVariable,
    NameVariableGlobal,

    // Literals
    LiteralString,
    LiteralStringEscape,
    LiteralStringSingle,
    LiteralNumberFloat,
    LiteralNumberHex,
    LiteralNumberOct,
    LiteralNumberInteger,
}

impl TokenKind {
    pub const FIRST_NAME: TokenKind = TokenKind::Name;
    pub const LAST_NAME: TokenKind = TokenKind::NameVariableGlobal;
    pub const FIRST_LITERAL: TokenKind = TokenKind::LiteralString;
    pub const LAST_LITERAL: TokenKind = TokenKind::LiteralNumberInteger;

    /// Whether this kind marks unmatched input.
    #[inline]
    pub fn is_error(self) -> bool {
        self == TokenKind::Error
    }

    /// Whether this kind is one of the name kinds.
    #[inline]
    pub fn is_name(self) -> bool {
        let v = self as u8;
        v >= TokenKind::FIRST_NAME as u8 && v <= TokenKind::LAST_NAME as u8
    }

    /// Whether this kind is one of the literal kinds.
    #[inline]
    pub fn is_literal(self) -> bool {
        let v = self as u8;
        v >= TokenKind::FIRST_LITERAL as u8 && v <= TokenKind::LAST_LITERAL as u8
    }

    /// A stable dotted name for this kind, usable as a display class.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Text => "text",
            TokenKind::Whitespace => "whitespace",
            TokenKind::Error => "error",
            TokenKind::CommentSingle => "comment.single",
            TokenKind::CommentMultiline => "comment.multiline",
            TokenKind::Keyword => "keyword",
            TokenKind::KeywordDeclaration => "keyword.declaration",
            TokenKind::Operator => "operator",
            TokenKind::OperatorWord => "operator.word",
            TokenKind::Punctuation => "punctuation",
            TokenKind::Name => "name",
            TokenKind::NameAttribute => "name.attribute",
            TokenKind::NameBuiltin => "name.builtin",
            TokenKind::NameEntity => "name.entity",
            TokenKind::NameFunction => "name.function",
            TokenKind::NameVariable => "name.variable",
            TokenKind::NameVariableGlobal => "name.variable.global",
            TokenKind::LiteralString => "literal.string",
            TokenKind::LiteralStringEscape => "literal.string.escape",
            TokenKind::LiteralStringSingle => "literal.string.single",
            TokenKind::LiteralNumberFloat => "literal.number.float",
            TokenKind::LiteralNumberHex => "literal.number.hex",
            TokenKind::LiteralNumberOct => "literal.number.oct",
            TokenKind::LiteralNumberInteger => "literal.number.integer",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A token emitted by the engine, borrowing its text from the input.
///
/// Concatenating the `text` of all tokens of a run, in emission order,
/// reconstructs the tokenized input exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'s> {
    /// The kind of token.
    pub kind: TokenKind,
    /// The matched slice of the input.
    pub text: &'s str,
    /// Where in the input the token sits.
    pub span: TextSpan,
}

impl<'s> Token<'s> {
    /// The length of this token in bytes.
    #[inline]
    pub fn len(&self) -> u32 {
        self.span.length
    }

    /// Tokens are never empty; kept for API symmetry with spans.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.span.is_empty()
    }
}
