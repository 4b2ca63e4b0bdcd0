//! Engine behavior tests: first-match-wins scanning, stack transitions,
//! fallbacks, sub-lexing, and the forward-progress guards.

use tint_diagnostics::codes;
use tint_lexer::{
    by_groups, fallback, rule, using, Action, LexerTable, TableBuilder, TokenKind,
};

use TokenKind::*;

/// Helper: tokenize and return (kind, text) pairs.
fn lex_all(table: &LexerTable, input: &str) -> Vec<(TokenKind, String)> {
    table
        .tokenize(input)
        .map(|t| (t.kind, t.text.to_string()))
        .collect()
}

fn pair(kind: TokenKind, text: &str) -> (TokenKind, String) {
    (kind, text.to_string())
}

#[test]
fn test_basic_scan() {
    let table = TableBuilder::new()
        .state(
            "root",
            [
                rule(r"\s+", Whitespace, Action::None),
                rule(r"[a-z]+", Keyword, Action::None),
                rule(r"\d+", LiteralNumberInteger, Action::None),
            ],
        )
        .build()
        .unwrap();
    assert_eq!(
        lex_all(&table, "if 42"),
        vec![
            pair(Keyword, "if"),
            pair(Whitespace, " "),
            pair(LiteralNumberInteger, "42"),
        ]
    );
}

#[test]
fn test_empty_input_yields_no_tokens() {
    let table = TableBuilder::new()
        .state("root", [rule(r".", Text, Action::None)])
        .build()
        .unwrap();
    assert!(lex_all(&table, "").is_empty());
}

#[test]
fn test_token_spans_tile_the_input() {
    let table = TableBuilder::new()
        .state(
            "root",
            [
                rule(r"\s+", Whitespace, Action::None),
                rule(r"\w+", Name, Action::None),
            ],
        )
        .build()
        .unwrap();
    let input = "foo bar  baz";
    let mut expected_start = 0u32;
    for token in table.tokenize(input) {
        assert_eq!(token.span.start, expected_start);
        assert_eq!(&input[token.span.to_range()], token.text);
        expected_start = token.span.end();
    }
    assert_eq!(expected_start as usize, input.len());
}

#[test]
fn test_push_and_pop() {
    let table = TableBuilder::new()
        .state(
            "root",
            [rule(r"\(", Punctuation, Action::push(["args"]))],
        )
        .state(
            "args",
            [
                rule(r"\)", Punctuation, Action::Pop(1)),
                rule(r".", Text, Action::None),
            ],
        )
        .build()
        .unwrap();
    let mut stream = table.tokenize("(x)");
    let tokens: Vec<_> = stream.by_ref().map(|t| (t.kind, t.text)).collect();
    assert_eq!(
        tokens,
        vec![(Punctuation, "("), (Text, "x"), (Punctuation, ")")]
    );
    // The pop restored the pre-push depth.
    assert_eq!(stream.stack_depth(), 1);
}

#[test]
fn test_multi_push_puts_last_state_on_top() {
    // Push("after", "first"): `first` must be active immediately, `after`
    // once `first` pops.
    let table = TableBuilder::new()
        .state(
            "root",
            [rule(r"<", Punctuation, Action::push(["after", "first"]))],
        )
        .state("first", [rule(r"a", Keyword, Action::Pop(1))])
        .state("after", [rule(r"b", Operator, Action::Pop(1))])
        .build()
        .unwrap();
    assert_eq!(
        lex_all(&table, "<ab"),
        vec![
            pair(Punctuation, "<"),
            pair(Keyword, "a"),
            pair(Operator, "b"),
        ]
    );
}

#[test]
fn test_tokenize_from_seed_stack() {
    let table = TableBuilder::new()
        .state("root", [rule(r"r", Text, Action::None)])
        .state(
            "inner",
            [
                rule(r"i", Keyword, Action::None),
                rule(r"!", Punctuation, Action::Pop(1)),
            ],
        )
        .build()
        .unwrap();
    // Seed [root, inner]: `inner` is on top until it pops.
    let stream = table.tokenize_from(&["root", "inner"], "i!r").unwrap();
    let tokens: Vec<_> = stream.map(|t| (t.kind, t.text.to_string())).collect();
    assert_eq!(
        tokens,
        vec![pair(Keyword, "i"), pair(Punctuation, "!"), pair(Text, "r")]
    );
}

#[test]
fn test_unmatched_input_emits_one_error_per_code_point() {
    let table = TableBuilder::new()
        .state("root", [rule(r"[ab]+", Text, Action::None)])
        .build()
        .unwrap();
    let mut stream = table.tokenize("a\u{0}\u{7f0}b");
    let tokens: Vec<_> = stream.by_ref().collect();
    assert_eq!(tokens[0].kind, Text);
    assert_eq!(tokens[1].kind, Error);
    assert_eq!(tokens[1].text, "\u{0}");
    // The unmatched code point is two bytes wide; exactly one token.
    assert_eq!(tokens[2].kind, Error);
    assert_eq!(tokens[2].text, "\u{7f0}");
    assert_eq!(tokens[3].kind, Text);
    let diags = stream.diagnostics();
    assert!(!diags.has_errors());
    assert_eq!(diags.len(), 2);
    assert!(diags
        .diagnostics()
        .iter()
        .all(|d| d.code == codes::UNMATCHED_INPUT));
}

#[test]
fn test_zero_width_match_without_action_makes_progress() {
    // A rule that always matches the empty string and changes nothing
    // must not hang; each iteration falls back to one error code point.
    let table = TableBuilder::new()
        .state("root", [rule(r"", Text, Action::None)])
        .build()
        .unwrap();
    let tokens = lex_all(&table, "ab");
    assert_eq!(tokens, vec![pair(Error, "a"), pair(Error, "b")]);
}

#[test]
fn test_zero_width_match_with_pop_is_allowed() {
    // Zero-width lookahead-style rule whose pop guarantees progress.
    let table = TableBuilder::new()
        .state(
            "root",
            [
                rule(r"\(", Punctuation, Action::push(["maybe"])),
                rule(r"x", Keyword, Action::None),
            ],
        )
        .state("maybe", [rule(r"", Text, Action::Pop(1))])
        .build()
        .unwrap();
    assert_eq!(
        lex_all(&table, "(x"),
        vec![pair(Punctuation, "("), pair(Keyword, "x")]
    );
}

#[test]
fn test_fallback_pop_leaves_state_without_consuming() {
    let table = TableBuilder::new()
        .state(
            "root",
            [
                rule(r"\s+", Whitespace, Action::None),
                rule(r"\w+", Name, Action::push(["accessors"])),
            ],
        )
        .state(
            "accessors",
            [
                rule(r"(\.)(\w+)", by_groups([Punctuation, NameAttribute]), Action::None),
                fallback(Action::Pop(1)),
            ],
        )
        .build()
        .unwrap();
    assert_eq!(
        lex_all(&table, "obj.attr other"),
        vec![
            pair(Name, "obj"),
            pair(Punctuation, "."),
            pair(NameAttribute, "attr"),
            pair(Whitespace, " "),
            pair(Name, "other"),
        ]
    );
}

#[test]
fn test_fallback_push_enters_state_without_consuming() {
    let table = TableBuilder::new()
        .state(
            "root",
            [
                rule(r"\s+", Whitespace, Action::None),
                fallback(Action::push(["word"])),
            ],
        )
        .state("word", [rule(r"[a-z]+", Keyword, Action::Pop(1))])
        .build()
        .unwrap();
    assert_eq!(
        lex_all(&table, " ab "),
        vec![
            pair(Whitespace, " "),
            pair(Keyword, "ab"),
            pair(Whitespace, " "),
        ]
    );
}

#[test]
fn test_pop_below_bottom_is_clamped_and_flagged() {
    let table = TableBuilder::new()
        .state("root", [rule(r"x", Text, Action::Pop(1))])
        .build()
        .unwrap();
    let mut stream = table.tokenize("xx");
    let tokens: Vec<_> = stream.by_ref().map(|t| (t.kind, t.text.to_string())).collect();
    // The run continues past the bad pop and never empties the stack.
    assert_eq!(tokens, vec![pair(Text, "x"), pair(Text, "x")]);
    assert_eq!(stream.stack_depth(), 1);
    let diags = stream.diagnostics();
    assert!(diags.has_errors());
    assert!(diags
        .diagnostics()
        .iter()
        .any(|d| d.code == codes::POP_BELOW_BOTTOM));
}

#[test]
fn test_stall_failsafe_breaks_default_ping_pong() {
    // root defaults to push, the pushed state defaults to pop: the stack
    // changes forever without consuming input. The fail-safe must force
    // progress instead of hanging.
    let table = TableBuilder::new()
        .state("root", [fallback(Action::push(["other"]))])
        .state("other", [fallback(Action::Pop(1))])
        .build()
        .unwrap();
    let mut stream = table.tokenize("z");
    let tokens: Vec<_> = stream.by_ref().map(|t| (t.kind, t.text.to_string())).collect();
    assert_eq!(tokens, vec![pair(Error, "z")]);
    assert!(stream
        .diagnostics()
        .diagnostics()
        .iter()
        .any(|d| d.code == codes::STALL_FAILSAFE));
}

#[test]
fn test_by_groups_emits_one_token_per_group() {
    let table = TableBuilder::new()
        .state(
            "root",
            [rule(
                r"(\.)([a-z]+)",
                by_groups([Punctuation, NameAttribute]),
                Action::None,
            )],
        )
        .build()
        .unwrap();
    assert_eq!(
        lex_all(&table, ".foo"),
        vec![pair(Punctuation, "."), pair(NameAttribute, "foo")]
    );
}

#[test]
fn test_by_groups_non_participating_group_emits_nothing() {
    let table = TableBuilder::new()
        .state(
            "root",
            [rule(r"(a)|(b)", by_groups([Keyword, Operator]), Action::None)],
        )
        .build()
        .unwrap();
    assert_eq!(lex_all(&table, "b"), vec![pair(Operator, "b")]);
    assert_eq!(lex_all(&table, "a"), vec![pair(Keyword, "a")]);
}

#[test]
fn test_by_groups_uncovered_stretch_is_emitted_as_text() {
    // "x" sits between the two listed groups; it must still be emitted so
    // the output reconstructs the input.
    let table = TableBuilder::new()
        .state(
            "root",
            [rule(r"(a)x(b)", by_groups([Keyword, Keyword]), Action::None)],
        )
        .build()
        .unwrap();
    assert_eq!(
        lex_all(&table, "axb"),
        vec![pair(Keyword, "a"), pair(Text, "x"), pair(Keyword, "b")]
    );
}

#[test]
fn test_using_sub_lexes_the_match() {
    let table = TableBuilder::new()
        .state(
            "root",
            [
                rule(r"\s+", Whitespace, Action::None),
                rule(r"\w+", using("letters"), Action::None),
            ],
        )
        .state(
            "letters",
            [
                rule(r"[aeiou]+", NameBuiltin, Action::None),
                rule(r"[^aeiou]+", Text, Action::None),
            ],
        )
        .build()
        .unwrap();
    assert_eq!(
        lex_all(&table, "ab ba"),
        vec![
            pair(NameBuiltin, "a"),
            pair(Text, "b"),
            pair(Whitespace, " "),
            pair(Text, "b"),
            pair(NameBuiltin, "a"),
        ]
    );
}

#[test]
fn test_using_rebases_spans_to_the_full_input() {
    let table = TableBuilder::new()
        .state(
            "root",
            [
                rule(r"\s+", Whitespace, Action::None),
                rule(r"\w+", using("inner"), Action::None),
            ],
        )
        .state("inner", [rule(r".", Name, Action::None)])
        .build()
        .unwrap();
    let input = " ab";
    for token in table.tokenize(input) {
        assert_eq!(&input[token.span.to_range()], token.text);
    }
}

#[test]
fn test_by_groups_with_nested_using() {
    // One group re-tokenized with another state, the rest plain kinds.
    let table = TableBuilder::new()
        .state(
            "root",
            [rule(
                r"(\w+)(=)(\w+)",
                by_groups(vec![
                    tint_lexer::GroupEmit::Token(NameAttribute),
                    tint_lexer::GroupEmit::Token(Operator),
                    tint_lexer::GroupEmit::using("value"),
                ]),
                Action::None,
            )],
        )
        .state(
            "value",
            [
                rule(r"\d+", LiteralNumberInteger, Action::None),
                rule(r"[a-z]+", Name, Action::None),
            ],
        )
        .build()
        .unwrap();
    assert_eq!(
        lex_all(&table, "speed=14"),
        vec![
            pair(NameAttribute, "speed"),
            pair(Operator, "="),
            pair(LiteralNumberInteger, "14"),
        ]
    );
}

#[test]
fn test_recursive_using_is_bounded() {
    // A state that sub-lexes its whole match with itself would recurse
    // forever; the nesting limit turns the innermost run into one error
    // token and the run still terminates and round-trips.
    let table = TableBuilder::new()
        .state("root", [rule(r".+", using("root"), Action::None)])
        .build()
        .unwrap();
    let mut stream = table.tokenize("abc");
    let tokens: Vec<_> = stream.by_ref().collect();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, Error);
    assert_eq!(tokens[0].text, "abc");
    assert!(stream
        .diagnostics()
        .diagnostics()
        .iter()
        .any(|d| d.code == codes::SUB_LEXER_DEPTH_EXCEEDED));
}

#[test]
fn test_run_is_abandonable() {
    // Lazy stream: the caller may stop pulling at any point.
    let table = TableBuilder::new()
        .state("root", [rule(r".", Text, Action::None)])
        .build()
        .unwrap();
    let mut stream = table.tokenize("abcdef");
    assert_eq!(stream.next().map(|t| t.text), Some("a"));
    assert_eq!(stream.position(), 1);
    drop(stream);
}
