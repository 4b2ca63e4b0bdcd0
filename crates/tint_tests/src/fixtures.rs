//! A TorqueScript-shaped rule table.
//!
//! Condensed from the TorqueScript highlighting rules; patterns that
//! relied on lookahead are expressed through rule ordering instead, and
//! number literals are tried before bare entity names.

use tint_lexer::{
    by_groups, fallback, include, rule, using, Action, GroupEmit, LexerTable, MatchFlags,
    TableBuilder, TokenKind::*,
};

/// A small script exercising most of the fixture's states.
pub const SAMPLE_SOURCE: &str = r#"// move the player into the arena
function Arena::enter(%this, %client) {
   %greeting = "welcome" @ 'center';
   if (%client.score >= 10) {
      echo("veteran", %client);
   }
   %this.start(%client, 3.5);
}

datablock PlayerData(ArenaPlayer) {
   maxInv[0] = 31;
   speed = 14.5;
};
"#;

/// Build the TorqueScript-shaped table.
pub fn torquescript_table() -> LexerTable {
    TableBuilder::new()
        .flags(MatchFlags {
            dot_matches_new_line: true,
            ..MatchFlags::default()
        })
        .state(
            "commentsandwhitespace",
            [
                rule(r"\s+", Text, Action::None),
                rule(r"//.*?\n", CommentSingle, Action::None),
                rule(r"/\*.*?\*/", CommentMultiline, Action::None),
            ],
        )
        .state(
            "paramlist",
            [
                include("commentsandwhitespace"),
                rule(r"%this\b", NameBuiltin, Action::None),
                rule(r"%\w+", NameVariable, Action::None),
                rule(r"[(),]", Punctuation, Action::None),
            ],
        )
        .state(
            "arglist",
            [
                rule(r",", Punctuation, Action::None),
                rule(r"\)", Punctuation, Action::Pop(1)),
                include("expressions"),
            ],
        )
        .state(
            "objname",
            [
                include("commentsandwhitespace"),
                rule(r"[a-zA-Z_0-9]+", NameEntity, Action::None),
                rule(r"[():]", Punctuation, Action::None),
            ],
        )
        .state(
            "entity",
            [
                rule(r"%this\b", NameBuiltin, Action::None),
                rule(r"%\w+", NameVariable, Action::None),
                rule(r"\$[\w:\[\]]+", NameVariableGlobal, Action::None),
                rule(r"[a-zA-Z_0-9:]+", NameEntity, Action::None),
            ],
        )
        .state(
            "arrayaccessor",
            [
                rule(r"\]", Punctuation, Action::Pop(1)),
                include("expressions"),
            ],
        )
        .state(
            "accessors",
            [
                rule(r"\(", Punctuation, Action::push(["arglist"])),
                rule(
                    r"(\.)([a-zA-Z0-9_]+)",
                    by_groups([Punctuation, NameAttribute]),
                    Action::None,
                ),
                rule(r"\[", Punctuation, Action::push(["arrayaccessor"])),
                rule(
                    r"(-?->)([a-zA-Z0-9_]+)",
                    by_groups([Punctuation, NameAttribute]),
                    Action::None,
                ),
                fallback(Action::Pop(1)),
            ],
        )
        .state(
            "string",
            [
                rule(r#"""#, LiteralString, Action::Pop(1)),
                rule(
                    r#"\\([\\abfnrtv"']|x[a-fA-F0-9]{2,4}|u[a-fA-F0-9]{4}|U[a-fA-F0-9]{8}|[0-7]{1,3})"#,
                    LiteralStringEscape,
                    Action::None,
                ),
                rule(r#"[^\\"\n]+"#, LiteralString, Action::None),
                rule(r"\\\n", LiteralString, Action::None),
                rule(r"\\", LiteralString, Action::None),
            ],
        )
        .state(
            "tag",
            [
                rule(r"'", LiteralStringSingle, Action::Pop(1)),
                rule(r"[^\\'\n]+", LiteralStringSingle, Action::None),
            ],
        )
        .state(
            "expressions",
            [
                rule(r"(true|false)", NameBuiltin, Action::None),
                rule(r"(SPC|NL|TAB|@)", OperatorWord, Action::None),
                rule(r#"""#, LiteralString, Action::push(["string"])),
                rule(r"'", LiteralStringSingle, Action::push(["tag"])),
                rule(
                    r"(\d+\.\d*|\.\d+|\d+)[eE][+-]?\d+[LlUu]*",
                    LiteralNumberFloat,
                    Action::None,
                ),
                rule(r"(\d+\.\d*|\.\d+|\d+[fF])[fF]?", LiteralNumberFloat, Action::None),
                rule(r"0x[0-9a-fA-F]+[LlUu]*", LiteralNumberHex, Action::None),
                rule(r"0[0-7]+[LlUu]*", LiteralNumberOct, Action::None),
                rule(r"\d+[LlUu]*", LiteralNumberInteger, Action::None),
                rule(
                    r"([%\$]?[a-zA-Z0-9_:]+)(\s*)(\()",
                    by_groups([NameFunction, Text, Punctuation]),
                    Action::push(["accessors", "arglist"]),
                ),
                rule(
                    r"([%\$]?[a-zA-Z0-9_:]+)",
                    using("entity"),
                    Action::push(["accessors"]),
                ),
                rule(
                    r"(==|!=|>=|<=|&&|\|\||::|--|\+\+|\$=|!\$=|<<=|>>=|<<|>>|\+=|-=|\*=|/=|%=|&=|\^=|\|=|-->|->|\?|\+|-|\*|/|<|>|\||!|&|%|\^|~|=)",
                    Operator,
                    Action::None,
                ),
                rule(r"\s+", Text, Action::None),
            ],
        )
        .state(
            "declaration",
            [rule(
                r"(datablock|singleton)(\s*)([a-zA-Z0-9:_]+)(\s*\([^)]*\)[^{]*)(\{)",
                by_groups(vec![
                    GroupEmit::Token(KeywordDeclaration),
                    GroupEmit::Token(Text),
                    GroupEmit::Token(NameEntity),
                    GroupEmit::using("objname"),
                    GroupEmit::Token(Punctuation),
                ]),
                Action::push(["declarationbody"]),
            )],
        )
        .state(
            "logic-statement-condition",
            [
                include("commentsandwhitespace"),
                rule(r"\(", Punctuation, Action::None),
                rule(r"\)", Punctuation, Action::Pop(1)),
                rule(r";", Punctuation, Action::None),
                include("expressions"),
            ],
        )
        .state(
            "statement",
            [
                include("declaration"),
                include("commentsandwhitespace"),
                rule(
                    r"(if|else|switch|switch\$|for|foreach|foreach\$)",
                    Keyword,
                    Action::push(["logic-statement-condition"]),
                ),
                rule(r"\{", Punctuation, Action::push(["functionbody"])),
                rule(r"\}", Punctuation, Action::Pop(1)),
                include("expressions"),
                rule(r";", Punctuation, Action::Pop(1)),
            ],
        )
        .state(
            "declarationbody",
            [
                include("commentsandwhitespace"),
                include("declaration"),
                rule(
                    r"([a-zA-Z0-9_\[\]]+)(\s*=\s*[^;]+)(;)",
                    by_groups(vec![
                        GroupEmit::Token(NameAttribute),
                        GroupEmit::using("expressions"),
                        GroupEmit::Token(Punctuation),
                    ]),
                    Action::None,
                ),
                rule(r"\}", Punctuation, Action::Pop(1)),
            ],
        )
        .state(
            "functionbody",
            [
                include("commentsandwhitespace"),
                include("statement"),
                fallback(Action::Pop(1)),
            ],
        )
        .state(
            "root",
            [
                include("commentsandwhitespace"),
                rule(
                    r"(function)(\s*)([a-zA-Z_0-9:]+)(\s*\([^)]*\))([^{]*)(\{)",
                    by_groups(vec![
                        GroupEmit::Token(KeywordDeclaration),
                        GroupEmit::Token(Text),
                        GroupEmit::Token(NameFunction),
                        GroupEmit::using("paramlist"),
                        GroupEmit::using("root"),
                        GroupEmit::Token(Punctuation),
                    ]),
                    Action::push(["functionbody"]),
                ),
                fallback(Action::push(["statement"])),
            ],
        )
        .build()
        .expect("fixture table is valid")
}
