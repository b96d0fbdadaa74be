//! Black-box tests against the crate's public API: feed source text in,
//! check the token kinds/text/positions that come out. No access to
//! `Lexer`'s private cursor/state.

use shift_common::{DiagnosticSink, TokenKind};
use shift_lexer::Lexer;

fn lex(src: &str) -> (Vec<TokenKind>, DiagnosticSink) {
    let mut sink = DiagnosticSink::new();
    let tokens = Lexer::new(src, "t.sh").tokenize(&mut sink);
    (tokens.into_iter().map(|t| t.kind).collect(), sink)
}

fn lex_texts(src: &str) -> Vec<String> {
    let mut sink = DiagnosticSink::new();
    Lexer::new(src, "t.sh")
        .tokenize(&mut sink)
        .into_iter()
        .map(|t| t.text.to_string())
        .collect()
}

#[test]
fn full_class_declaration_tokenizes_cleanly() {
    let (kinds, mut sink) = lex("module m; class C { int x; void f() { return x; } }");
    let (rendered, has_error) = sink.print_exit_clear();
    assert!(!has_error, "{rendered:?}");
    assert!(kinds.contains(&TokenKind::IDENTIFIER));
    assert!(kinds.contains(&TokenKind::LEFT_SCOPE_BRACKET));
    assert!(kinds.contains(&TokenKind::RIGHT_SCOPE_BRACKET));
}

#[test]
fn number_literal_kinds_are_distinguished() {
    let texts = lex_texts("1 1.5 .5 1.5d 0xFF 0b101");
    assert_eq!(texts, vec!["1", "1.5", ".5", "1.5d", "0xFF", "0b101"]);
    let (kinds, _) = lex("1 1.5 .5 1.5d 0xFF 0b101");
    assert_eq!(
        kinds,
        vec![
            TokenKind::NUMBER_LITERAL,
            TokenKind::FLOAT,
            TokenKind::FLOAT,
            TokenKind::DOUBLE,
            TokenKind::HEX_NUMBER,
            TokenKind::BINARY_NUMBER,
        ]
    );
}

#[test]
fn compound_operators_lex_as_single_tokens() {
    let (kinds, _) = lex("== != <= >= && || ++ -- += -=");
    assert_eq!(
        kinds,
        vec![
            TokenKind::EQUALS_EQUALS,
            TokenKind::NOT_EQUAL,
            TokenKind::LESS_THAN_OR_EQUAL,
            TokenKind::GREATER_THAN_OR_EQUAL,
            TokenKind::AND_AND,
            TokenKind::OR_OR,
            TokenKind::PLUS_PLUS,
            TokenKind::MINUS_MINUS,
            TokenKind::PLUS_EQUALS,
            TokenKind::MINUS_EQUALS,
        ]
    );
}

#[test]
fn string_and_char_literals_round_trip_text() {
    let texts = lex_texts(r#""hello" 'c'"#);
    assert_eq!(texts, vec![r#""hello""#, "'c'"]);
}

#[test]
fn unterminated_string_is_reported_but_does_not_stop_the_scan() {
    let (kinds, mut sink) = lex("\"unterminated\nident");
    let (_rendered, has_error) = sink.print_exit_clear();
    assert!(has_error);
    assert_eq!(kinds, vec![TokenKind::STRING_LITERAL, TokenKind::IDENTIFIER]);
}

#[test]
fn line_and_block_comments_are_not_tokens() {
    let (kinds, mut sink) = lex("x // trailing comment\n/* block */ y");
    let (_rendered, has_error) = sink.print_exit_clear();
    assert!(!has_error);
    assert_eq!(kinds, vec![TokenKind::IDENTIFIER, TokenKind::IDENTIFIER]);
}

#[test]
fn empty_input_produces_no_tokens() {
    let (kinds, mut sink) = lex("");
    let (_rendered, has_error) = sink.print_exit_clear();
    assert!(!has_error);
    assert!(kinds.is_empty());
}
