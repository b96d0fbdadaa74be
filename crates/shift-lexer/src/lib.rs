//! Single-pass tokenizer for Shift source files.
//!
//! [`Lexer::tokenize`] turns a source buffer into a flat [`Vec<Token>`],
//! reporting every lexical problem to a [`DiagnosticSink`] and never
//! aborting: scanning always continues to end of input so a single
//! invocation surfaces as many problems as possible.

mod cursor;

use cursor::{Cursor, EOF_CHAR};
use shift_common::{Diagnostic, DiagnosticSink, Severity, Span, Token, TokenKind};

pub struct Lexer<'src> {
    cursor: Cursor<'src>,
    source: &'src str,
    path: String,
    line: u32,
    col: u32,
    /// Byte offset of the start of the current line, used to slice the
    /// offending line's text when emitting a diagnostic.
    line_start: u32,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str, path: impl Into<String>) -> Self {
        Self {
            cursor: Cursor::new(source),
            source,
            path: path.into(),
            line: 1,
            col: 1,
            line_start: 0,
        }
    }

    /// Scan the whole buffer, returning every emitted token (not including
    /// a synthetic EOF token) plus line/col bookkeeping along the way.
    pub fn tokenize(mut self, sink: &mut DiagnosticSink) -> Vec<Token<'src>> {
        let mut tokens = Vec::new();
        loop {
            self.skip_trivia(sink);
            if self.cursor.is_eof() {
                break;
            }
            if let Some(token) = self.lex_one(sink) {
                tokens.push(token);
            }
        }
        tokens
    }

    fn current_line_text(&self) -> &'src str {
        let end = self.source[self.line_start as usize..]
            .find('\n')
            .map(|i| self.line_start as usize + i)
            .unwrap_or(self.source.len());
        &self.source[self.line_start as usize..end]
    }

    fn error(&self, sink: &mut DiagnosticSink, line: u32, col: u32, len: u32, message: impl Into<String>) {
        sink.emit(Diagnostic::new(
            Severity::Error,
            message,
            self.path.clone(),
            line,
            col,
            len,
            self.current_line_text(),
        ));
    }

    fn advance_pos(&mut self, ch: char) {
        match ch {
            '\n' => {
                self.line += 1;
                self.col = 1;
                self.line_start = self.cursor.pos();
            }
            '\t' => self.col += 4,
            _ => self.col += 1,
        }
    }

    fn bump(&mut self) -> char {
        let ch = self.cursor.advance().unwrap_or(EOF_CHAR);
        self.advance_pos(ch);
        ch
    }

    /// Skip whitespace and comments; neither produces a token.
    fn skip_trivia(&mut self, sink: &mut DiagnosticSink) {
        loop {
            match self.cursor.peek() {
                ' ' | '\t' | '\n' | '\r' => {
                    self.bump();
                }
                '/' if self.cursor.peek_next() == '/' => {
                    while self.cursor.peek() != '\n' && !self.cursor.is_eof() {
                        self.bump();
                    }
                }
                '/' if self.cursor.peek_next() == '*' => {
                    let (start_line, start_col) = (self.line, self.col);
                    self.bump();
                    self.bump();
                    loop {
                        if self.cursor.is_eof() {
                            self.error(
                                sink,
                                start_line,
                                start_col,
                                2,
                                "unterminated block comment",
                            );
                            break;
                        }
                        if self.cursor.peek() == '*' && self.cursor.peek_next() == '/' {
                            self.bump();
                            self.bump();
                            break;
                        }
                        self.bump();
                    }
                }
                _ => break,
            }
        }
    }

    fn lex_one(&mut self, sink: &mut DiagnosticSink) -> Option<Token<'src>> {
        let start_pos = self.cursor.pos();
        let (line, col) = (self.line, self.col);
        let first = self.bump();

        let kind = match first {
            c if is_ident_start(c) => {
                self.cursor.eat_while(is_ident_continue);
                TokenKind::IDENTIFIER
            }
            c if c.is_ascii_digit() => return Some(self.lex_number(start_pos, line, col, sink)),
            '.' if self.cursor.peek().is_ascii_digit() => {
                return Some(self.lex_number(start_pos, line, col, sink))
            }
            '"' => return Some(self.lex_string(start_pos, line, col, sink)),
            '\'' => return Some(self.lex_char(start_pos, line, col, sink)),

            '=' => self.maybe_equals(TokenKind::EQUALS, TokenKind::EQUALS_EQUALS),
            '>' => {
                if self.cursor.peek() == '=' {
                    self.bump();
                    TokenKind::GREATER_THAN_OR_EQUAL
                } else if self.cursor.peek() == '>' {
                    self.bump();
                    if self.cursor.peek() == '=' {
                        self.bump();
                        TokenKind::SHIFT_RIGHT_EQUALS
                    } else {
                        TokenKind::SHIFT_RIGHT
                    }
                } else {
                    TokenKind::GREATER_THAN
                }
            }
            '<' => {
                if self.cursor.peek() == '=' {
                    self.bump();
                    TokenKind::LESS_THAN_OR_EQUAL
                } else if self.cursor.peek() == '<' {
                    self.bump();
                    if self.cursor.peek() == '=' {
                        self.bump();
                        TokenKind::SHIFT_LEFT_EQUALS
                    } else {
                        TokenKind::SHIFT_LEFT
                    }
                } else {
                    TokenKind::LESS_THAN
                }
            }
            '%' => self.maybe_equals(TokenKind::MODULO, TokenKind::MODULO_EQUALS),
            '|' => {
                if self.cursor.peek() == '|' {
                    self.bump();
                    TokenKind::OR_OR
                } else if self.cursor.peek() == '=' {
                    self.bump();
                    TokenKind::OR_EQUALS
                } else {
                    TokenKind::OR
                }
            }
            '&' => {
                if self.cursor.peek() == '&' {
                    self.bump();
                    TokenKind::AND_AND
                } else if self.cursor.peek() == '=' {
                    self.bump();
                    TokenKind::AND_EQUALS
                } else {
                    TokenKind::AND
                }
            }
            '^' => self.maybe_equals(TokenKind::XOR, TokenKind::XOR_EQUALS),
            '~' => TokenKind::FLIP_BITS,
            '!' => self.maybe_equals(TokenKind::NOT, TokenKind::NOT_EQUAL),
            '+' => {
                if self.cursor.peek() == '+' {
                    self.bump();
                    TokenKind::PLUS_PLUS
                } else if self.cursor.peek() == '=' {
                    self.bump();
                    TokenKind::PLUS_EQUALS
                } else {
                    TokenKind::PLUS
                }
            }
            '-' => {
                if self.cursor.peek() == '-' {
                    self.bump();
                    TokenKind::MINUS_MINUS
                } else if self.cursor.peek() == '=' {
                    self.bump();
                    TokenKind::MINUS_EQUALS
                } else {
                    TokenKind::MINUS
                }
            }
            '*' => self.maybe_equals(TokenKind::MULTIPLY, TokenKind::MULTIPLY_EQUALS),
            '/' => self.maybe_equals(TokenKind::DIVIDE, TokenKind::DIVIDE_EQUALS),
            '(' => TokenKind::LEFT_BRACKET,
            ')' => TokenKind::RIGHT_BRACKET,
            '[' => TokenKind::LEFT_SQUARE_BRACKET,
            ']' => TokenKind::RIGHT_SQUARE_BRACKET,
            '{' => TokenKind::LEFT_SCOPE_BRACKET,
            '}' => TokenKind::RIGHT_SCOPE_BRACKET,
            '.' => TokenKind::DOT,
            ',' => TokenKind::COMMA,
            '?' => TokenKind::QUESTION_MARK,
            ':' => TokenKind::COLON,
            ';' => TokenKind::SEMICOLON,
            '\\' => TokenKind::BACKSLASH,
            other => {
                self.error(sink, line, col, 1, format!("unexpected symbol '{other}'"));
                return None;
            }
        };

        Some(Token::new(
            self.cursor.slice(start_pos),
            kind,
            Span::new(start_pos, self.cursor.pos()),
            line,
            col,
        ))
    }

    /// Used for the simple "`c` or `c=`" operators that have no doubled form.
    fn maybe_equals(&mut self, plain: TokenKind, with_eq: TokenKind) -> TokenKind {
        if self.cursor.peek() == '=' {
            self.bump();
            with_eq
        } else {
            plain
        }
    }

    fn lex_number(
        &mut self,
        start_pos: u32,
        line: u32,
        col: u32,
        sink: &mut DiagnosticSink,
    ) -> Token<'src> {
        let first = self.cursor.slice(start_pos).chars().next().unwrap();
        let mut kind = TokenKind::NUMBER_LITERAL;

        if first == '0' && (self.cursor.peek() == 'b' || self.cursor.peek() == 'B') {
            self.bump();
            let digits_start = self.cursor.pos();
            self.cursor.eat_while(|c| c == '0' || c == '1');
            if self.cursor.pos() == digits_start {
                self.error(sink, line, col, self.cursor.pos() - start_pos, "expected binary digit");
            }
            kind = TokenKind::BINARY_NUMBER;
        } else if first == '0' && (self.cursor.peek() == 'x' || self.cursor.peek() == 'X') {
            self.bump();
            let digits_start = self.cursor.pos();
            self.cursor.eat_while(|c| c.is_ascii_hexdigit());
            if self.cursor.pos() == digits_start {
                self.error(sink, line, col, self.cursor.pos() - start_pos, "expected hex digit");
            }
            kind = TokenKind::HEX_NUMBER;
        } else {
            self.cursor.eat_while(|c| c.is_ascii_digit());
            let mut is_float = first == '.';
            if self.cursor.peek() == '.' && self.cursor.peek_next().is_ascii_digit() {
                self.bump();
                self.cursor.eat_while(|c| c.is_ascii_digit());
                is_float = true;
            }
            match self.cursor.peek() {
                'f' | 'F' => {
                    self.bump();
                    kind = TokenKind::FLOAT;
                }
                'd' | 'D' => {
                    self.bump();
                    kind = TokenKind::DOUBLE;
                }
                _ if is_float => kind = TokenKind::FLOAT,
                _ => kind = TokenKind::NUMBER_LITERAL,
            }
        }

        Token::new(
            self.cursor.slice(start_pos),
            kind,
            Span::new(start_pos, self.cursor.pos()),
            line,
            col,
        )
    }

    fn lex_string(
        &mut self,
        start_pos: u32,
        line: u32,
        col: u32,
        sink: &mut DiagnosticSink,
    ) -> Token<'src> {
        loop {
            if self.cursor.is_eof() || self.cursor.peek() == '\n' {
                self.error(
                    sink,
                    line,
                    col,
                    self.cursor.pos() - start_pos,
                    "unterminated string literal",
                );
                break;
            }
            match self.cursor.peek() {
                '"' => {
                    self.bump();
                    break;
                }
                '\\' => {
                    let (esc_line, esc_col) = (self.line, self.col);
                    self.bump();
                    let escape = self.cursor.peek();
                    if is_recognized_escape(escape) {
                        self.bump();
                    } else {
                        self.error(sink, esc_line, esc_col, 2, format!("invalid escape sequence '\\{escape}'"));
                        if !self.cursor.is_eof() {
                            self.bump();
                        }
                    }
                }
                _ => {
                    self.bump();
                }
            }
        }
        Token::new(
            self.cursor.slice(start_pos),
            TokenKind::STRING_LITERAL,
            Span::new(start_pos, self.cursor.pos()),
            line,
            col,
        )
    }

    fn lex_char(
        &mut self,
        start_pos: u32,
        line: u32,
        col: u32,
        sink: &mut DiagnosticSink,
    ) -> Token<'src> {
        if self.cursor.peek() == '\'' {
            self.bump();
            self.error(sink, line, col, 2, "character literal cannot be empty");
            return Token::new(
                self.cursor.slice(start_pos),
                TokenKind::CHAR_LITERAL,
                Span::new(start_pos, self.cursor.pos()),
                line,
                col,
            );
        }

        if self.cursor.peek() == '\\' {
            self.bump();
            let escape = self.cursor.peek();
            if is_recognized_escape(escape) {
                self.bump();
            } else {
                self.error(sink, line, col, 2, format!("invalid escape sequence '\\{escape}'"));
                if !self.cursor.is_eof() {
                    self.bump();
                }
            }
        } else if !self.cursor.is_eof() {
            self.bump();
        }

        if self.cursor.peek() == '\'' {
            self.bump();
        } else {
            self.error(
                sink,
                line,
                col,
                self.cursor.pos() - start_pos,
                "unterminated character literal",
            );
        }

        Token::new(
            self.cursor.slice(start_pos),
            TokenKind::CHAR_LITERAL,
            Span::new(start_pos, self.cursor.pos()),
            line,
            col,
        )
    }
}

fn is_recognized_escape(c: char) -> bool {
    matches!(
        c.to_ascii_lowercase(),
        'a' | 'b' | 'f' | 'n' | 'r' | 't' | 'v' | '\\' | '\'' | '"'
    )
}

pub fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

pub fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(src: &str) -> (Vec<Token<'_>>, DiagnosticSink) {
        let mut sink = DiagnosticSink::new();
        let tokens = Lexer::new(src, "t.sh").tokenize(&mut sink);
        (tokens, sink)
    }

    #[test]
    fn empty_source_has_no_tokens_or_diagnostics() {
        let (tokens, mut sink) = lex("");
        assert!(tokens.is_empty());
        assert!(!sink.has_error());
        sink.flush_all();
        assert!(sink.committed().is_empty());
    }

    #[test]
    fn identifiers_and_keywords_are_both_identifier_kind() {
        let (tokens, _) = lex("module foo");
        assert_eq!(tokens.len(), 2);
        assert!(tokens.iter().all(|t| t.kind == TokenKind::IDENTIFIER));
        assert!(tokens[0].is_keyword("module"));
        assert!(!tokens[1].is_keyword("module"));
    }

    #[test]
    fn integer_float_double_and_hex_number_forms() {
        let (tokens, _) = lex("1 1.5 1.5f 2d 0x1F 0b101");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
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
    fn leading_dot_number_is_float() {
        let (tokens, _) = lex(".5");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::FLOAT);
        assert_eq!(tokens[0].text, ".5");
    }

    #[test]
    fn empty_binary_and_hex_prefix_errors() {
        let (_, mut sink) = lex("0b 0x");
        sink.flush_all();
        assert_eq!(sink.committed().len(), 2);
        assert!(sink.committed()[0].message.contains("binary digit"));
        assert!(sink.committed()[1].message.contains("hex digit"));
    }

    #[test]
    fn maximal_munch_operators() {
        let (tokens, _) = lex("== != <= >= && || ++ -- << >> += -= <<=");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
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
                TokenKind::SHIFT_LEFT,
                TokenKind::SHIFT_RIGHT,
                TokenKind::PLUS_EQUALS,
                TokenKind::MINUS_EQUALS,
                TokenKind::SHIFT_LEFT_EQUALS,
            ]
        );
    }

    #[test]
    fn string_literal_with_escape() {
        let (tokens, mut sink) = lex(r#""a\nb""#);
        sink.flush_all();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::STRING_LITERAL);
        assert!(sink.committed().is_empty());
    }

    #[test]
    fn unrecognized_escape_is_reported_but_recovers() {
        let (tokens, mut sink) = lex(r#""a\qb""#);
        sink.flush_all();
        assert_eq!(tokens.len(), 1);
        assert_eq!(sink.committed().len(), 1);
        assert!(sink.committed()[0].message.contains("escape"));
    }

    #[test]
    fn unterminated_string_stops_at_newline() {
        let (tokens, mut sink) = lex("\"abc\ndef");
        sink.flush_all();
        assert_eq!(tokens.len(), 2); // the broken string, then `def` as an identifier
        assert_eq!(tokens[0].kind, TokenKind::STRING_LITERAL);
        assert_eq!(sink.committed().len(), 1);
        assert!(sink.committed()[0].message.contains("unterminated string"));
    }

    #[test]
    fn empty_char_literal_errors() {
        let (tokens, mut sink) = lex("''");
        sink.flush_all();
        assert_eq!(tokens.len(), 1);
        assert_eq!(sink.committed().len(), 1);
        assert_eq!(sink.committed()[0].message, "character literal cannot be empty");
    }

    #[test]
    fn char_literal_happy_path() {
        let (tokens, mut sink) = lex("'a' '\\n'");
        sink.flush_all();
        assert_eq!(tokens.len(), 2);
        assert!(tokens.iter().all(|t| t.kind == TokenKind::CHAR_LITERAL));
        assert!(sink.committed().is_empty());
    }

    #[test]
    fn line_comment_is_skipped() {
        let (tokens, _) = lex("a // comment\nb");
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn block_comment_is_skipped_across_lines() {
        let (tokens, _) = lex("a /* comment\nspanning */ b");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn unexpected_symbol_reports_and_continues() {
        let (tokens, mut sink) = lex("a @ b");
        sink.flush_all();
        assert_eq!(tokens.len(), 2);
        assert_eq!(sink.committed().len(), 1);
        assert!(sink.committed()[0].message.contains("unexpected symbol"));
    }

    #[test]
    fn tab_advances_column_by_four() {
        let (tokens, _) = lex("\tfoo");
        assert_eq!(tokens[0].col, 5);
    }

    #[test]
    fn newline_resets_column_and_advances_line() {
        let (tokens, _) = lex("a\nb");
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[1].line, 2);
        assert_eq!(tokens[1].col, 1);
    }
}
