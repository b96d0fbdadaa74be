use std::fmt;

use serde::Serialize;

use crate::span::Span;

/// A token kind, encoded as a bit field rather than a flat enum.
///
/// Most kinds are small, disjoint base values. Composite kinds are formed by
/// OR-ing a base kind with a flag bit: the high bit [`TokenKind::EQUALS_FLAG`]
/// marks "this operator followed by `=`" (`PLUS` -> `PLUS_EQUALS`), and four
/// further high bits each mark one doubled operator (`OR` -> `OR_OR`, `AND`
/// -> `AND_AND`, `PLUS` -> `PLUS_PLUS`, `MINUS` -> `MINUS_MINUS`). Bare `=`
/// is itself just [`TokenKind::EQUALS_FLAG`] with no base bits set.
///
/// The encoding exists so the parser can test `has_equals`/`strip_equals` on
/// any composite assignment operator without a match over every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TokenKind(pub u32);

impl TokenKind {
    pub const EQUALS_FLAG: u32 = 1 << 31;
    const DOUBLE_EQ_FLAG: u32 = 1 << 30;
    const DOUBLE_OR_FLAG: u32 = 1 << 29;
    const DOUBLE_AND_FLAG: u32 = 1 << 28;
    const DOUBLE_PLUS_FLAG: u32 = 1 << 27;
    const DOUBLE_MINUS_FLAG: u32 = 1 << 26;

    pub const NULL_TOKEN: TokenKind = TokenKind(0);

    pub const IDENTIFIER: TokenKind = TokenKind(1);
    pub const NUMBER_LITERAL: TokenKind = TokenKind(2);
    pub const BINARY_NUMBER: TokenKind = TokenKind(3);
    pub const HEX_NUMBER: TokenKind = TokenKind(4);
    pub const FLOAT: TokenKind = TokenKind(5);
    pub const DOUBLE: TokenKind = TokenKind(6);
    pub const GREATER_THAN: TokenKind = TokenKind(7);
    pub const LESS_THAN: TokenKind = TokenKind(8);
    pub const MODULO: TokenKind = TokenKind(9);
    pub const OR: TokenKind = TokenKind(10);
    pub const AND: TokenKind = TokenKind(11);
    pub const XOR: TokenKind = TokenKind(12);
    pub const FLIP_BITS: TokenKind = TokenKind(13);
    pub const NOT: TokenKind = TokenKind(14);
    pub const PLUS: TokenKind = TokenKind(15);
    pub const MINUS: TokenKind = TokenKind(16);
    pub const MULTIPLY: TokenKind = TokenKind(17);
    pub const DIVIDE: TokenKind = TokenKind(18);
    pub const LEFT_BRACKET: TokenKind = TokenKind(19);
    pub const RIGHT_BRACKET: TokenKind = TokenKind(20);
    pub const LEFT_SQUARE_BRACKET: TokenKind = TokenKind(21);
    pub const RIGHT_SQUARE_BRACKET: TokenKind = TokenKind(22);
    pub const LEFT_SCOPE_BRACKET: TokenKind = TokenKind(23);
    pub const RIGHT_SCOPE_BRACKET: TokenKind = TokenKind(24);
    pub const DOT: TokenKind = TokenKind(25);
    pub const COMMA: TokenKind = TokenKind(26);
    pub const QUESTION_MARK: TokenKind = TokenKind(27);
    pub const COLON: TokenKind = TokenKind(28);
    pub const SEMICOLON: TokenKind = TokenKind(29);
    pub const STRING_LITERAL: TokenKind = TokenKind(30);
    pub const CHAR_LITERAL: TokenKind = TokenKind(31);
    pub const SHIFT_LEFT: TokenKind = TokenKind(32);
    pub const SHIFT_RIGHT: TokenKind = TokenKind(33);
    pub const BACKSLASH: TokenKind = TokenKind(34);

    pub const EQUALS: TokenKind = TokenKind(Self::EQUALS_FLAG);

    pub const EOF: TokenKind = TokenKind(35);
    pub const ERROR: TokenKind = TokenKind(36);

    /// `kind | EQUALS_FLAG`, e.g. `PLUS.with_equals() == PLUS_EQUALS`.
    pub const fn with_equals(self) -> TokenKind {
        TokenKind(self.0 | Self::EQUALS_FLAG)
    }

    pub const EQUALS_EQUALS: TokenKind = TokenKind(Self::DOUBLE_EQ_FLAG | Self::EQUALS_FLAG);
    pub const GREATER_THAN_OR_EQUAL: TokenKind = Self::GREATER_THAN.with_equals();
    pub const LESS_THAN_OR_EQUAL: TokenKind = Self::LESS_THAN.with_equals();
    pub const MODULO_EQUALS: TokenKind = Self::MODULO.with_equals();
    pub const OR_EQUALS: TokenKind = Self::OR.with_equals();
    pub const OR_OR: TokenKind = TokenKind(Self::DOUBLE_OR_FLAG | Self::OR.0);
    pub const AND_EQUALS: TokenKind = Self::AND.with_equals();
    pub const AND_AND: TokenKind = TokenKind(Self::DOUBLE_AND_FLAG | Self::AND.0);
    pub const XOR_EQUALS: TokenKind = Self::XOR.with_equals();
    pub const NOT_EQUAL: TokenKind = Self::NOT.with_equals();
    pub const PLUS_EQUALS: TokenKind = Self::PLUS.with_equals();
    pub const PLUS_PLUS: TokenKind = TokenKind(Self::DOUBLE_PLUS_FLAG | Self::PLUS.0);
    pub const MINUS_EQUALS: TokenKind = Self::MINUS.with_equals();
    pub const MINUS_MINUS: TokenKind = TokenKind(Self::DOUBLE_MINUS_FLAG | Self::MINUS.0);
    pub const MULTIPLY_EQUALS: TokenKind = Self::MULTIPLY.with_equals();
    pub const DIVIDE_EQUALS: TokenKind = Self::DIVIDE.with_equals();
    pub const SHIFT_LEFT_EQUALS: TokenKind = Self::SHIFT_LEFT.with_equals();
    pub const SHIFT_RIGHT_EQUALS: TokenKind = Self::SHIFT_RIGHT.with_equals();

    /// Whether the `=` flag is set on this kind. True for bare `EQUALS` too.
    pub const fn has_equals(self) -> bool {
        self.0 & Self::EQUALS_FLAG != 0
    }

    /// Recover the base operator by clearing the `=` flag.
    /// `strip_equals(PLUS_EQUALS) == PLUS`; `strip_equals(EQUALS) == NULL_TOKEN`.
    pub const fn strip_equals(self) -> TokenKind {
        TokenKind(self.0 & !Self::EQUALS_FLAG)
    }

    pub const fn is_identifier(self) -> bool {
        self.0 == Self::IDENTIFIER.0
    }

    pub const fn is_number(self) -> bool {
        self.0 == Self::NUMBER_LITERAL.0
            || self.0 == Self::BINARY_NUMBER.0
            || self.0 == Self::HEX_NUMBER.0
            || self.0 == Self::FLOAT.0
            || self.0 == Self::DOUBLE.0
    }

    pub const fn is_eof(self) -> bool {
        self.0 == Self::EOF.0
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            Self::NULL_TOKEN => "NULL_TOKEN",
            Self::IDENTIFIER => "IDENTIFIER",
            Self::NUMBER_LITERAL => "NUMBER_LITERAL",
            Self::BINARY_NUMBER => "BINARY_NUMBER",
            Self::HEX_NUMBER => "HEX_NUMBER",
            Self::FLOAT => "FLOAT",
            Self::DOUBLE => "DOUBLE",
            Self::GREATER_THAN => "GREATER_THAN",
            Self::LESS_THAN => "LESS_THAN",
            Self::MODULO => "MODULO",
            Self::OR => "OR",
            Self::AND => "AND",
            Self::XOR => "XOR",
            Self::FLIP_BITS => "FLIP_BITS",
            Self::NOT => "NOT",
            Self::PLUS => "PLUS",
            Self::MINUS => "MINUS",
            Self::MULTIPLY => "MULTIPLY",
            Self::DIVIDE => "DIVIDE",
            Self::LEFT_BRACKET => "LEFT_BRACKET",
            Self::RIGHT_BRACKET => "RIGHT_BRACKET",
            Self::LEFT_SQUARE_BRACKET => "LEFT_SQUARE_BRACKET",
            Self::RIGHT_SQUARE_BRACKET => "RIGHT_SQUARE_BRACKET",
            Self::LEFT_SCOPE_BRACKET => "LEFT_SCOPE_BRACKET",
            Self::RIGHT_SCOPE_BRACKET => "RIGHT_SCOPE_BRACKET",
            Self::DOT => "DOT",
            Self::COMMA => "COMMA",
            Self::QUESTION_MARK => "QUESTION_MARK",
            Self::COLON => "COLON",
            Self::SEMICOLON => "SEMICOLON",
            Self::STRING_LITERAL => "STRING_LITERAL",
            Self::CHAR_LITERAL => "CHAR_LITERAL",
            Self::SHIFT_LEFT => "SHIFT_LEFT",
            Self::SHIFT_RIGHT => "SHIFT_RIGHT",
            Self::BACKSLASH => "BACKSLASH",
            Self::EQUALS => "EQUALS",
            Self::EQUALS_EQUALS => "EQUALS_EQUALS",
            Self::GREATER_THAN_OR_EQUAL => "GREATER_THAN_OR_EQUAL",
            Self::LESS_THAN_OR_EQUAL => "LESS_THAN_OR_EQUAL",
            Self::MODULO_EQUALS => "MODULO_EQUALS",
            Self::OR_EQUALS => "OR_EQUALS",
            Self::OR_OR => "OR_OR",
            Self::AND_EQUALS => "AND_EQUALS",
            Self::AND_AND => "AND_AND",
            Self::XOR_EQUALS => "XOR_EQUALS",
            Self::NOT_EQUAL => "NOT_EQUAL",
            Self::PLUS_EQUALS => "PLUS_EQUALS",
            Self::PLUS_PLUS => "PLUS_PLUS",
            Self::MINUS_EQUALS => "MINUS_EQUALS",
            Self::MINUS_MINUS => "MINUS_MINUS",
            Self::MULTIPLY_EQUALS => "MULTIPLY_EQUALS",
            Self::DIVIDE_EQUALS => "DIVIDE_EQUALS",
            Self::SHIFT_LEFT_EQUALS => "SHIFT_LEFT_EQUALS",
            Self::SHIFT_RIGHT_EQUALS => "SHIFT_RIGHT_EQUALS",
            Self::EOF => "EOF",
            Self::ERROR => "ERROR",
            _ => "UNKNOWN",
        };
        f.write_str(name)
    }
}

/// A reserved word. Keywords are not separate token kinds; a keyword is an
/// `IDENTIFIER` token whose `text` matches one of these.
pub const KEYWORDS: &[&str] = &[
    "module",
    "use",
    "class",
    "if",
    "else",
    "while",
    "for",
    "return",
    "break",
    "continue",
    "new",
    "this",
    "base",
    "null",
    "true",
    "false",
    "void",
    "public",
    "protected",
    "private",
    "static",
    "const",
    "extern",
    "ext",
    "binary",
    "explicit",
    "operator",
    "constructor",
    "destructor",
    "init",
    "throw",
];

pub fn is_keyword(text: &str) -> bool {
    KEYWORDS.contains(&text)
}

/// A single lexical token: the source slice it spans, its kind, and its
/// 1-based `(line, col)` position. `slice` borrows from the tokenizer's
/// source buffer and must not outlive it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    pub text: &'src str,
    pub kind: TokenKind,
    pub span: Span,
    pub line: u32,
    pub col: u32,
}

impl<'src> Token<'src> {
    pub fn new(text: &'src str, kind: TokenKind, span: Span, line: u32, col: u32) -> Self {
        Self {
            text,
            kind,
            span,
            line,
            col,
        }
    }

    /// The sentinel returned for out-of-range cursor access. Callers check
    /// `is_null()` rather than `Option`, matching the tokenizer's cursor
    /// contract (`peek`/`reverse_peek`/`token_at` never panic on overrun).
    pub const NULL: Token<'static> = Token {
        text: "",
        kind: TokenKind::NULL_TOKEN,
        span: Span { start: 0, end: 0 },
        line: 0,
        col: 0,
    };

    pub fn is_null(&self) -> bool {
        self.kind == TokenKind::NULL_TOKEN
    }

    pub fn is_keyword(&self, word: &str) -> bool {
        self.kind.is_identifier() && self.text == word
    }
}
