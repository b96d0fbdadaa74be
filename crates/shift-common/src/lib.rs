//! Shared types for the Shift compiler front end: source spans, the line
//! index used for diagnostic rendering, the bit-flag token kind encoding,
//! and the diagnostic sink threaded through the tokenizer, parser, and
//! analyzer.

pub mod cursor;
pub mod diagnostics;
pub mod source_map;
pub mod span;
pub mod token;

pub use cursor::TokenCursor;
pub use diagnostics::{Diagnostic, DiagnosticSink, Severity};
pub use source_map::SourceMap;
pub use span::Span;
pub use token::{is_keyword, Token, TokenKind};
