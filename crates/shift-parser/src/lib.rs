//! Recursive-descent parser for Shift source, producing an arena-based AST
//! ([`ast::ParsedFile`]) from the token stream [`shift_lexer`] emits.

pub mod ast;
mod expr_parser;
mod parser;

use shift_common::{DiagnosticSink, SourceMap};

pub use ast::{Class, ExprArena, ExprId, ExprNode, Function, ModFlags, ParamList, ParsedFile, Stmt, StmtArena, StmtId, StmtKind, Type, Variable};
pub use parser::Parser;

/// Tokenizes and parses one source file, returning its AST. Diagnostics are
/// buffered into `sink`; the caller decides when to flush/print them.
pub fn parse_file<'src>(source_map: &'src SourceMap, path: impl Into<String>, sink: &mut DiagnosticSink) -> ParsedFile {
    let path = path.into();
    let tokens = shift_lexer::Lexer::new(source_map.source(), path.clone()).tokenize(sink);
    Parser::new(tokens, source_map, path).parse(sink)
}
