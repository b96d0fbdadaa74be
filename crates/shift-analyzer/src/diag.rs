//! Small diagnostic-emission helpers shared by [`crate::tables`] and
//! [`crate::resolve`]. Unlike the tokenizer and parser, the analyzer only
//! has byte [`Span`]s on its AST nodes (no token line/col), so every emitter
//! here converts through [`SourceMap::line_col`] first.

use shift_common::{Diagnostic, DiagnosticSink, Severity, SourceMap, Span};

pub(crate) fn emit(sink: &mut DiagnosticSink, source_map: &SourceMap, path: &str, span: Span, severity: Severity, message: impl Into<String>) {
    let (line, col) = source_map.line_col(span.start);
    sink.emit(Diagnostic::new(severity, message, path.to_string(), line, col, span.len().max(1), source_map.line_text(line)));
}

pub(crate) fn error(sink: &mut DiagnosticSink, source_map: &SourceMap, path: &str, span: Span, message: impl Into<String>) {
    emit(sink, source_map, path, span, Severity::Error, message);
}

pub(crate) fn warn(sink: &mut DiagnosticSink, source_map: &SourceMap, path: &str, span: Span, message: impl Into<String>) {
    emit(sink, source_map, path, span, Severity::Warning, message);
}
