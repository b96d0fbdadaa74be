use serde::Serialize;

/// Severity of a buffered diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    fn label(self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// One buffered diagnostic: a message anchored to a source position, plus
/// the raw text of the offending line (captured at emit time so rendering
/// never needs to re-open the originating file).
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub path: String,
    pub line: u32,
    pub col: u32,
    pub len: u32,
    pub line_text: String,
}

impl Diagnostic {
    pub fn new(
        severity: Severity,
        message: impl Into<String>,
        path: impl Into<String>,
        line: u32,
        col: u32,
        len: u32,
        line_text: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            message: message.into(),
            path: path.into(),
            line,
            col,
            len: len.max(1),
            line_text: line_text.into(),
        }
    }

    /// Render as `"<kind>: <path>:<line>:<col>: <message>"` followed by the
    /// source line (tabs collapsed to single spaces, column recomputed to
    /// match) and a caret line of `col - 1` spaces then `len` carets.
    pub fn render(&self) -> String {
        let mut rendered_line = String::with_capacity(self.line_text.len());
        let mut caret_col = self.col;
        for (i, ch) in self.line_text.chars().enumerate() {
            if ch == '\t' {
                if (i as u32) < self.col.saturating_sub(1) {
                    // a tab before our column collapses to one char, so the
                    // caret shifts left by (tab_width - 1).
                    caret_col = caret_col.saturating_sub(3);
                }
                rendered_line.push(' ');
            } else {
                rendered_line.push(ch);
            }
        }
        let caret_line = format!(
            "{}{}",
            " ".repeat(caret_col.saturating_sub(1) as usize),
            "^".repeat(self.len as usize)
        );
        format!(
            "{}: {}:{}:{}: {}\n{}\n{}",
            self.severity.label(),
            self.path,
            self.line,
            self.col,
            self.message,
            rendered_line,
            caret_line
        )
    }

    pub fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }
}

/// Buffers diagnostics until an explicit flush, with nestable mark/rollback
/// save points over both the committed and pending buffers. Used by the
/// tokenizer, parser, and analyzer alike; the parser's speculative
/// type-vs-expression disambiguation relies on `mark`/`rollback` here being
/// mirrored exactly by the token cursor's own mark/rollback.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    committed: Vec<Diagnostic>,
    pending: Vec<Diagnostic>,
    marks: Vec<(usize, usize)>,
    print_warnings: bool,
    werror: bool,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_print_warnings(&mut self, enabled: bool) {
        self.print_warnings = enabled;
    }

    pub fn set_werror(&mut self, enabled: bool) {
        self.werror = enabled;
    }

    /// Append a diagnostic to the pending buffer, promoting warnings to
    /// errors when `-warnings-as-errors` is active.
    pub fn emit(&mut self, mut diagnostic: Diagnostic) {
        if self.werror && matches!(diagnostic.severity, Severity::Warning) {
            diagnostic.severity = Severity::Error;
        }
        self.pending.push(diagnostic);
    }

    /// Push a save point over both buffers.
    pub fn mark(&mut self) {
        self.marks.push((self.committed.len(), self.pending.len()));
    }

    /// Discard every diagnostic emitted since the matching `mark()`.
    pub fn rollback(&mut self) {
        if let Some((committed_len, pending_len)) = self.marks.pop() {
            self.committed.truncate(committed_len);
            self.pending.truncate(pending_len);
        }
    }

    /// Drop the most recent save point without discarding anything,
    /// committing a successful speculative attempt.
    pub fn pop_mark(&mut self) {
        self.marks.pop();
    }

    /// Move every pending diagnostic of the given severity into the
    /// committed list. Warnings are dropped here (not committed) unless
    /// `set_print_warnings(true)` was called.
    pub fn flush(&mut self, severity: Severity) {
        let (moved, kept): (Vec<_>, Vec<_>) = self
            .pending
            .drain(..)
            .partition(|d| d.severity == severity);
        self.pending = kept;
        if matches!(severity, Severity::Warning) && !self.print_warnings {
            return;
        }
        self.committed.extend(moved);
    }

    /// Flush both severities.
    pub fn flush_all(&mut self) {
        self.flush(Severity::Error);
        self.flush(Severity::Warning);
    }

    pub fn has_error(&self) -> bool {
        self.committed.iter().any(Diagnostic::is_error)
            || self.pending.iter().any(Diagnostic::is_error)
    }

    pub fn committed(&self) -> &[Diagnostic] {
        &self.committed
    }

    /// Render every committed diagnostic, in order, then clear the sink.
    /// Returns whether the process should exit non-zero (an error was
    /// committed) -- the sink never calls `process::exit` itself; that
    /// decision belongs to the driver.
    pub fn print_exit_clear(&mut self) -> (Vec<String>, bool) {
        self.flush_all();
        let should_exit_error = self.has_error();
        let rendered = self.committed.iter().map(Diagnostic::render).collect();
        self.committed.clear();
        self.pending.clear();
        self.marks.clear();
        (rendered, should_exit_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warn(msg: &str) -> Diagnostic {
        Diagnostic::new(Severity::Warning, msg, "f.sh", 1, 1, 1, "x")
    }

    fn err(msg: &str) -> Diagnostic {
        Diagnostic::new(Severity::Error, msg, "f.sh", 1, 1, 1, "x")
    }

    #[test]
    fn mark_rollback_restores_state() {
        let mut sink = DiagnosticSink::new();
        sink.emit(err("before"));
        sink.flush_all();
        let before_committed = sink.committed().len();
        sink.mark();
        sink.emit(err("speculative"));
        sink.flush_all();
        sink.rollback();
        assert_eq!(sink.committed().len(), before_committed);
    }

    #[test]
    fn pop_mark_keeps_diagnostics() {
        let mut sink = DiagnosticSink::new();
        sink.mark();
        sink.emit(err("kept"));
        sink.pop_mark();
        sink.flush_all();
        assert_eq!(sink.committed().len(), 1);
    }

    #[test]
    fn warnings_suppressed_unless_enabled() {
        let mut sink = DiagnosticSink::new();
        sink.emit(warn("w"));
        sink.flush_all();
        assert_eq!(sink.committed().len(), 0);

        let mut sink = DiagnosticSink::new();
        sink.set_print_warnings(true);
        sink.emit(warn("w"));
        sink.flush_all();
        assert_eq!(sink.committed().len(), 1);
    }

    #[test]
    fn werror_promotes_warnings() {
        let mut sink = DiagnosticSink::new();
        sink.set_werror(true);
        sink.emit(warn("w"));
        sink.flush_all();
        assert_eq!(sink.committed().len(), 1);
        assert!(sink.committed()[0].is_error());
    }

    #[test]
    fn caret_line_matches_column_and_length() {
        let diag = Diagnostic::new(Severity::Error, "bad", "f.sh", 3, 5, 3, "xxxxabc");
        let rendered = diag.render();
        let caret_line = rendered.lines().last().unwrap();
        assert_eq!(caret_line, "    ^^^");
    }

    #[test]
    fn nested_marks_roll_back_independently() {
        let mut sink = DiagnosticSink::new();
        sink.emit(err("outer"));
        sink.flush_all();
        sink.mark();
        sink.emit(err("inner-1"));
        sink.flush_all();
        sink.mark();
        sink.emit(err("inner-2"));
        sink.flush_all();
        sink.rollback();
        assert_eq!(sink.committed().len(), 2);
        sink.rollback();
        assert_eq!(sink.committed().len(), 1);
    }

    #[test]
    fn print_exit_clear_reports_error_presence() {
        let mut sink = DiagnosticSink::new();
        sink.emit(err("boom"));
        let (rendered, should_exit) = sink.print_exit_clear();
        assert!(should_exit);
        assert_eq!(rendered.len(), 1);
        assert_eq!(sink.committed().len(), 0);

        let mut sink = DiagnosticSink::new();
        let (rendered, should_exit) = sink.print_exit_clear();
        assert!(!should_exit);
        assert!(rendered.is_empty());
    }
}
