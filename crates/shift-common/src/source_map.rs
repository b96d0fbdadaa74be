use crate::span::Span;

/// Holds the raw bytes of one source file plus a vector of line slices,
/// indexed by (1-based) line number. Used only to render diagnostics; the
/// tokenizer does not consult it while lexing.
#[derive(Debug)]
pub struct SourceMap {
    source: String,
    /// Byte span of each line's content, excluding its trailing `\n`.
    /// `lines[0]` is line 1.
    lines: Vec<Span>,
}

impl SourceMap {
    /// Scan `source` once for `\n` bytes and record the byte span of every
    /// line. An empty source still produces one (empty) line slice; a
    /// source with no trailing newline still gets a final line slice.
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let mut lines = Vec::new();
        let mut line_start = 0u32;
        for (i, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                lines.push(Span::new(line_start, i as u32));
                line_start = (i + 1) as u32;
            }
        }
        lines.push(Span::new(line_start, source.len() as u32));
        Self { source, lines }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// The text of 1-based line `line`, or `""` if out of range.
    pub fn line_text(&self, line: u32) -> &str {
        match self.lines.get(line.wrapping_sub(1) as usize) {
            Some(span) => &self.source[span.start as usize..span.end as usize],
            None => "",
        }
    }

    /// Convert a byte offset to a 1-based (line, column) pair, for stages
    /// that only carry byte spans (the analyzer's AST nodes) rather than a
    /// token's already-computed line/col.
    pub fn line_col(&self, offset: u32) -> (u32, u32) {
        let line_idx = self.lines.partition_point(|span| span.start <= offset);
        let line_idx = line_idx.saturating_sub(1);
        let line = line_idx as u32 + 1;
        let col = offset - self.lines[line_idx].start + 1;
        (line, col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_source_has_one_empty_line() {
        let map = SourceMap::new("");
        assert_eq!(map.line_count(), 1);
        assert_eq!(map.line_text(1), "");
    }

    #[test]
    fn source_without_trailing_newline_gets_final_line() {
        let map = SourceMap::new("a\nb");
        assert_eq!(map.line_count(), 2);
        assert_eq!(map.line_text(1), "a");
        assert_eq!(map.line_text(2), "b");
    }

    #[test]
    fn multiple_lines() {
        let map = SourceMap::new("one\ntwo\nthree\n");
        assert_eq!(map.line_count(), 4);
        assert_eq!(map.line_text(1), "one");
        assert_eq!(map.line_text(2), "two");
        assert_eq!(map.line_text(3), "three");
        assert_eq!(map.line_text(4), "");
    }

    #[test]
    fn out_of_range_line_is_empty() {
        let map = SourceMap::new("a");
        assert_eq!(map.line_text(0), "");
        assert_eq!(map.line_text(99), "");
    }

    #[test]
    fn line_col_first_line() {
        let map = SourceMap::new("abcde");
        assert_eq!(map.line_col(0), (1, 1));
        assert_eq!(map.line_col(4), (1, 5));
    }

    #[test]
    fn line_col_across_lines() {
        let map = SourceMap::new("one\ntwo\nthree");
        assert_eq!(map.line_col(0), (1, 1));
        assert_eq!(map.line_col(4), (2, 1));
        assert_eq!(map.line_col(8), (3, 1));
    }
}
