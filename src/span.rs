use std::cmp::{max, min};

/// Byte range into the source text a node was parsed from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }
}

/// Source text of one file plus its line index, used to turn spans into
/// `file:line:col` diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceMap {
    name: String,
    src: String,
    line_starts: Vec<usize>,
}

impl SourceMap {
    pub fn new(name: impl Into<String>, src: impl Into<String>) -> Self {
        let src = src.into();
        let mut line_starts = vec![0];
        for (i, c) in src.char_indices() {
            if c == '\n' {
                line_starts.push(i + 1);
            }
        }
        SourceMap {
            name: name.into(),
            src,
            line_starts,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    /// 1-based line and column (in characters) of a byte offset.
    pub fn line_col(&self, pos: usize) -> (usize, usize) {
        let pos = min(pos, self.src.len());
        let line_idx = self
            .line_starts
            .binary_search(&pos)
            .unwrap_or_else(|x| x - 1);
        let line_start = self.line_starts[line_idx];
        let col = self
            .src
            .get(line_start..pos)
            .map_or(0, |s| s.chars().count())
            + 1;
        (line_idx + 1, col)
    }

    pub fn line_snippet(&self, line: usize) -> &str {
        if line < 1 || line > self.line_starts.len() {
            return "";
        }
        let start = self.line_starts[line - 1];
        let end = if line == self.line_starts.len() {
            self.src.len()
        } else {
            self.line_starts[line] - 1
        };
        self.src.get(start..end).unwrap_or("")
    }

    pub fn format_diagnostic(&self, msg: &str, span: Span) -> String {
        let (start_line, start_col) = self.line_col(span.start);
        let (end_line, _) = self.line_col(span.end);
        let snippet = self.line_snippet(start_line);

        let mut arrow = " ".repeat(start_col - 1);
        arrow.push('^');
        if start_line == end_line {
            let len = self
                .src
                .get(span.start..min(span.end, self.src.len()))
                .map_or(0, |s| s.chars().count());
            for _ in 1..max(1, len) {
                arrow.push('~');
            }
        }

        format!(
            "{}:{}:{}: {}\n{}\n{}",
            self.name, start_line, start_col, msg, snippet, arrow
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_col_counts_from_one() {
        let sm = SourceMap::new("a.js", "let a = 1\nfoo(a)\n");
        assert_eq!(sm.line_col(0), (1, 1));
        assert_eq!(sm.line_col(4), (1, 5));
        assert_eq!(sm.line_col(10), (2, 1));
        assert_eq!(sm.line_col(13), (2, 4));
    }

    #[test]
    fn diagnostic_underlines_span() {
        let sm = SourceMap::new("main.js", "const x = `hi`\n");
        let out = sm.format_diagnostic("unsupported construct `TemplateLiteral`", Span::new(10, 14));
        assert_eq!(
            out,
            "main.js:1:11: unsupported construct `TemplateLiteral`\nconst x = `hi`\n          ^~~~"
        );
    }

    #[test]
    fn multi_line_span_points_at_start() {
        let sm = SourceMap::new("m.js", "if (a) {\n  b()\n}\n");
        let out = sm.format_diagnostic("boom", Span::new(0, 16));
        assert!(out.ends_with("if (a) {\n^"));
    }
}
