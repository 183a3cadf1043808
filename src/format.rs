//! Line-level text helpers shared by the translators.

use crate::context::Indent;

/// Indentation prefix for `depth` nesting levels.
pub fn indentation(unit: Indent, depth: usize) -> String {
    match unit {
        Indent::Spaces(n) => " ".repeat(usize::from(n) * depth),
        Indent::Tabs => "\t".repeat(depth),
    }
}

/// Shifts every non-blank line one level to the right. Blank lines stay
/// empty so the output carries no trailing whitespace.
pub fn indent_lines(lines: Vec<String>, unit: Indent) -> Vec<String> {
    let pad = indentation(unit, 1);
    lines
        .into_iter()
        .map(|line| {
            if line.is_empty() {
                line
            } else {
                format!("{pad}{line}")
            }
        })
        .collect()
}

/// Joins translated chunks with newlines, dropping chunks that translated to
/// nothing and collapsing runs of blank lines into one.
pub fn join_lines<S: AsRef<str>>(chunks: &[S]) -> String {
    let mut out: Vec<&str> = Vec::new();
    for chunk in chunks.iter().map(AsRef::as_ref).filter(|c| !c.is_empty()) {
        for line in chunk.split('\n') {
            if line.trim().is_empty() && out.last().is_none_or(|l| l.is_empty()) {
                continue;
            }
            out.push(if line.trim().is_empty() { "" } else { line });
        }
    }
    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indentation_units() {
        assert_eq!(indentation(Indent::Spaces(2), 0), "");
        assert_eq!(indentation(Indent::Spaces(2), 3), "      ");
        assert_eq!(indentation(Indent::Spaces(4), 1), "    ");
        assert_eq!(indentation(Indent::Tabs, 2), "\t\t");
    }

    #[test]
    fn indent_lines_skips_blank_lines() {
        let lines = vec!["echo a".to_string(), String::new(), "fi".to_string()];
        assert_eq!(
            indent_lines(lines, Indent::Spaces(2)),
            vec!["  echo a".to_string(), String::new(), "  fi".to_string()]
        );
    }

    #[test]
    fn join_drops_empty_chunks() {
        assert_eq!(join_lines(&["a=\"1\"", "", "echo \"$a\""]), "a=\"1\"\necho \"$a\"");
    }

    #[test]
    fn join_collapses_blank_runs() {
        let chunks = ["\nif x; then\n  y\nfi\n", "\nif z; then\n  w\nfi\n"];
        assert_eq!(
            join_lines(&chunks),
            "if x; then\n  y\nfi\n\nif z; then\n  w\nfi"
        );
    }
}
