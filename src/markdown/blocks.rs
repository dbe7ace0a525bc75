//! Line-oriented block passes: pipe tables and blockquotes.

use once_cell::sync::Lazy;
use regex::Regex;

/// A table alignment row such as `|---|:-:|`.
static SEPARATOR_ROW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\|\s*:?-+:?\s*(\|\s*:?-+:?\s*)*\|$").expect("valid separator regex")
});

/// Rewrites tables and blockquotes; other lines pass through unchanged.
pub(super) fn render_blocks(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut i = 0;

    while i < lines.len() {
        let trimmed = lines[i].trim();

        if is_table_row(trimmed) {
            let mut rows = Vec::new();
            while i < lines.len() && is_table_row(lines[i].trim()) {
                let row = lines[i].trim();
                if !SEPARATOR_ROW.is_match(row) {
                    rows.push(table_cells(row));
                }
                i += 1;
            }
            push_table(&mut out, &rows);
        } else if trimmed.starts_with('>') {
            let mut quoted = Vec::new();
            while i < lines.len() && lines[i].trim().starts_with('>') {
                quoted.push(strip_quote_marker(lines[i].trim()));
                i += 1;
            }
            out.push(format!("<blockquote>{}</blockquote>", quoted.join("\n")));
        } else {
            out.push(lines[i].to_string());
            i += 1;
        }
    }

    out.join("\n")
}

fn is_table_row(trimmed: &str) -> bool {
    trimmed.len() >= 2 && trimmed.starts_with('|') && trimmed.ends_with('|')
}

/// Splits a row on `|`, dropping empty cells.
fn table_cells(row: &str) -> Vec<&str> {
    row.split('|')
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .collect()
}

fn push_table(out: &mut Vec<String>, rows: &[Vec<&str>]) {
    if rows.is_empty() {
        return;
    }

    out.push("<table>".to_string());
    for (row_idx, cells) in rows.iter().enumerate() {
        let tag = if row_idx == 0 { "th" } else { "td" };
        let row: String = cells
            .iter()
            .map(|cell| format!("<{tag}>{cell}</{tag}>"))
            .collect();
        out.push(format!("<tr>{row}</tr>"));
    }
    out.push("</table>".to_string());
}

/// Removes the leading `>` and at most one following space.
fn strip_quote_marker(line: &str) -> &str {
    let rest = line.strip_prefix('>').unwrap_or(line);
    rest.strip_prefix(' ').unwrap_or(rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_with_separator() {
        let out = render_blocks("| A | B |\n|:--|--:|\n| 1 | 2 |");
        assert_eq!(
            out,
            "<table>\n<tr><th>A</th><th>B</th></tr>\n<tr><td>1</td><td>2</td></tr>\n</table>"
        );
        assert!(!out.contains("--"));
    }

    #[test]
    fn table_stops_at_non_row() {
        let out = render_blocks("| A |\ntext\n| B |");
        assert_eq!(
            out,
            "<table>\n<tr><th>A</th></tr>\n</table>\ntext\n<table>\n<tr><th>B</th></tr>\n</table>"
        );
    }

    #[test]
    fn separator_only_table_vanishes() {
        assert_eq!(render_blocks("before\n|---|---|\nafter"), "before\nafter");
    }

    #[test]
    fn indented_rows_are_rows() {
        let out = render_blocks("  | x | y |  ");
        assert_eq!(out, "<table>\n<tr><th>x</th><th>y</th></tr>\n</table>");
    }

    #[test]
    fn single_pipe_is_not_a_row() {
        assert_eq!(render_blocks("|"), "|");
    }

    #[test]
    fn blockquote_joins_lines() {
        let out = render_blocks("> first\n>second\n>  third\nafter");
        assert_eq!(
            out,
            "<blockquote>first\nsecond\n third</blockquote>\nafter"
        );
    }

    #[test]
    fn other_lines_untouched() {
        assert_eq!(render_blocks("  keep  \n\nme"), "  keep  \n\nme");
    }
}
