//! Column-aligned text tables.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Widest a single column may grow before cells are truncated.
const MAX_COLUMN_WIDTH: usize = 32;

pub fn display_width(s: &str) -> usize {
    s.width()
}

/// Truncate `s` to `width` display cells, ending in `…` when cut.
pub fn fit(s: &str, width: usize) -> String {
    if s.width() <= width {
        return s.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

/// A table rendered with space-padded columns and a rule under the header.
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Add a row. Missing cells render empty; extra cells are dropped.
    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row: Vec<String> = cells.into_iter().map(Into::into).collect();
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn column_widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                self.rows
                    .iter()
                    .map(|row| row[i].width())
                    .chain(std::iter::once(header.width()))
                    .max()
                    .unwrap_or(0)
                    .min(MAX_COLUMN_WIDTH)
            })
            .collect()
    }

    pub fn render(&self) -> String {
        let widths = self.column_widths();
        let line = |cells: &[String]| {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, &w)| {
                    let text = fit(cell, w);
                    let pad = w - text.width();
                    format!("{}{}", text, " ".repeat(pad))
                })
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let rule_width = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
        let mut out = vec![line(&self.headers), "─".repeat(rule_width)];
        out.extend(self.rows.iter().map(|row| line(row)));
        out.join("\n")
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit() {
        assert_eq!(fit("Bossy", 10), "Bossy");
        assert_eq!(fit("Foot and Mouth", 6), "Foot …");
        assert_eq!(fit("abc", 0), "");
    }

    #[test]
    fn test_render_aligns_columns() {
        let mut table = Table::new(["ID", "Cattle"]);
        table.push_row(["1", "Bossy"]);
        table.push_row(["100", "Daisy"]);

        let out = table.render();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "ID   Cattle");
        assert_eq!(lines[2], "1    Bossy");
        assert_eq!(lines[3], "100  Daisy");
    }

    #[test]
    fn test_short_rows_are_padded() {
        let mut table = Table::new(["A", "B", "C"]);
        table.push_row(["x"]);
        assert_eq!(table.len(), 1);
        assert!(table.render().lines().nth(2).unwrap().starts_with('x'));
    }

    #[test]
    fn test_wide_characters() {
        let mut table = Table::new(["Name"]);
        table.push_row(["牛牛"]);
        assert_eq!(display_width("牛牛"), 4);
        assert!(table.render().contains("牛牛"));
    }
}
