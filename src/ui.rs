//! Terminal UI utilities.
//!
//! A two-column box table used by `--print-config`. Values wider than the
//! terminal are truncated with an ellipsis.

use colored::*;

pub struct Table {
    headers: [String; 2],
    rows: Vec<[String; 2]>,
}

impl Table {
    pub fn new(key_header: &str, value_header: &str) -> Self {
        Self {
            headers: [key_header.to_string(), value_header.to_string()],
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, key: &str, value: &str) {
        self.rows.push([key.to_string(), value.to_string()]);
    }

    /// Renders the table for a terminal `max_width` columns wide.
    pub fn render(&self, max_width: usize) -> Vec<String> {
        let key_width = self
            .rows
            .iter()
            .map(|r| r[0].chars().count())
            .chain(std::iter::once(self.headers[0].chars().count()))
            .max()
            .unwrap_or(0);
        let value_width = self
            .rows
            .iter()
            .map(|r| r[1].chars().count())
            .chain(std::iter::once(self.headers[1].chars().count()))
            .max()
            .unwrap_or(0);

        // "  │ " + key + " │ " + value + " │"
        let overhead = 2 + 4 + 3 + 2;
        let available = max_width.saturating_sub(overhead + key_width).max(8);
        let value_width = value_width.min(available);

        let sep = |left: &str, mid: &str, right: &str| {
            format!(
                "  {}{}{}{}{}",
                left,
                "─".repeat(key_width + 2),
                mid,
                "─".repeat(value_width + 2),
                right
            )
        };
        let row = |k: &str, v: &str| {
            format!(
                "  │ {:<kw$} │ {:<vw$} │",
                k,
                truncate(v, value_width),
                kw = key_width,
                vw = value_width
            )
        };

        let mut lines = vec![sep("┌", "┬", "┐")];
        lines.push(row(&self.headers[0], &self.headers[1]));
        lines.push(sep("├", "┼", "┤"));
        for r in &self.rows {
            lines.push(row(&r[0], &r[1]));
        }
        lines.push(sep("└", "┴", "┘"));
        lines
    }

    pub fn print(&self) {
        let (_rows, cols) = console::Term::stdout().size();
        for (i, line) in self.render(cols as usize).into_iter().enumerate() {
            if i == 1 {
                println!("{}", line.bold());
            } else {
                println!("{}", line);
            }
        }
    }
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}
