//! Shared text-formatting helpers used across multiple modules.

use std::fmt::{self, Write as _};

/// Wrap text at the given column, preserving existing line breaks.
///
/// Words longer than the width are kept intact on their own line.
#[must_use]
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();

    for raw_line in text.split('\n') {
        let mut current = String::new();
        for word in raw_line.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
            } else if current.len() + 1 + word.len() <= width {
                current.push(' ');
                current.push_str(word);
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
            }
        }
        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Prefix every line of `text` with `prefix`.
#[must_use]
pub fn indent(text: &str, prefix: &str) -> String {
    let mut out = String::new();
    for (index, line) in text.lines().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        out.push_str(prefix);
        out.push_str(line);
    }
    out
}

/// Column width at which field values are wrapped for display.
const VALUE_WRAP_WIDTH: usize = 70;

/// Field-aligned key/value renderer for entity display.
///
/// Absent optional fields are omitted entirely rather than shown empty.
#[derive(Debug, Default)]
pub struct FieldTable {
    rows: Vec<(&'static str, String)>,
}

impl FieldTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field that is always shown.
    pub fn field(&mut self, name: &'static str, value: impl fmt::Display) {
        self.rows.push((name, value.to_string()));
    }

    /// Add a field only when the value is present.
    pub fn opt_field<T: fmt::Display>(&mut self, name: &'static str, value: Option<&T>) {
        if let Some(value) = value {
            self.field(name, value);
        }
    }

    /// Render all fields with labels padded to a common width, values
    /// wrapped and continuation lines aligned under the value column.
    #[must_use]
    pub fn render(&self) -> String {
        let width = self.rows.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
        let mut out = String::new();

        for (name, value) in &self.rows {
            for (index, line) in wrap_text(value, VALUE_WRAP_WIDTH).iter().enumerate() {
                if index == 0 {
                    let _ = writeln!(out, "{name}:{:pad$} {line}", "", pad = width - name.len());
                } else {
                    let _ = writeln!(out, "{:pad$} {line}", "", pad = width + 1);
                }
            }
        }

        out.trim_end().to_string()
    }
}
