//! Diagnostic table formatter.
//!
//! Renders issues as an aligned table under the module path, followed by a
//! one-line summary:
//!
//! ```text
//!
//! src/app.coffee
//!   3  error    Line contains tab indentation  no_tabs
//!   7  warning  Length is 92, max is 80        max_line_length
//!
//! ✖ 2 problems (1 error, 1 warning)
//! ```

use std::borrow::Cow;

use cslint_engine::Issue;
use owo_colors::{OwoColorize, Style};

/// Column separator.
const SEPARATOR: &str = "  ";

/// Singular `word` for a count of one, plural otherwise.
pub fn pluralize(word: &str, count: usize) -> Cow<'_, str> {
    if count == 1 {
        Cow::Borrowed(word)
    } else {
        Cow::Owned(format!("{}s", word))
    }
}

/// A rendered report and the issue counts it shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub text: String,
    pub error_count: usize,
    pub warning_count: usize,
    /// Warnings left out by `quiet`.
    pub hidden_count: usize,
}

impl Report {
    /// Number of issues in the report.
    pub fn total(&self) -> usize {
        self.error_count + self.warning_count
    }

    /// Returns true if the linter found nothing at all, shown or hidden.
    pub fn is_empty(&self) -> bool {
        self.total() == 0 && self.hidden_count == 0
    }

    /// Returns true if any error was reported.
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }
}

#[derive(Clone, Copy)]
enum Align {
    Left,
    Right,
}

struct Cell {
    text: String,
    style: Style,
}

impl Cell {
    fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    fn width(&self) -> usize {
        self.text.chars().count()
    }
}

const ALIGNMENT: [Align; 5] = [
    Align::Left,
    Align::Right,
    Align::Left,
    Align::Left,
    Align::Left,
];

/// Formats issue lists for the host.
#[derive(Debug, Clone, Copy)]
pub struct Formatter {
    color: bool,
}

impl Formatter {
    /// Creates a formatter that colors output unless `NO_COLOR` is set.
    pub fn new() -> Self {
        Self {
            color: std::env::var_os("NO_COLOR").is_none(),
        }
    }

    /// Creates a formatter that never emits ANSI escapes.
    pub fn plain() -> Self {
        Self { color: false }
    }

    /// Creates a formatter that always emits ANSI escapes.
    pub fn colored() -> Self {
        Self { color: true }
    }

    /// Renders `issues` for the module at `resource_path`.
    ///
    /// With `quiet`, warnings are left out of both the table and the counts;
    /// a module whose issues are all hidden still gets an empty report.
    /// Returns `None` only when there are no issues.
    pub fn format(&self, issues: &[Issue], quiet: bool, resource_path: &str) -> Option<Report> {
        if issues.is_empty() {
            return None;
        }

        let mut error_count = 0;
        let mut warning_count = 0;
        let mut hidden_count = 0;
        let mut rows = Vec::new();

        for issue in issues {
            let error = issue.is_error();
            if quiet && !error {
                hidden_count += 1;
                continue;
            }
            if error {
                error_count += 1;
            } else {
                warning_count += 1;
            }

            let level_style = if error {
                Style::new().red()
            } else {
                Style::new().yellow()
            };
            rows.push([
                Cell::new("", Style::new()),
                Cell::new(issue.line_range(), Style::new().bright_black()),
                Cell::new(issue.level.as_str(), level_style),
                Cell::new(issue.display_text(), Style::new().white().bold()),
                Cell::new(issue.rule.as_str(), Style::new().bright_black()),
            ]);
        }

        let color = if error_count > 0 {
            Style::new().red()
        } else {
            Style::new().yellow()
        };

        let total = error_count + warning_count;
        let summary = format!(
            "\u{2716} {} {} ({} {}, {} {})",
            total,
            pluralize("problem", total),
            error_count,
            pluralize("error", error_count),
            warning_count,
            pluralize("warning", warning_count)
        );

        let text = format!(
            "\n{}\n{}\n\n{}",
            self.paint(resource_path, color.underline()),
            self.table(&rows),
            self.paint(&summary, color.bold())
        );

        Some(Report {
            text,
            error_count,
            warning_count,
            hidden_count,
        })
    }

    fn table(&self, rows: &[[Cell; 5]]) -> String {
        let mut widths = [0usize; 5];
        for row in rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.width());
            }
        }

        rows.iter()
            .map(|row| {
                let line = row
                    .iter()
                    .zip(widths)
                    .zip(ALIGNMENT)
                    .map(|((cell, width), align)| {
                        let padding = " ".repeat(width - cell.width());
                        let text = self.paint(&cell.text, cell.style);
                        match align {
                            Align::Left => text + &padding,
                            Align::Right => padding + &text,
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(SEPARATOR);
                line.trim_end().to_string()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn paint(&self, text: &str, style: Style) -> String {
        if self.color && !text.is_empty() {
            text.style(style).to_string()
        } else {
            text.to_string()
        }
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new()
    }
}
