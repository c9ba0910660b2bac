//! Human-readable output formatting.
//!
//! Every renderer consumes canonical shapes only and returns a `String`;
//! commands decide whether it goes to stdout or into a JSON envelope.

pub mod aggregates;
pub mod csv;
pub mod health;
pub mod history;
pub mod stats;

use std::fmt::Write as _;

use colored::Colorize;

use crate::core::models::Project;

/// Plain text table: padded columns joined with ` | `, dashed separator.
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    #[must_use]
    pub fn new<S: Into<String>>(columns: Vec<S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn row<S: Into<String>>(&mut self, cells: Vec<S>) {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    /// Render the table, or a placeholder when it has no rows.
    #[must_use]
    pub fn render(&self) -> String {
        if self.rows.is_empty() {
            return "No data to display\n".to_string();
        }

        let mut widths: Vec<usize> = self.columns.iter().map(String::len).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(visible_len(cell));
                }
            }
        }
        // Padding matches the original table style.
        for width in &mut widths {
            *width += 2;
        }

        let mut out = String::new();
        let header: Vec<String> = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(col, w)| format!("{col:<w$}"))
            .collect();
        let _ = writeln!(out, "\n{}", header.join(" | "));
        let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        let _ = writeln!(out, "{}", separator.join("-+-"));

        for row in &self.rows {
            let cells: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(cell, w)| pad_visible(cell, *w))
                .collect();
            let _ = writeln!(out, "{}", cells.join(" | "));
        }
        out.push('\n');
        out
    }
}

/// Length of a cell ignoring ANSI escape sequences.
fn visible_len(cell: &str) -> usize {
    let mut len = 0usize;
    let mut in_escape = false;
    for c in cell.chars() {
        if in_escape {
            if c == 'm' {
                in_escape = false;
            }
        } else if c == '\u{1b}' {
            in_escape = true;
        } else {
            len += 1;
        }
    }
    len
}

fn pad_visible(cell: &str, width: usize) -> String {
    let pad = width.saturating_sub(visible_len(cell));
    format!("{cell}{}", " ".repeat(pad))
}

/// Color a status cell: active green, failed/error red, anything else
/// yellow. `no_color` leaves the text untouched.
#[must_use]
pub fn status_cell(status: &str, no_color: bool) -> String {
    if no_color {
        return status.to_string();
    }
    match status.to_lowercase().as_str() {
        "active" | "done" => status.green().to_string(),
        "failed" | "error" => status.red().to_string(),
        _ => status.yellow().to_string(),
    }
}

/// Render the published project/cube listing.
#[must_use]
pub fn render_projects(projects: &[Project]) -> String {
    let mut out = String::new();

    if projects.is_empty() {
        out.push_str("No published projects found.\n");
        return out;
    }

    let _ = writeln!(out, "Found {} project(s):", projects.len());
    let _ = writeln!(out, "{}", "=".repeat(80));

    for (i, project) in projects.iter().enumerate() {
        let _ = writeln!(out, "\n{}. {}", i + 1, project.name);
        let _ = writeln!(out, "   ID: {}", project.id);
        let _ = writeln!(out, "   Cubes/Models: {}", project.cubes.len());
        for (j, cube) in project.cubes.iter().enumerate() {
            let _ = writeln!(out, "   {}. {} (ID: {})", j + 1, cube.name, cube.id);
        }
    }

    let _ = writeln!(out, "\n{}", "=".repeat(80));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::Cube;

    #[test]
    fn table_pads_and_separates() {
        let mut table = Table::new(vec!["Name", "Rows"]);
        table.row(vec!["orders", "48213"]);
        table.row(vec!["r", "1"]);
        let rendered = table.render();

        assert!(rendered.contains("Name"));
        assert!(rendered.contains("-+-"));
        assert!(rendered.contains("orders"));
    }

    #[test]
    fn empty_table_renders_placeholder() {
        let table = Table::new(vec!["Name"]);
        assert_eq!(table.render(), "No data to display\n");
    }

    #[test]
    fn status_cell_respects_no_color() {
        assert_eq!(status_cell("active", true), "active");
        // Colored output still contains the status text.
        assert!(status_cell("failed", false).contains("failed"));
    }

    #[test]
    fn projects_listing_names_cubes() {
        let projects = vec![Project {
            id: "p1".to_string(),
            name: "Sales".to_string(),
            cubes: vec![Cube {
                id: "c1".to_string(),
                name: "Orders".to_string(),
                caption: String::new(),
            }],
        }];
        let out = render_projects(&projects);
        assert!(out.contains("Sales"));
        assert!(out.contains("Orders (ID: c1)"));
    }
}
