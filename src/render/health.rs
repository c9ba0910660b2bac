//! Health report rendering.

use std::fmt::Write as _;

use crate::report::HealthReport;

/// Issues/warnings shown before the listing is capped.
const LISTING_CAP: usize = 10;

/// Render the health check report.
#[must_use]
pub fn render_health(report: &HealthReport, cube_label: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "=".repeat(60));
    let _ = writeln!(out, "AGGREGATE HEALTH CHECK - {cube_label}");
    let _ = writeln!(out, "{}", "=".repeat(60));

    let _ = writeln!(out, "\nIssues Found ({}):", report.issues.len());
    render_capped(&mut out, &report.issues, "issues", "No critical issues found");

    let _ = writeln!(out, "\nWarnings ({}):", report.warnings.len());
    render_capped(&mut out, &report.warnings, "warnings", "No warnings");

    let _ = writeln!(out, "\nSummary:");
    let _ = writeln!(out, "  Total Aggregates: {}", report.total);
    let _ = writeln!(out, "  Issues:           {}", report.issues.len());
    let _ = writeln!(out, "  Warnings:         {}", report.warnings.len());
    let _ = writeln!(out, "  Health Score:     {:.1}/100", report.score);
    out
}

fn render_capped(out: &mut String, entries: &[String], noun: &str, empty_label: &str) {
    if entries.is_empty() {
        let _ = writeln!(out, "  {empty_label}");
        return;
    }
    for entry in entries.iter().take(LISTING_CAP) {
        let _ = writeln!(out, "  {entry}");
    }
    if entries.len() > LISTING_CAP {
        let _ = writeln!(out, "  ... and {} more {noun}", entries.len() - LISTING_CAP);
    }
}
