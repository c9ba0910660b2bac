//! Aggregate listing table and per-cube summary.

use std::fmt::Write as _;

use crate::core::models::{AggregateEnvelope, AggregateRecord};
use crate::util::{format_count, format_millis, format_timestamp_short, short_id};

use super::{status_cell, Table};

/// Render the aggregates table plus the cube summary block.
#[must_use]
pub fn render_aggregates(envelope: &AggregateEnvelope, cube_label: &str, no_color: bool) -> String {
    if envelope.data.is_empty() {
        return format!("No aggregates found for {cube_label}.\n");
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "Found {} aggregates (Total: {})",
        envelope.data.len(),
        envelope.total
    );

    let mut table = Table::new(vec![
        "ID (short)",
        "Name",
        "Type",
        "Status",
        "Rows",
        "Build Time",
        "Last Query",
    ]);

    for record in &envelope.data {
        let instance = &record.latest_instance;
        let name: String = record.name.chars().take(30).collect();
        let last_query = if record.stats.most_recent_query.is_empty() {
            "Never".to_string()
        } else {
            format_timestamp_short(&record.stats.most_recent_query)
        };

        table.row(vec![
            short_id(&record.id, 12),
            name,
            record.kind.clone(),
            status_cell(&instance.status, no_color),
            format_count(instance.stats.number_of_rows),
            format_millis(instance.stats.build_duration as f64),
            last_query,
        ]);
    }
    out.push_str(&table.render());
    out.push_str(&render_summary(&envelope.data, cube_label));
    out
}

fn render_summary(records: &[AggregateRecord], cube_label: &str) -> String {
    let total_rows: u64 = records
        .iter()
        .map(|r| r.latest_instance.stats.number_of_rows)
        .sum();
    let total_build_ms: u64 = records
        .iter()
        .map(|r| r.latest_instance.stats.build_duration)
        .sum();
    let active = records
        .iter()
        .filter(|r| r.latest_instance.status.eq_ignore_ascii_case("active"))
        .count();

    let mut out = String::new();
    let _ = writeln!(out, "Summary for {cube_label}:");
    let _ = writeln!(out, "  Total aggregates:    {}", records.len());
    let _ = writeln!(out, "  Active aggregates:   {active}");
    let _ = writeln!(out, "  Total rows:          {}", format_count(total_rows));
    let _ = writeln!(
        out,
        "  Total build time:    {}",
        format_millis(total_build_ms as f64)
    );
    if !records.is_empty() {
        #[allow(clippy::cast_precision_loss)]
        let n = records.len() as f64;
        #[allow(clippy::cast_precision_loss)]
        let avg_rows = total_rows as f64 / n;
        #[allow(clippy::cast_precision_loss)]
        let avg_build = total_build_ms as f64 / n;
        let _ = writeln!(out, "  Average rows:        {avg_rows:.0}");
        let _ = writeln!(out, "  Average build time:  {}", format_millis(avg_build));
    }
    out
}
