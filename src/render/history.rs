//! Build-history table, summary, and detailed batch view.

use std::fmt::Write as _;

use chrono::Utc;

use crate::core::models::{BuildBatch, HistoryEnvelope};
use crate::report::HistorySummary;
use crate::util::{
    duration_between_ms, format_iso_duration, format_millis, format_timestamp_short,
    parse_timestamp, short_id,
};

use super::{status_cell, Table};

fn duration_cell(batch: &BuildBatch) -> String {
    duration_between_ms(&batch.start_time, &batch.end_time)
        .map_or_else(|| "N/A".to_string(), format_millis)
}

fn estimate_cell(estimate_ms: u64) -> String {
    if estimate_ms > 1000 {
        format!("{:.1}s", estimate_ms as f64 / 1000.0)
    } else {
        format!("{estimate_ms}ms")
    }
}

/// Render the history table plus the summary block.
#[must_use]
pub fn render_history(envelope: &HistoryEnvelope, cube_label: &str, no_color: bool) -> String {
    if envelope.data.is_empty() {
        return format!("No build history found for {cube_label}.\n");
    }

    let mut out = String::new();
    let _ = writeln!(out, "{}", "=".repeat(70));
    let _ = writeln!(out, "AGGREGATE BUILD HISTORY - {cube_label}");
    let _ = writeln!(out, "{}", "=".repeat(70));

    let mut table = Table::new(vec![
        "Batch ID",
        "Start Time",
        "End Time",
        "Duration",
        "Status",
        "Type",
        "Estimate",
        "Total Build",
    ]);

    for batch in &envelope.data {
        table.row(vec![
            short_id(&batch.id, 12),
            format_timestamp_short(&batch.start_time),
            format_timestamp_short(&batch.end_time),
            duration_cell(batch),
            status_cell(&batch.status, no_color),
            if batch.is_full_build { "Full" } else { "Incremental" }.to_string(),
            estimate_cell(batch.estimate_time),
            format_iso_duration(&batch.sum_of_instance_build_times),
        ]);
    }
    out.push_str(&table.render());
    out.push_str(&render_summary(&HistorySummary::compute(&envelope.data)));
    out
}

fn render_summary(summary: &HistorySummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "=".repeat(50));
    let _ = writeln!(out, "BUILD HISTORY SUMMARY");
    let _ = writeln!(out, "{}", "=".repeat(50));

    let total = summary.total_batches;
    #[allow(clippy::cast_precision_loss)]
    let rate = |count: usize| {
        if total == 0 {
            0.0
        } else {
            count as f64 / total as f64 * 100.0
        }
    };

    let _ = writeln!(out, "\nBatch Statistics:");
    let _ = writeln!(out, "  Total Batches:      {total}");
    let _ = writeln!(
        out,
        "  Successful:         {} ({:.1}%)",
        summary.successful,
        rate(summary.successful)
    );
    let _ = writeln!(
        out,
        "  Failed:             {} ({:.1}%)",
        summary.failed,
        rate(summary.failed)
    );
    let _ = writeln!(
        out,
        "  Running:            {} ({:.1}%)",
        summary.running,
        rate(summary.running)
    );
    let _ = writeln!(
        out,
        "  Full Builds:        {} ({:.1}%)",
        summary.full_builds,
        rate(summary.full_builds)
    );

    if let Some(avg) = summary.average_duration_ms {
        let _ = writeln!(out, "\nDuration Statistics:");
        let _ = writeln!(out, "  Average Duration:   {}", format_millis(avg));
        if let (Some(min), Some(max)) = (summary.min_duration_ms, summary.max_duration_ms) {
            let _ = writeln!(out, "  Minimum Duration:   {}", format_millis(min));
            let _ = writeln!(out, "  Maximum Duration:   {}", format_millis(max));
        }
    }

    let _ = writeln!(out, "\nRecent Build Timeline:");
    for (i, entry) in summary.timeline.iter().enumerate() {
        let duration = entry
            .duration_ms
            .map_or_else(|| "N/A".to_string(), format_millis);
        let _ = writeln!(
            out,
            "  {}. {} - {} ({}) - {}",
            i + 1,
            short_id(&entry.batch_id, 8),
            entry.status.to_uppercase(),
            if entry.full_build { "Full" } else { "Incremental" },
            duration
        );
    }
    out
}

/// Render the per-batch detailed view.
#[must_use]
pub fn render_detailed(batches: &[BuildBatch]) -> String {
    let mut out = String::new();
    let now = Utc::now();

    for (i, batch) in batches.iter().enumerate() {
        let _ = writeln!(out, "\n{}", "-".repeat(60));
        let _ = writeln!(out, "BATCH {}: {}", i + 1, batch.id);
        let _ = writeln!(out, "{}", "-".repeat(60));

        let _ = writeln!(out, "Status:          {}", batch.status);
        let _ = writeln!(
            out,
            "Type:            {}",
            if batch.is_full_build {
                "Full Build"
            } else {
                "Incremental Build"
            }
        );
        if !batch.batch_type.is_empty() {
            let _ = writeln!(out, "Batch Type:      {}", batch.batch_type);
        }

        for (label, value) in [
            ("Created", &batch.create_date),
            ("Started", &batch.start_time),
            ("Ended", &batch.end_time),
        ] {
            if value.is_empty() {
                continue;
            }
            let display = parse_timestamp(value).map_or_else(
                || value.clone(),
                |dt| dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            );
            let _ = writeln!(out, "{label}:{}{display}", " ".repeat(17 - label.len() - 1));
        }

        if let Some(ms) = duration_between_ms(&batch.start_time, &batch.end_time) {
            let _ = writeln!(out, "Duration:        {}", format_millis(ms));
        }
        if batch.estimate_time > 0 {
            let _ = writeln!(out, "Estimate:        {}", estimate_cell(batch.estimate_time));
        }
        if !batch.sum_of_instance_build_times.is_empty() {
            let _ = writeln!(
                out,
                "Total Build:     {}",
                format_iso_duration(&batch.sum_of_instance_build_times)
            );
        }

        if let Some(started) = parse_timestamp(&batch.start_time) {
            let elapsed = now.signed_duration_since(started);
            if elapsed.num_seconds() < 86_400 {
                #[allow(clippy::cast_precision_loss)]
                let hours_ago = elapsed.num_seconds() as f64 / 3600.0;
                let _ = writeln!(out, "Recency:         {hours_ago:.1} hours ago");
            }
        }
    }
    out
}
