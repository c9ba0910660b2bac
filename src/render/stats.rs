//! Statistics report rendering.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::report::CubeStatistics;
use crate::util::{format_count, format_millis, short_id};

/// Render the statistics report.
#[must_use]
pub fn render_stats(stats: &CubeStatistics, cube_label: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "=".repeat(60));
    let _ = writeln!(out, "AGGREGATE STATISTICS - {cube_label}");
    let _ = writeln!(out, "{}", "=".repeat(60));
    let _ = writeln!(out, "Total Aggregates: {}", stats.total);
    let _ = writeln!(out, "Fetched in this batch: {}", stats.fetched);

    let _ = writeln!(out, "\nType Breakdown:");
    render_breakdown(&mut out, &stats.type_breakdown, stats.fetched);
    let _ = writeln!(out, "\nSubtype Breakdown:");
    render_breakdown(&mut out, &stats.subtype_breakdown, stats.fetched);
    let _ = writeln!(out, "\nStatus Breakdown:");
    render_breakdown(&mut out, &stats.status_breakdown, stats.fetched);

    let _ = writeln!(out, "\nBuild Statistics:");
    let _ = writeln!(
        out,
        "  Total Build Time:     {}",
        format_millis(stats.total_build_ms as f64)
    );
    let _ = writeln!(
        out,
        "  Average Build Time:   {}",
        format_millis(stats.average_build_ms)
    );

    let _ = writeln!(out, "\nRow Statistics:");
    let _ = writeln!(
        out,
        "  Total Rows:          {}",
        format_count(stats.total_rows)
    );
    if stats.fetched > 0 {
        let _ = writeln!(out, "  Average Rows/Agg:    {:.0}", stats.average_rows);
    }

    let _ = writeln!(out, "\nQuery Utilization:");
    let _ = writeln!(
        out,
        "  Average Utilization:  {:.1}",
        stats.average_query_utilization
    );

    if let Some(extremes) = &stats.extremes {
        let _ = writeln!(out, "\nFastest Build:");
        let _ = writeln!(out, "  ID:     {}", short_id(&extremes.fastest_build.id, 15));
        let _ = writeln!(
            out,
            "  Time:   {}",
            format_millis(extremes.fastest_build.value as f64)
        );

        let _ = writeln!(out, "\nSlowest Build:");
        let _ = writeln!(out, "  ID:     {}", short_id(&extremes.slowest_build.id, 15));
        let _ = writeln!(
            out,
            "  Time:   {}",
            format_millis(extremes.slowest_build.value as f64)
        );

        let _ = writeln!(out, "\nLargest Aggregate:");
        let _ = writeln!(out, "  ID:     {}", short_id(&extremes.largest.id, 15));
        let _ = writeln!(out, "  Rows:   {}", format_count(extremes.largest.value));

        let _ = writeln!(out, "\nSmallest Aggregate:");
        let _ = writeln!(out, "  ID:     {}", short_id(&extremes.smallest.id, 15));
        let _ = writeln!(out, "  Rows:   {}", format_count(extremes.smallest.value));
    }

    out
}

fn render_breakdown(out: &mut String, breakdown: &BTreeMap<String, usize>, fetched: usize) {
    for (label, count) in breakdown {
        #[allow(clippy::cast_precision_loss)]
        let percentage = if fetched == 0 {
            0.0
        } else {
            *count as f64 / fetched as f64 * 100.0
        };
        let pretty = label.replace('_', " ");
        let _ = writeln!(out, "  {pretty:<25} {count:3} ({percentage:.1}%)");
    }
}
