//! Aggregate statistics for one cube.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::core::models::AggregateRecord;

/// Identifier plus the metric that made it an extreme.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Extreme {
    pub id: String,
    pub value: u64,
}

/// Build/row extremes across the fetched batch.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Extremes {
    /// Shortest build, in milliseconds.
    pub fastest_build: Extreme,
    /// Longest build, in milliseconds.
    pub slowest_build: Extreme,
    /// Most rows.
    pub largest: Extreme,
    /// Fewest rows.
    pub smallest: Extreme,
}

/// Statistics report over one cube's aggregates.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CubeStatistics {
    /// Backend-reported total (may exceed the fetched batch).
    pub total: u64,
    /// Number of aggregates in this batch.
    pub fetched: usize,
    pub type_breakdown: BTreeMap<String, usize>,
    pub subtype_breakdown: BTreeMap<String, usize>,
    pub status_breakdown: BTreeMap<String, usize>,
    pub active_count: usize,
    pub total_rows: u64,
    pub average_rows: f64,
    pub total_build_ms: u64,
    pub average_build_ms: f64,
    pub average_query_utilization: f64,
    pub extremes: Option<Extremes>,
}

impl CubeStatistics {
    /// Compute statistics over a fetched batch.
    #[must_use]
    pub fn compute(records: &[AggregateRecord], total: u64) -> Self {
        let mut type_breakdown: BTreeMap<String, usize> = BTreeMap::new();
        let mut subtype_breakdown: BTreeMap<String, usize> = BTreeMap::new();
        let mut status_breakdown: BTreeMap<String, usize> = BTreeMap::new();
        let mut total_rows = 0u64;
        let mut total_build_ms = 0u64;
        let mut total_query_utilization = 0.0f64;
        let mut active_count = 0usize;

        for record in records {
            *type_breakdown
                .entry(or_unknown(&record.kind))
                .or_default() += 1;
            *subtype_breakdown
                .entry(or_unknown(&record.subtype))
                .or_default() += 1;
            *status_breakdown
                .entry(or_unknown(&record.latest_instance.status))
                .or_default() += 1;

            total_rows += record.latest_instance.stats.number_of_rows;
            total_build_ms += record.latest_instance.stats.build_duration;
            total_query_utilization += record.stats.query_utilization;

            if record.latest_instance.status.eq_ignore_ascii_case("active") {
                active_count += 1;
            }
        }

        #[allow(clippy::cast_precision_loss)]
        let count = records.len() as f64;
        let (average_rows, average_build_ms, average_query_utilization) = if records.is_empty() {
            (0.0, 0.0, 0.0)
        } else {
            #[allow(clippy::cast_precision_loss)]
            (
                total_rows as f64 / count,
                total_build_ms as f64 / count,
                total_query_utilization / count,
            )
        };

        Self {
            total,
            fetched: records.len(),
            type_breakdown,
            subtype_breakdown,
            status_breakdown,
            active_count,
            total_rows,
            average_rows,
            total_build_ms,
            average_build_ms,
            average_query_utilization,
            extremes: compute_extremes(records),
        }
    }
}

fn or_unknown(value: &str) -> String {
    if value.is_empty() {
        "unknown".to_string()
    } else {
        value.to_string()
    }
}

fn compute_extremes(records: &[AggregateRecord]) -> Option<Extremes> {
    let first = records.first()?;
    let mut fastest = first;
    let mut slowest = first;
    let mut largest = first;
    let mut smallest = first;

    for record in records {
        if record.latest_instance.stats.build_duration
            < fastest.latest_instance.stats.build_duration
        {
            fastest = record;
        }
        if record.latest_instance.stats.build_duration
            > slowest.latest_instance.stats.build_duration
        {
            slowest = record;
        }
        if record.latest_instance.stats.number_of_rows
            > largest.latest_instance.stats.number_of_rows
        {
            largest = record;
        }
        if record.latest_instance.stats.number_of_rows
            < smallest.latest_instance.stats.number_of_rows
        {
            smallest = record;
        }
    }

    Some(Extremes {
        fastest_build: Extreme {
            id: fastest.id.clone(),
            value: fastest.latest_instance.stats.build_duration,
        },
        slowest_build: Extreme {
            id: slowest.id.clone(),
            value: slowest.latest_instance.stats.build_duration,
        },
        largest: Extreme {
            id: largest.id.clone(),
            value: largest.latest_instance.stats.number_of_rows,
        },
        smallest: Extreme {
            id: smallest.id.clone(),
            value: smallest.latest_instance.stats.number_of_rows,
        },
    })
}
