//! Aggregate health check for one cube.
//!
//! Issues are aggregates whose latest instance is not active. Warnings
//! flag empty tables, slow builds, and stale or absent query utilization.
//! The score is `100 - 50*(issues/n) - 25*(warnings/n)`, floored at 0.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::models::AggregateRecord;
use crate::util::{format_millis, parse_timestamp, short_id};

/// Builds slower than this are flagged.
const SLOW_BUILD_MS: u64 = 30_000;

/// Last queries older than this are flagged.
const STALE_QUERY_DAYS: i64 = 30;

/// Health report over one cube's aggregates.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HealthReport {
    pub total: usize,
    pub issues: Vec<String>,
    pub warnings: Vec<String>,
    pub score: f64,
}

impl HealthReport {
    /// Compute health against `now` (injected so staleness is testable).
    #[must_use]
    pub fn compute(records: &[AggregateRecord], now: DateTime<Utc>) -> Self {
        let mut issues = Vec::new();
        let mut warnings = Vec::new();

        for record in records {
            let id = short_id(&record.id, 12);
            let instance = &record.latest_instance;
            let status = instance.status.to_lowercase();

            if status != "active" {
                issues.push(format!("{id}: status is '{status}'"));
            }

            if instance.stats.number_of_rows == 0 {
                warnings.push(format!("{id}: has 0 rows"));
            }

            if instance.stats.build_duration > SLOW_BUILD_MS {
                warnings.push(format!(
                    "{id}: slow build ({})",
                    format_millis(instance.stats.build_duration as f64)
                ));
            }

            let last_query = &record.stats.most_recent_query;
            if record.stats.query_utilization == 0.0 && last_query.is_empty() {
                warnings.push(format!("{id}: no query utilization"));
            }

            if let Some(queried_at) = parse_timestamp(last_query) {
                let days_old = now.signed_duration_since(queried_at).num_days();
                if days_old > STALE_QUERY_DAYS {
                    warnings.push(format!("{id}: last query {days_old} days ago"));
                }
            }
        }

        let score = if records.is_empty() {
            100.0
        } else {
            #[allow(clippy::cast_precision_loss)]
            let n = records.len() as f64;
            #[allow(clippy::cast_precision_loss)]
            let penalty = (issues.len() as f64 / n).mul_add(50.0, warnings.len() as f64 / n * 25.0);
            (100.0 - penalty).max(0.0)
        };

        Self {
            total: records.len(),
            issues,
            warnings,
            score,
        }
    }
}
