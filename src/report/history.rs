//! Build-history summary statistics.

use serde::Serialize;

use crate::core::models::BuildBatch;
use crate::util::duration_between_ms;

/// Number of batches shown in the recent-build timeline.
const TIMELINE_LEN: usize = 5;

/// One timeline entry for a recent batch.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TimelineEntry {
    pub batch_id: String,
    pub status: String,
    pub full_build: bool,
    /// Wall-clock duration in milliseconds, when both instants parse.
    pub duration_ms: Option<f64>,
}

/// Summary over a fetched build-history page.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HistorySummary {
    pub total_batches: usize,
    pub successful: usize,
    pub failed: usize,
    pub running: usize,
    pub full_builds: usize,
    pub average_duration_ms: Option<f64>,
    pub min_duration_ms: Option<f64>,
    pub max_duration_ms: Option<f64>,
    pub timeline: Vec<TimelineEntry>,
}

impl HistorySummary {
    /// Compute the summary over one page of history, newest first.
    #[must_use]
    pub fn compute(batches: &[BuildBatch]) -> Self {
        let successful = batches.iter().filter(|b| b.status == "done").count();
        let failed = batches.iter().filter(|b| b.status == "failed").count();
        let running = batches.iter().filter(|b| b.status == "running").count();
        let full_builds = batches.iter().filter(|b| b.is_full_build).count();

        let durations: Vec<f64> = batches
            .iter()
            .filter_map(|b| duration_between_ms(&b.start_time, &b.end_time))
            .collect();

        #[allow(clippy::cast_precision_loss)]
        let average_duration_ms = if durations.is_empty() {
            None
        } else {
            Some(durations.iter().sum::<f64>() / durations.len() as f64)
        };
        let min_duration_ms = durations.iter().copied().reduce(f64::min);
        let max_duration_ms = durations.iter().copied().reduce(f64::max);

        let timeline = batches
            .iter()
            .take(TIMELINE_LEN)
            .map(|b| TimelineEntry {
                batch_id: b.id.clone(),
                status: b.status.clone(),
                full_build: b.is_full_build,
                duration_ms: duration_between_ms(&b.start_time, &b.end_time),
            })
            .collect();

        Self {
            total_batches: batches.len(),
            successful,
            failed,
            running,
            full_builds,
            average_duration_ms,
            min_duration_ms,
            max_duration_ms,
            timeline,
        }
    }
}
