//! CSV export of an aggregate listing.

use std::path::{Path, PathBuf};

use chrono::Local;
use serde::Serialize;

use crate::core::models::AggregateRecord;
use crate::error::Result;

/// One exported row. Field order is the column order.
#[derive(Debug, Serialize)]
pub struct CsvRow {
    pub aggregate_id: String,
    pub aggregate_name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub subtype: String,
    pub status: String,
    pub rows: u64,
    pub build_duration_ms: u64,
    pub avg_build_duration_ms: u64,
    pub query_utilization: f64,
    pub last_query_time: String,
    pub created_at: String,
    pub table_name: String,
    pub table_schema: String,
    pub batch_id: String,
    pub connection_id: String,
    pub key_count: usize,
    pub measure_count: usize,
    pub dimension_count: usize,
    pub total_attributes: usize,
}

impl CsvRow {
    #[must_use]
    pub fn from_record(record: &AggregateRecord) -> Self {
        let instance = &record.latest_instance;
        let count = |kind: &str| {
            record
                .attributes
                .iter()
                .filter(|a| a.kind == kind)
                .count()
        };

        Self {
            aggregate_id: record.id.clone(),
            aggregate_name: record.name.clone(),
            kind: record.kind.clone(),
            subtype: record.subtype.clone(),
            status: instance.status.clone(),
            rows: instance.stats.number_of_rows,
            build_duration_ms: instance.stats.build_duration,
            avg_build_duration_ms: record.stats.average_build_duration,
            query_utilization: record.stats.query_utilization,
            last_query_time: record.stats.most_recent_query.clone(),
            created_at: record.stats.created_at.clone(),
            table_name: instance.table_name.clone(),
            table_schema: instance.table_schema.clone(),
            batch_id: instance.batch_id.clone(),
            connection_id: instance.connection_id.clone(),
            key_count: count("key"),
            measure_count: count("measure"),
            dimension_count: count("dimension"),
            total_attributes: record.attributes.len(),
        }
    }
}

/// Default export filename: `aggregates_<cube>_<timestamp>.csv` with the
/// cube label reduced to filesystem-safe characters.
#[must_use]
pub fn default_filename(cube_label: &str) -> PathBuf {
    let safe: String = cube_label
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    PathBuf::from(format!("aggregates_{}_{timestamp}.csv", safe.trim_end()))
}

/// Write the export to `path`. Returns the number of data rows written.
///
/// # Errors
///
/// Returns error on filesystem or serialization failure.
pub fn write_csv(records: &[AggregateRecord], path: &Path) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(CsvRow::from_record(record))?;
    }
    writer.flush()?;
    Ok(records.len())
}
