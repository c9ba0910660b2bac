//! Utility functions.

pub mod format;

pub use format::{
    duration_between_ms, format_count, format_iso_duration, format_millis,
    format_timestamp_short, parse_timestamp, short_id,
};
