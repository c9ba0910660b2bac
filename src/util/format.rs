//! Duration and timestamp formatting shared by the report renderers.

use chrono::{DateTime, Utc};

/// Format a millisecond duration: `850ms`, `1.2s`, `3.5min`.
#[must_use]
pub fn format_millis(ms: f64) -> String {
    if ms < 1000.0 {
        format!("{ms:.0}ms")
    } else if ms < 60_000.0 {
        format!("{:.1}s", ms / 1000.0)
    } else {
        format!("{:.1}min", ms / 60_000.0)
    }
}

/// Format a count with thousands separators.
#[must_use]
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Parse an RFC-3339 timestamp, tolerating a trailing `Z`.
#[must_use]
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if value.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Short display form for a timestamp: `%m/%d %H:%M`, or `N/A`.
#[must_use]
pub fn format_timestamp_short(value: &str) -> String {
    parse_timestamp(value).map_or_else(
        || {
            if value.is_empty() {
                "N/A".to_string()
            } else {
                value.chars().take(16).collect()
            }
        },
        |dt| dt.format("%m/%d %H:%M").to_string(),
    )
}

/// Duration in milliseconds between two RFC-3339 instants.
#[must_use]
pub fn duration_between_ms(start: &str, end: &str) -> Option<f64> {
    let start = parse_timestamp(start)?;
    let end = parse_timestamp(end)?;
    #[allow(clippy::cast_precision_loss)]
    Some(end.signed_duration_since(start).num_milliseconds() as f64)
}

/// Render an ISO-8601 duration like `PT3.232S` in the display forms
/// `3.2s` / `1.5min` / `2.0hr`. Unparseable input comes back as `N/A` or
/// verbatim.
#[must_use]
pub fn format_iso_duration(value: &str) -> String {
    let Some(body) = value.strip_prefix("PT") else {
        return "N/A".to_string();
    };

    if let Some(seconds) = body.strip_suffix(['S', 's']) {
        if let Ok(seconds) = seconds.parse::<f64>() {
            return if seconds < 60.0 {
                format!("{seconds:.1}s")
            } else {
                format!("{:.1}min", seconds / 60.0)
            };
        }
    } else if let Some(minutes) = body.strip_suffix(['M', 'm']) {
        if let Ok(minutes) = minutes.parse::<f64>() {
            return format!("{minutes:.1}min");
        }
    } else if let Some(hours) = body.strip_suffix(['H', 'h']) {
        if let Ok(hours) = hours.parse::<f64>() {
            return format!("{hours:.1}hr");
        }
    }

    value.to_string()
}

/// Shorten an identifier for table display. Truncates on character
/// boundaries; ids are arbitrary Unicode.
#[must_use]
pub fn short_id(id: &str, len: usize) -> String {
    if id.chars().count() <= len {
        id.to_string()
    } else {
        let prefix: String = id.chars().take(len).collect();
        format!("{prefix}...")
    }
}
