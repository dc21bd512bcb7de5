//! Calendar date parsing and normalization.
//!
//! # Invariants
//! - Normalized dates are `YYYY-MM-DD`; unparsable input normalizes to `""`.
//! - `normalize_date(normalize_date(x)) == normalize_date(x)`.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Canonical calendar-date format used on the wire.
pub const CALENDAR_DATE_FORMAT: &str = "%Y-%m-%d";

const NAIVE_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];
const DAY_FIRST_FORMAT: &str = "%d/%m/%Y";

/// Parses a date typed or picked in the form.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps (date taken in their own offset),
/// naive `YYYY-MM-DDTHH:MM:SS` and `DD/MM/YYYY`.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, CALENDAR_DATE_FORMAT) {
        return Some(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(timestamp.date_naive());
    }
    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(timestamp.date());
        }
    }
    NaiveDate::parse_from_str(trimmed, DAY_FIRST_FORMAT).ok()
}

/// Normalizes a date to `YYYY-MM-DD`, or `""` when absent or invalid.
pub fn normalize_date(raw: &str) -> String {
    parse_calendar_date(raw)
        .map(|date| date.format(CALENDAR_DATE_FORMAT).to_string())
        .unwrap_or_default()
}
