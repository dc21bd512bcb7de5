//! Reusable field predicates.

use super::dates::parse_calendar_date;
use super::report::ValidationReport;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static DECIMAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-+]?\d+(\.\d+)?$").expect("valid decimal regex"));

pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub(crate) fn require_text(
    report: &mut ValidationReport,
    path: &str,
    value: &str,
    label: &str,
) -> bool {
    if is_blank(value) {
        report.push(path, format!("{label} is required"));
        return false;
    }
    true
}

pub(crate) fn require_some<T>(
    report: &mut ValidationReport,
    path: &str,
    value: Option<T>,
    label: &str,
) -> Option<T> {
    if value.is_none() {
        report.push(path, format!("{label} is required"));
    }
    value
}

pub(crate) fn require_positive(
    report: &mut ValidationReport,
    path: &str,
    value: Option<f64>,
    label: &str,
) {
    match value {
        None => report.push(path, format!("{label} is required")),
        Some(number) if !number.is_finite() || number <= 0.0 => {
            report.push(path, format!("{label} must be greater than 0"))
        }
        Some(_) => {}
    }
}

/// Required, parseable date. Returns the parsed value on success.
pub(crate) fn require_date(
    report: &mut ValidationReport,
    path: &str,
    value: &str,
    label: &str,
) -> Option<NaiveDate> {
    if !require_text(report, path, value, label) {
        return None;
    }
    let parsed = parse_calendar_date(value);
    if parsed.is_none() {
        report.push(path, format!("{label} is not a valid date"));
    }
    parsed
}

/// Decimal-degree coordinate given as text, within `[-bound, bound]`.
pub(crate) fn require_coordinate(
    report: &mut ValidationReport,
    path: &str,
    value: &str,
    bound: f64,
    label: &str,
) {
    if !require_text(report, path, value, label) {
        return;
    }
    let trimmed = value.trim();
    let parsed = if DECIMAL_RE.is_match(trimmed) {
        trimmed.parse::<f64>().ok()
    } else {
        None
    };
    match parsed {
        None => report.push(path, format!("{label} must be a number")),
        Some(number) if !(-bound..=bound).contains(&number) => {
            report.push(path, format!("{label} must be between -{bound} and {bound}"))
        }
        Some(_) => {}
    }
}
