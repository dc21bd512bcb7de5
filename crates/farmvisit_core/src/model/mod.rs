//! Survey domain model.
//!
//! # Responsibility
//! - Define the form session record and every section it aggregates.
//! - Parse textual field edits into typed values.
//!
//! # Invariants
//! - The session is the only mutable survey state; steps never keep a copy.
//! - Commodity detail is a sum type keyed by commodity kind.

pub mod aspiration;
pub mod attachment;
pub mod choice;
pub mod commodity;
pub mod session;
pub mod step;

use choice::Choice;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rejected field edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// Key names no session field.
    UnknownField(String),
    /// Commodity branch key for a kind that is not selected.
    InactiveBranch(String),
    InvalidNumber { key: String, value: String },
    InvalidChoice { key: String, value: String },
    InvalidBool { key: String, value: String },
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownField(key) => write!(f, "unknown field: `{key}`"),
            Self::InactiveBranch(key) => {
                write!(f, "field `{key}` belongs to a commodity kind that is not selected")
            }
            Self::InvalidNumber { key, value } => {
                write!(f, "field `{key}` expects a number, got `{value}`")
            }
            Self::InvalidChoice { key, value } => {
                write!(f, "field `{key}` does not accept `{value}`")
            }
            Self::InvalidBool { key, value } => {
                write!(f, "field `{key}` expects true or false, got `{value}`")
            }
        }
    }
}

impl Error for FieldError {}

pub(crate) fn parse_number(key: &str, value: &str) -> Result<Option<f64>, FieldError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(Some(number)),
        _ => Err(FieldError::InvalidNumber {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

pub(crate) fn parse_choice<C: Choice>(key: &str, value: &str) -> Result<Option<C>, FieldError> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    C::parse(value).map(Some).ok_or_else(|| FieldError::InvalidChoice {
        key: key.to_string(),
        value: value.to_string(),
    })
}

pub(crate) fn parse_bool(key: &str, value: &str) -> Result<bool, FieldError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "ya" => Ok(true),
        "false" | "0" | "no" | "tidak" | "" => Ok(false),
        _ => Err(FieldError::InvalidBool {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_bool, parse_number, FieldError};

    #[test]
    fn parse_number_rejects_non_finite_values() {
        assert!(matches!(
            parse_number("land_area", "inf"),
            Err(FieldError::InvalidNumber { .. })
        ));
        assert_eq!(parse_number("land_area", "").unwrap(), None);
        assert_eq!(parse_number("land_area", "-1.25").unwrap(), Some(-1.25));
    }

    #[test]
    fn parse_bool_accepts_indonesian_answers() {
        assert!(parse_bool("has_pest", "Ya").unwrap());
        assert!(!parse_bool("has_pest", "tidak").unwrap());
    }
}
