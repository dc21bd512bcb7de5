//! Validation issue collection.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One failed predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Field path, equal to the wire key of the field.
    pub path: String,
    pub message: String,
}

/// Ordered list of issues produced by one validation pass.
///
/// Issues for different fields never hide each other; the caller decides how
/// many to display per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.issues.push(ValidationIssue {
            path: path.into(),
            message: message.into(),
        });
    }

    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn has_issue(&self, path: &str) -> bool {
        self.issues.iter().any(|issue| issue.path == path)
    }

    /// First message reported for `path`.
    pub fn message_for(&self, path: &str) -> Option<&str> {
        self.issues
            .iter()
            .find(|issue| issue.path == path)
            .map(|issue| issue.message.as_str())
    }

    /// Display mapping path -> message; the first issue per field wins.
    pub fn field_errors(&self) -> BTreeMap<String, String> {
        let mut errors = BTreeMap::new();
        for issue in &self.issues {
            errors
                .entry(issue.path.clone())
                .or_insert_with(|| issue.message.clone());
        }
        errors
    }

    /// Converts into `Err(self)` when any issue was recorded.
    pub fn into_result(self) -> Result<(), ValidationReport> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl Display for ValidationReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} validation issue(s)", self.issues.len())?;
        for (index, issue) in self.issues.iter().enumerate() {
            let separator = if index == 0 { ": " } else { "; " };
            write!(f, "{separator}{}: {}", issue.path, issue.message)?;
        }
        Ok(())
    }
}

impl Error for ValidationReport {}
