//! Field photo attached to a survey.
//!
//! # Invariants
//! - Accepted photos are non-empty, at most `MAX_ATTACHMENT_BYTES`, and typed
//!   `image/jpeg` or `image/png`.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Upper bound for one photo (5 MiB).
pub const MAX_ATTACHMENT_BYTES: usize = 5 * 1024 * 1024;

const ALLOWED_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png"];

/// Returns accepted photo MIME types.
pub fn allowed_content_types() -> &'static [&'static str] {
    ALLOWED_CONTENT_TYPES
}

/// Binary photo staged for submission.
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Guesses the MIME type from a file extension (`jpg`, `jpeg`, `png`).
    pub fn content_type_for_path(path: &str) -> Option<&'static str> {
        let extension = path.rsplit_once('.')?.1.to_ascii_lowercase();
        match extension.as_str() {
            "jpg" | "jpeg" => Some("image/jpeg"),
            "png" => Some("image/png"),
            _ => None,
        }
    }

    /// Checks size and type constraints.
    pub fn check(&self) -> Result<(), AttachmentError> {
        if self.bytes.is_empty() {
            return Err(AttachmentError::Empty);
        }
        if self.bytes.len() > MAX_ATTACHMENT_BYTES {
            return Err(AttachmentError::TooLarge {
                size: self.bytes.len(),
                max: MAX_ATTACHMENT_BYTES,
            });
        }
        let normalized = self.content_type.trim().to_ascii_lowercase();
        if !allowed_content_types().contains(&normalized.as_str()) {
            return Err(AttachmentError::UnsupportedType(self.content_type.clone()));
        }
        Ok(())
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

impl std::fmt::Debug for Attachment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attachment")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Photo constraint violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentError {
    Empty,
    TooLarge { size: usize, max: usize },
    UnsupportedType(String),
}

impl Display for AttachmentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "photo file is empty"),
            Self::TooLarge { size, max } => write!(
                f,
                "photo is too large ({size} bytes); maximum is {} MB",
                max / (1024 * 1024)
            ),
            Self::UnsupportedType(value) => {
                write!(f, "photo must be a JPEG or PNG image, got `{value}`")
            }
        }
    }
}

impl Error for AttachmentError {}
