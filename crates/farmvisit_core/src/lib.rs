//! Core domain logic for the farm visit survey.
//! This crate is the single source of truth for form rules: field schemas,
//! step gating, navigation and submission assembly.

pub mod config;
pub mod gate;
pub mod geo;
pub mod logging;
pub mod model;
pub mod preview;
pub mod schema;
pub mod service;
pub mod submission;

pub use config::{ConfigError, SubmitConfig};
pub use gate::{
    can_access_step, can_access_step_index, last_completed_step, NavigationError,
    NavigationOutcome, Navigator, StepNotice,
};
pub use geo::{GeoFix, GeolocationError, GeolocationOptions, GeolocationProvider, LocationRequest};
pub use logging::{
    default_log_level, init_logging, init_logging_with, logging_status, LogOptions, LoggingError,
};
pub use model::attachment::{allowed_content_types, Attachment, AttachmentError};
pub use model::choice::Choice;
pub use model::commodity::{CommodityDetail, CommodityKind, DetailField};
pub use model::session::FormSession;
pub use model::step::StepId;
pub use model::FieldError;
pub use preview::{PreviewHandle, PreviewId, PreviewStore};
pub use schema::dates::normalize_date;
pub use schema::{
    validate_session, validate_step, ValidationContext, ValidationIssue, ValidationReport,
};
pub use service::form_flow::{FormFlow, SubmissionTicket, SubmitError};
pub use submission::{
    assemble, HttpTransport, SubmissionPayload, SubmitReceipt, Transport, TransportError,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
