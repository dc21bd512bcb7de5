//! Step gating and navigation.
//!
//! # Responsibility
//! - Decide step-route accessibility purely from session completeness.
//! - Drive the step cursor, redirects and the post-submit return.

pub mod navigator;
pub mod step_gate;

pub use navigator::{
    NavigationError, NavigationOutcome, Navigator, StepNotice, RETURN_TO_START_DELAY,
};
pub use step_gate::{
    can_access_step, can_access_step_index, last_completed_step, resume_step, step_complete,
};
