//! Field schemas and the composed session contract.
//!
//! # Responsibility
//! - Validate each step of the survey against its own field rules.
//! - Compose identity, the kind-selected commodity branch and aspirations into
//!   one contract for the whole session.
//!
//! # Invariants
//! - Validation is pure: it reads the session and never mutates it.
//! - Every issue path equals the wire key of the offending field.

pub mod aspiration;
pub mod dates;
pub mod detail;
pub mod identity;
pub mod report;
mod rules;

use crate::model::session::FormSession;
use crate::model::step::StepId;
use chrono::{Local, NaiveDate};

pub use aspiration::AspirationSchema;
pub use detail::CommodityDetailSchema;
pub use identity::{CommoditySelectionSchema, IdentitySchema};
pub use report::{ValidationIssue, ValidationReport};

/// Inputs to validation that do not live in the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationContext {
    /// Latest acceptable visit date.
    pub today: NaiveDate,
}

impl ValidationContext {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    /// Context anchored at the local calendar day.
    pub fn current() -> Self {
        Self::new(Local::now().date_naive())
    }
}

/// Validation rules for one part of the session.
pub trait StepSchema {
    /// Appends every failed predicate to `report`.
    fn check(&self, session: &FormSession, ctx: &ValidationContext, report: &mut ValidationReport);

    fn validate(&self, session: &FormSession, ctx: &ValidationContext) -> ValidationReport {
        let mut report = ValidationReport::new();
        self.check(session, ctx, &mut report);
        report
    }
}

/// Intersection of identity, commodity selection, the kind-selected detail
/// branch and aspirations.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionSchema;

impl StepSchema for SessionSchema {
    fn check(&self, session: &FormSession, ctx: &ValidationContext, report: &mut ValidationReport) {
        IdentitySchema.check(session, ctx, report);
        CommoditySelectionSchema.check(session, ctx, report);
        CommodityDetailSchema.check(session, ctx, report);
        AspirationSchema.check(session, ctx, report);
    }
}

/// Validates the fields that belong to `step`. The review step validates the
/// whole session.
pub fn validate_step(
    step: StepId,
    session: &FormSession,
    ctx: &ValidationContext,
) -> ValidationReport {
    match step {
        StepId::Identity => IdentitySchema.validate(session, ctx),
        StepId::Commodity => CommoditySelectionSchema.validate(session, ctx),
        StepId::CommodityDetail => CommodityDetailSchema.validate(session, ctx),
        StepId::Aspiration => AspirationSchema.validate(session, ctx),
        StepId::Review => SessionSchema.validate(session, ctx),
    }
}

/// Validates the complete session.
pub fn validate_session(session: &FormSession, ctx: &ValidationContext) -> ValidationReport {
    SessionSchema.validate(session, ctx)
}
