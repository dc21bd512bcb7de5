//! Step 4 schema: aspiration selections and suggestion text.

use super::report::ValidationReport;
use super::rules::require_some;
use super::{StepSchema, ValidationContext};
use crate::model::aspiration::{MainConstraint, WaterAccess};
use crate::model::session::FormSession;

pub const SUGGESTION_MIN_CHARS: usize = 20;
pub const SUGGESTION_MAX_CHARS: usize = 1000;

#[derive(Debug, Clone, Copy, Default)]
pub struct AspirationSchema;

impl StepSchema for AspirationSchema {
    fn check(
        &self,
        session: &FormSession,
        _ctx: &ValidationContext,
        report: &mut ValidationReport,
    ) {
        let aspiration = &session.aspiration;
        let constraint = require_some(
            report,
            "main_constraint",
            aspiration.main_constraint,
            "Main constraint",
        );
        require_some(report, "hope", aspiration.hope, "Hope");
        require_some(report, "training_need", aspiration.training_need, "Training need");
        require_some(report, "urgent_need", aspiration.urgent_need, "Urgent need");
        let water = require_some(report, "water_access", aspiration.water_access, "Water access");

        if constraint == Some(MainConstraint::WaterShortage)
            && water == Some(WaterAccess::Abundant)
        {
            report.push(
                "water_access",
                "Water access cannot be abundant when the main constraint is water shortage",
            );
        }

        if let Some(suggestion) = aspiration.suggestion.as_deref() {
            let length = suggestion.trim().chars().count();
            if length > 0 && length < SUGGESTION_MIN_CHARS {
                report.push(
                    "suggestion",
                    format!("Suggestion must be at least {SUGGESTION_MIN_CHARS} characters"),
                );
            } else if length > SUGGESTION_MAX_CHARS {
                report.push(
                    "suggestion",
                    format!("Suggestion must be at most {SUGGESTION_MAX_CHARS} characters"),
                );
            }
        }
    }
}
