//! Step 1 (identity and location) and step 2 (commodity selection) schemas.

use super::report::ValidationReport;
use super::rules::{require_coordinate, require_date, require_text};
use super::{StepSchema, ValidationContext};
use crate::model::session::FormSession;

const MAX_LATITUDE: f64 = 90.0;
const MAX_LONGITUDE: f64 = 180.0;

/// Officer, farmer, administrative area and coordinates.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentitySchema;

impl StepSchema for IdentitySchema {
    fn check(&self, session: &FormSession, ctx: &ValidationContext, report: &mut ValidationReport) {
        let identity = &session.identity;
        require_text(report, "officer_name", &identity.officer_name, "Officer name");

        let visit_date = require_date(report, "visit_date", &identity.visit_date, "Visit date");
        if let Some(visit_date) = visit_date {
            if visit_date > ctx.today {
                report.push("visit_date", "Visit date cannot be in the future");
            }
        }

        require_text(report, "farmer_name", &identity.farmer_name, "Farmer name");
        require_text(report, "farmer_group", &identity.farmer_group, "Farmer group");
        require_text(report, "village", &identity.village, "Village");
        require_text(report, "district", &identity.district, "District");
        require_coordinate(report, "latitude", &identity.latitude, MAX_LATITUDE, "Latitude");
        require_coordinate(report, "longitude", &identity.longitude, MAX_LONGITUDE, "Longitude");
    }
}

/// Exactly one commodity kind must be chosen; no sub-fields are checked here.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommoditySelectionSchema;

impl StepSchema for CommoditySelectionSchema {
    fn check(
        &self,
        session: &FormSession,
        _ctx: &ValidationContext,
        report: &mut ValidationReport,
    ) {
        if session.commodity_kind().is_none() {
            report.push("commodity_kind", "Select a commodity kind");
        }
    }
}
