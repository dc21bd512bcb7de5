//! Step 3 schema: the commodity branch selected by kind, plus pest, weather
//! and photo.
//!
//! # Invariants
//! - Only the branch matching the commodity kind is inspected.
//! - Pest details are all-or-nothing while `has_pest` is set; the group issue
//!   is attached to `pest_type`.

use super::report::ValidationReport;
use super::rules::{is_blank, require_date, require_positive, require_some, require_text};
use super::{StepSchema, ValidationContext};
use crate::model::commodity::{DetailField, DetailView};
use crate::model::session::{FormSession, PestReport, WeatherReport};

/// Field name of the photo in paths and in the payload.
pub const PHOTO_FIELD: &str = "photo";

#[derive(Debug, Clone, Copy, Default)]
pub struct CommodityDetailSchema;

impl StepSchema for CommodityDetailSchema {
    fn check(
        &self,
        session: &FormSession,
        _ctx: &ValidationContext,
        report: &mut ValidationReport,
    ) {
        match session.commodity.as_ref() {
            Some(detail) => check_branch(&detail.view(), report),
            None => report.push(
                "commodity_kind",
                "Select a commodity kind before filling in commodity details",
            ),
        }
        check_pest(&session.pest, report);
        check_weather(&session.weather, report);

        match session.attachment.as_ref() {
            Some(attachment) => {
                if let Err(err) = attachment.check() {
                    report.push(PHOTO_FIELD, err.to_string());
                }
            }
            None => report.push(PHOTO_FIELD, "A photo of the plot is required"),
        }
    }
}

fn check_branch(view: &DetailView<'_>, report: &mut ValidationReport) {
    let kind = view.kind;
    let path = |field: DetailField| field.key(kind);
    let label = |field: DetailField| field.label(kind);

    require_text(
        report,
        &path(DetailField::Commodity),
        view.commodity,
        label(DetailField::Commodity),
    );
    require_some(
        report,
        &path(DetailField::LandStatus),
        view.land_status,
        label(DetailField::LandStatus),
    );
    require_positive(
        report,
        &path(DetailField::LandArea),
        view.land_area,
        label(DetailField::LandArea),
    );
    require_some(
        report,
        &path(DetailField::GrowthPhase),
        view.growth_phase,
        label(DetailField::GrowthPhase),
    );
    require_positive(
        report,
        &path(DetailField::PlantAge),
        view.plant_age,
        label(DetailField::PlantAge),
    );
    require_some(report, &path(DetailField::Method), view.method, label(DetailField::Method));

    let planting = require_date(
        report,
        &path(DetailField::PlantingDate),
        view.planting_date,
        label(DetailField::PlantingDate),
    );
    let harvest = require_date(
        report,
        &path(DetailField::HarvestDate),
        view.harvest_date,
        label(DetailField::HarvestDate),
    );
    if let (Some(planting), Some(harvest)) = (planting, harvest) {
        if harvest < planting {
            report.push(
                path(DetailField::HarvestDate),
                "Harvest date cannot be earlier than planting date",
            );
        }
    }

    require_text(
        report,
        &path(DetailField::DelayReason),
        view.delay_reason,
        label(DetailField::DelayReason),
    );
    require_text(report, &path(DetailField::Problem), view.problem, label(DetailField::Problem));
}

fn check_pest(pest: &PestReport, report: &mut ValidationReport) {
    if !pest.has_pest {
        return;
    }
    let type_missing = pest.pest_type.as_deref().map_or(true, is_blank);
    let area_missing = pest.affected_area.is_none();
    let action_missing = pest.control_action.as_deref().map_or(true, is_blank);

    if type_missing || area_missing || action_missing {
        report.push(
            "pest_type",
            "Pest type, affected area and control action must all be filled when pests are reported",
        );
    }
    if type_missing {
        report.push("pest_type", "Pest type is required");
    }
    if area_missing {
        report.push("pest_affected_area", "Affected area is required");
    } else {
        require_positive(report, "pest_affected_area", pest.affected_area, "Affected area");
    }
    if action_missing {
        report.push("pest_control_action", "Control action is required");
    }
}

fn check_weather(weather: &WeatherReport, report: &mut ValidationReport) {
    require_text(
        report,
        "weather_condition",
        weather.condition.as_deref().unwrap_or_default(),
        "Weather condition",
    );
    require_text(
        report,
        "weather_impact",
        weather.impact.as_deref().unwrap_or_default(),
        "Weather impact",
    );
}

