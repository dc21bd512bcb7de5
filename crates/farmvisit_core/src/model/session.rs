//! Form session: every field of one survey across all steps.
//!
//! # Responsibility
//! - Hold the accumulated input for one survey submission.
//! - Apply textual field edits coming from the view layer.
//!
//! # Invariants
//! - At most one commodity branch is populated; its tag is the kind.
//! - Selecting a different kind discards the previous branch.
//! - `reset` returns the session to `FormSession::default()`.

use super::aspiration::AspirationSection;
use super::attachment::Attachment;
use super::choice::Choice;
use super::commodity::{CommodityDetail, CommodityKind, DetailField};
use super::{parse_bool, parse_choice, parse_number, FieldError};
use serde::{Deserialize, Serialize};

/// Step 1 record. Coordinates stay textual until validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentitySection {
    pub officer_name: String,
    pub visit_date: String,
    pub farmer_name: String,
    pub farmer_group: String,
    pub village: String,
    pub district: String,
    pub latitude: String,
    pub longitude: String,
}

impl IdentitySection {
    /// The six text fields that gate step 2 (coordinates excluded).
    pub fn gate_fields(&self) -> [&str; 6] {
        [
            self.officer_name.as_str(),
            self.visit_date.as_str(),
            self.farmer_name.as_str(),
            self.farmer_group.as_str(),
            self.village.as_str(),
            self.district.as_str(),
        ]
    }
}

/// Pest observation; details are required together when `has_pest` is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PestReport {
    pub has_pest: bool,
    pub pest_type: Option<String>,
    /// Hectares affected.
    pub affected_area: Option<f64>,
    pub control_action: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherReport {
    pub condition: Option<String>,
    pub impact: Option<String>,
}

/// Complete accumulated input for one survey submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormSession {
    pub identity: IdentitySection,
    pub commodity: Option<CommodityDetail>,
    pub pest: PestReport,
    pub weather: WeatherReport,
    pub aspiration: AspirationSection,
    /// Binary photo; never part of the JSON snapshot.
    #[serde(skip)]
    pub attachment: Option<Attachment>,
}

impl FormSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commodity_kind(&self) -> Option<CommodityKind> {
        self.commodity.as_ref().map(CommodityDetail::kind)
    }

    /// Selects the commodity kind.
    ///
    /// Re-selecting the active kind keeps its detail; switching kinds starts
    /// an empty branch so fields from two branches never coexist.
    pub fn select_commodity(&mut self, kind: CommodityKind) {
        if self.commodity_kind() != Some(kind) {
            self.commodity = Some(CommodityDetail::empty(kind));
        }
    }

    pub fn clear_commodity(&mut self) {
        self.commodity = None;
    }

    pub fn set_attachment(&mut self, attachment: Attachment) {
        self.attachment = Some(attachment);
    }

    pub fn clear_attachment(&mut self) {
        self.attachment = None;
    }

    /// Parses a JSON draft (attachment excluded).
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Pretty JSON draft of every field except the attachment bytes.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Returns the session to its empty default state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Applies one textual edit from the view layer.
    ///
    /// Empty values clear optional fields. Commodity branch keys are accepted
    /// only for the selected kind.
    ///
    /// # Errors
    /// - `UnknownField` when `key` names no session field.
    /// - `InvalidNumber` / `InvalidChoice` / `InvalidBool` on unparsable values.
    /// - `InactiveBranch` for a branch key of a kind that is not selected.
    pub fn set_field(&mut self, key: &str, value: &str) -> Result<(), FieldError> {
        match key {
            "officer_name" => self.identity.officer_name = value.to_string(),
            "visit_date" => self.identity.visit_date = value.to_string(),
            "farmer_name" => self.identity.farmer_name = value.to_string(),
            "farmer_group" => self.identity.farmer_group = value.to_string(),
            "village" => self.identity.village = value.to_string(),
            "district" => self.identity.district = value.to_string(),
            "latitude" => self.identity.latitude = value.trim().to_string(),
            "longitude" => self.identity.longitude = value.trim().to_string(),
            "commodity_kind" => match parse_choice::<CommodityKind>(key, value)? {
                Some(kind) => self.select_commodity(kind),
                None => self.clear_commodity(),
            },
            "has_pest" => self.pest.has_pest = parse_bool(key, value)?,
            "pest_type" => self.pest.pest_type = optional_text(value),
            "pest_affected_area" => self.pest.affected_area = parse_number(key, value)?,
            "pest_control_action" => self.pest.control_action = optional_text(value),
            "weather_condition" => self.weather.condition = optional_text(value),
            "weather_impact" => self.weather.impact = optional_text(value),
            "main_constraint" => self.aspiration.main_constraint = parse_choice(key, value)?,
            "hope" => self.aspiration.hope = parse_choice(key, value)?,
            "training_need" => self.aspiration.training_need = parse_choice(key, value)?,
            "urgent_need" => self.aspiration.urgent_need = parse_choice(key, value)?,
            "water_access" => self.aspiration.water_access = parse_choice(key, value)?,
            "suggestion" => self.aspiration.suggestion = optional_text(value),
            other => return self.set_branch_field(other, value),
        }
        Ok(())
    }

    fn set_branch_field(&mut self, key: &str, value: &str) -> Result<(), FieldError> {
        let (kind, field) = CommodityKind::ALL
            .iter()
            .find_map(|kind| DetailField::from_key(*kind, key).map(|field| (*kind, field)))
            .ok_or_else(|| FieldError::UnknownField(key.to_string()))?;

        match self.commodity.as_mut() {
            Some(detail) if detail.kind() == kind => detail.set(field, key, value),
            _ => Err(FieldError::InactiveBranch(key.to_string())),
        }
    }
}

fn optional_text(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
