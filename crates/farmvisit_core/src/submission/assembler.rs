//! Submission assembler: flattens a session into multipart fields.
//!
//! # Invariants
//! - Only the commodity branch matching the kind is emitted.
//! - Blank values are never emitted; dates are `YYYY-MM-DD`.
//! - Pest details are emitted only when `has_pest` is set.
//! - One photo is sent as `photo`; several as `photo_0`, `photo_1`, ...

use crate::model::attachment::Attachment;
use crate::model::choice::Choice;
use crate::model::commodity::{DetailField, DetailView};
use crate::model::session::FormSession;
use crate::schema::dates::normalize_date;
use crate::schema::detail::PHOTO_FIELD;

/// Binary part of the payload.
#[derive(Clone, PartialEq, Eq)]
pub struct AttachmentPart {
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for AttachmentPart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttachmentPart")
            .field("field", &self.field)
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Transport-ready survey payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionPayload {
    fields: Vec<(String, String)>,
    attachments: Vec<AttachmentPart>,
}

impl SubmissionPayload {
    /// Text fields in emission order.
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn attachments(&self) -> &[AttachmentPart] {
        &self.attachments
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(key, _)| key.as_str())
    }

    fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return;
        }
        self.fields.push((key.into(), trimmed.to_string()));
    }

    fn push_opt<T: ToString>(&mut self, key: impl Into<String>, value: Option<T>) {
        if let Some(value) = value {
            self.push(key, value.to_string());
        }
    }
}

/// Flattens `session` into a submission payload.
pub fn assemble(session: &FormSession) -> SubmissionPayload {
    let mut payload = SubmissionPayload::default();

    let identity = &session.identity;
    payload.push("officer_name", identity.officer_name.as_str());
    payload.push("visit_date", normalize_date(&identity.visit_date));
    payload.push("farmer_name", identity.farmer_name.as_str());
    payload.push("farmer_group", identity.farmer_group.as_str());
    payload.push("village", identity.village.as_str());
    payload.push("district", identity.district.as_str());
    payload.push("latitude", identity.latitude.as_str());
    payload.push("longitude", identity.longitude.as_str());

    if let Some(detail) = session.commodity.as_ref() {
        let view = detail.view();
        payload.push("commodity_kind", view.kind.as_str());
        push_branch(&mut payload, &view);
    }

    let pest = &session.pest;
    payload.push("has_pest", pest.has_pest.to_string());
    if pest.has_pest {
        payload.push_opt("pest_type", pest.pest_type.as_deref());
        payload.push_opt("pest_affected_area", pest.affected_area);
        payload.push_opt("pest_control_action", pest.control_action.as_deref());
    }
    payload.push_opt("weather_condition", session.weather.condition.as_deref());
    payload.push_opt("weather_impact", session.weather.impact.as_deref());

    let aspiration = &session.aspiration;
    payload.push_opt("main_constraint", aspiration.main_constraint.map(Choice::as_str));
    payload.push_opt("hope", aspiration.hope.map(Choice::as_str));
    payload.push_opt("training_need", aspiration.training_need.map(Choice::as_str));
    payload.push_opt("urgent_need", aspiration.urgent_need.map(Choice::as_str));
    payload.push_opt("water_access", aspiration.water_access.map(Choice::as_str));
    payload.push_opt("suggestion", aspiration.suggestion.as_deref());

    payload.attachments = attachment_parts(session.attachment.iter());
    payload
}

fn push_branch(payload: &mut SubmissionPayload, view: &DetailView<'_>) {
    payload.push(view.key(DetailField::Commodity), view.commodity);
    payload.push_opt(view.key(DetailField::LandStatus), view.land_status.map(Choice::as_str));
    payload.push_opt(view.key(DetailField::LandArea), view.land_area);
    payload.push_opt(view.key(DetailField::GrowthPhase), view.growth_phase);
    payload.push_opt(view.key(DetailField::PlantAge), view.plant_age);
    payload.push_opt(view.key(DetailField::Method), view.method);
    payload.push(view.key(DetailField::PlantingDate), normalize_date(view.planting_date));
    payload.push(view.key(DetailField::HarvestDate), normalize_date(view.harvest_date));
    payload.push(view.key(DetailField::DelayReason), view.delay_reason);
    payload.push(view.key(DetailField::Problem), view.problem);
}

fn attachment_parts<'a>(
    attachments: impl ExactSizeIterator<Item = &'a Attachment>,
) -> Vec<AttachmentPart> {
    let indexed = attachments.len() > 1;
    attachments
        .enumerate()
        .map(|(index, attachment)| AttachmentPart {
            field: if indexed {
                format!("{PHOTO_FIELD}_{index}")
            } else {
                PHOTO_FIELD.to_string()
            },
            file_name: attachment.file_name.clone(),
            content_type: attachment.content_type.trim().to_ascii_lowercase(),
            bytes: attachment.bytes.clone(),
        })
        .collect()
}
