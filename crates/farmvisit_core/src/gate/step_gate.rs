//! Step gate: which step routes a session may enter.
//!
//! # Invariants
//! - One predicate, `step_complete`, drives both `can_access_step` and
//!   `last_completed_step`, so the two cannot drift apart.
//! - Access is monotonic: if step N is denied, every later step is denied.
//! - Gating reads only the session; there is no hidden state.

use crate::model::session::FormSession;
use crate::model::step::StepId;

/// Steps whose completeness gates a later step.
const GATED_STEPS: [StepId; 4] = [
    StepId::Identity,
    StepId::Commodity,
    StepId::CommodityDetail,
    StepId::Aspiration,
];

/// Whether `step` counts as complete for gating purposes.
///
/// - Identity: officer, visit date, farmer, group, village and district are
///   non-blank.
/// - Commodity: a kind is selected.
/// - CommodityDetail: only the kind-specific subset (commodity name, land
///   status, land area, growth phase) is present. The full step-3 schema is
///   enforced by `Navigator::advance`, not here.
/// - Aspiration: all five selections are made.
/// - Review: never complete; it is the terminal step.
pub fn step_complete(step: StepId, session: &FormSession) -> bool {
    match step {
        StepId::Identity => session
            .identity
            .gate_fields()
            .iter()
            .all(|value| !value.trim().is_empty()),
        StepId::Commodity => session.commodity_kind().is_some(),
        StepId::CommodityDetail => session.commodity.as_ref().is_some_and(|detail| {
            let view = detail.view();
            !view.commodity.trim().is_empty()
                && view.land_status.is_some()
                && view.land_area.is_some_and(f64::is_finite)
                && view.growth_phase.is_some()
        }),
        StepId::Aspiration => session.aspiration.selections_complete(),
        StepId::Review => false,
    }
}

/// Whether a navigation to `step` is authorized: every earlier step must be
/// complete. Step 1 is always accessible.
pub fn can_access_step(step: StepId, session: &FormSession) -> bool {
    GATED_STEPS
        .iter()
        .take_while(|gated| **gated < step)
        .all(|gated| step_complete(*gated, session))
}

/// Index-based variant of `can_access_step`; unknown indices are denied.
pub fn can_access_step_index(index: u8, session: &FormSession) -> bool {
    StepId::from_index(index).is_some_and(|step| can_access_step(step, session))
}

/// Highest step index completed cumulatively from step 1; `0` when step 1 is
/// incomplete.
pub fn last_completed_step(session: &FormSession) -> u8 {
    GATED_STEPS
        .iter()
        .take_while(|step| step_complete(**step, session))
        .last()
        .map_or(0, |step| step.index())
}

/// First step the session still has to complete, i.e. the redirect target for
/// denied navigations.
pub fn resume_step(session: &FormSession) -> StepId {
    StepId::from_index(last_completed_step(session) + 1).unwrap_or(StepId::Review)
}

#[cfg(test)]
mod tests {
    use super::{can_access_step, can_access_step_index, last_completed_step, resume_step};
    use crate::model::commodity::CommodityKind;
    use crate::model::session::FormSession;
    use crate::model::step::StepId;

    fn identity_complete() -> FormSession {
        let mut session = FormSession::new();
        for (key, value) in [
            ("officer_name", "Sari"),
            ("visit_date", "2026-03-09"),
            ("farmer_name", "Pak Darmo"),
            ("farmer_group", "Tani Makmur"),
            ("village", "Karangsari"),
            ("district", "Banyumas"),
        ] {
            session.set_field(key, value).expect("identity field");
        }
        session
    }

    #[test]
    fn empty_session_only_reaches_step_one() {
        let session = FormSession::new();
        assert!(can_access_step(StepId::Identity, &session));
        assert!(!can_access_step(StepId::Commodity, &session));
        assert_eq!(last_completed_step(&session), 0);
        assert_eq!(resume_step(&session), StepId::Identity);
    }

    #[test]
    fn blank_identity_field_blocks_step_two() {
        let mut session = identity_complete();
        session.set_field("village", "   ").unwrap();
        assert!(!can_access_step(StepId::Commodity, &session));
    }

    #[test]
    fn identity_without_kind_completes_step_one_only() {
        let session = identity_complete();
        assert_eq!(last_completed_step(&session), 1);
        assert!(can_access_step(StepId::Commodity, &session));
        assert!(!can_access_step(StepId::CommodityDetail, &session));
        assert_eq!(resume_step(&session), StepId::Commodity);
    }

    #[test]
    fn step_four_needs_only_the_detail_subset() {
        let mut session = identity_complete();
        session.select_commodity(CommodityKind::Horticulture);
        assert!(can_access_step(StepId::CommodityDetail, &session));
        assert!(!can_access_step(StepId::Aspiration, &session));

        session.set_field("horticulture_commodity", "cabai").unwrap();
        session.set_field("horticulture_land_status", "rented").unwrap();
        session.set_field("horticulture_land_area", "0.4").unwrap();
        session.set_field("horticulture_growth_phase", "flowering").unwrap();

        // Dates, method, photo, pest and weather are still missing.
        assert!(can_access_step(StepId::Aspiration, &session));
        assert_eq!(last_completed_step(&session), 3);
    }

    #[test]
    fn index_contract_denies_unknown_steps() {
        let session = identity_complete();
        assert!(can_access_step_index(1, &session));
        assert!(can_access_step_index(2, &session));
        assert!(!can_access_step_index(0, &session));
        assert!(!can_access_step_index(9, &session));
    }
}
