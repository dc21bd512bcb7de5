mod common;

use common::{ctx, identity_only, set_all, valid_session};
use farmvisit_core::{
    can_access_step, last_completed_step, validate_step, CommodityKind, FormSession,
    NavigationOutcome, Navigator, StepId,
};

fn build(identity: bool, kind: bool, detail: bool, aspiration: bool) -> FormSession {
    let mut session = if identity {
        identity_only()
    } else {
        FormSession::new()
    };
    if kind {
        session.select_commodity(CommodityKind::Food);
        if detail {
            set_all(
                &mut session,
                &[
                    ("food_commodity", "jagung"),
                    ("food_land_status", "rented"),
                    ("food_land_area", "1.5"),
                    ("food_growth_phase", "vegetative"),
                ],
            );
        }
    }
    if aspiration {
        set_all(
            &mut session,
            &[
                ("main_constraint", "low_selling_price"),
                ("hope", "market_access"),
                ("training_need", "post_harvest"),
                ("urgent_need", "seeds"),
                ("water_access", "limited"),
            ],
        );
    }
    session
}

#[test]
fn access_is_monotonic_and_matches_last_completed() {
    for mask in 0u8..16 {
        let session = build(mask & 1 != 0, mask & 2 != 0, mask & 4 != 0, mask & 8 != 0);
        let last = last_completed_step(&session);
        let mut denied = false;
        for step in StepId::ALL {
            let allowed = can_access_step(step, &session);
            assert!(
                !(denied && allowed),
                "mask {mask:04b}: step {} allowed after a denied step",
                step.index()
            );
            denied |= !allowed;
            assert_eq!(
                allowed,
                step.index() <= last + 1,
                "mask {mask:04b}: step {} vs last completed {last}",
                step.index()
            );
        }
    }
}

#[test]
fn skipping_commodity_redirects_to_step_two() {
    let session = identity_only();
    assert_eq!(last_completed_step(&session), 1);

    let mut navigator = Navigator::new();
    let outcome = navigator
        .enter_route("/survey/detail-komoditas", &session)
        .expect("known route");
    match outcome {
        NavigationOutcome::Redirected { to, notice } => {
            assert_eq!(to, StepId::Commodity);
            assert_eq!(notice.required_step, StepId::Commodity);
            assert!(notice.message.contains("Komoditas"));
        }
        other => panic!("expected redirect, got {other:?}"),
    }
    assert_eq!(navigator.current(), StepId::Commodity);
}

#[test]
fn empty_session_always_lands_on_identity() {
    let session = FormSession::new();
    let mut navigator = Navigator::new();
    for step in StepId::ALL {
        assert_eq!(navigator.enter(step, &session).step(), StepId::Identity);
    }
}

#[test]
fn gate_subset_lets_aspiration_open_before_step_three_validates() {
    let session = build(true, true, true, false);

    assert!(can_access_step(StepId::Aspiration, &session));
    assert!(!validate_step(StepId::CommodityDetail, &session, &ctx()).is_valid());

    let mut navigator = Navigator::new();
    navigator.enter(StepId::CommodityDetail, &session);
    let report = navigator
        .advance(&session, &ctx())
        .expect_err("full step schema still applies on advance");
    assert!(report.has_issue("food_planting_date"));
    assert_eq!(navigator.current(), StepId::CommodityDetail);
}

#[test]
fn review_opens_only_with_all_aspiration_selections() {
    let mut session = build(true, true, true, true);
    assert!(can_access_step(StepId::Review, &session));

    session.set_field("hope", "").unwrap();
    assert!(!can_access_step(StepId::Review, &session));
    assert!(can_access_step(StepId::Aspiration, &session));
}

#[test]
fn advance_walks_a_valid_session_to_review() {
    let session = valid_session(CommodityKind::Plantation);
    let mut navigator = Navigator::new();
    for expected in [
        StepId::Commodity,
        StepId::CommodityDetail,
        StepId::Aspiration,
        StepId::Review,
    ] {
        let outcome = navigator.advance(&session, &ctx()).expect("step is valid");
        assert_eq!(outcome, NavigationOutcome::Entered(expected));
    }
    assert_eq!(
        navigator.back(&session),
        NavigationOutcome::Entered(StepId::Aspiration)
    );
}

#[test]
fn back_into_invalidated_step_redirects() {
    let mut session = valid_session(CommodityKind::Food);
    let mut navigator = Navigator::new();
    for _ in 0..3 {
        navigator.advance(&session, &ctx()).expect("step is valid");
    }
    assert_eq!(navigator.current(), StepId::Aspiration);

    session.set_field("commodity_kind", "").unwrap();
    match navigator.back(&session) {
        NavigationOutcome::Redirected { to, notice } => {
            assert_eq!(to, StepId::Commodity);
            assert_eq!(notice.required_step, StepId::Commodity);
        }
        other => panic!("expected redirect, got {other:?}"),
    }
    assert_eq!(navigator.current(), StepId::Commodity);
    assert!(can_access_step(navigator.current(), &session));
}

#[test]
fn switching_kind_drops_branch_progress() {
    let mut session = build(true, true, true, false);
    assert_eq!(last_completed_step(&session), 3);

    session.select_commodity(CommodityKind::Horticulture);
    assert_eq!(last_completed_step(&session), 2);
    assert!(session.set_field("food_land_area", "2").is_err());
}
