mod common;

use common::{ctx, photo, valid_session};
use farmvisit_core::{
    Attachment, Choice, CommodityKind, FormFlow, GeoFix, GeolocationError, GeolocationOptions,
    GeolocationProvider, LocationRequest, StepId, SubmissionPayload, SubmitError, SubmitReceipt,
    Transport, TransportError,
};
use std::cell::{Cell, RefCell};
use std::time::{Duration, Instant};

#[derive(Default)]
struct RecordingTransport {
    sent: RefCell<Vec<SubmissionPayload>>,
}

impl Transport for RecordingTransport {
    fn send(&self, payload: &SubmissionPayload) -> Result<SubmitReceipt, TransportError> {
        self.sent.borrow_mut().push(payload.clone());
        Ok(SubmitReceipt {
            status: 201,
            body: "{\"id\":\"abc\"}".to_string(),
        })
    }
}

struct RejectingTransport;

impl Transport for RejectingTransport {
    fn send(&self, _payload: &SubmissionPayload) -> Result<SubmitReceipt, TransportError> {
        Err(TransportError::Status {
            status: 503,
            body: "maintenance".to_string(),
        })
    }
}

struct FixedProvider {
    calls: Cell<u32>,
}

impl GeolocationProvider for FixedProvider {
    fn current_position(&self, _options: &GeolocationOptions) -> Result<GeoFix, GeolocationError> {
        self.calls.set(self.calls.get() + 1);
        Ok(GeoFix::new(-7.4034, 109.2345))
    }
}

fn ready_flow(kind: CommodityKind) -> FormFlow {
    let mut session = valid_session(kind);
    session.clear_attachment();
    let mut flow = FormFlow::with_session(session);
    flow.stage_attachment(photo()).expect("photo is acceptable");
    flow
}

#[test]
fn payload_carries_exactly_the_active_branch() {
    for (kind, prefix) in [
        (CommodityKind::Food, "food_"),
        (CommodityKind::Horticulture, "horticulture_"),
        (CommodityKind::Plantation, "plantation_"),
    ] {
        let mut flow = ready_flow(kind);
        let transport = RecordingTransport::default();
        flow.submit(&transport, &ctx()).expect("submission succeeds");

        let sent = transport.sent.borrow();
        let payload = &sent[0];
        assert_eq!(payload.get("commodity_kind"), Some(kind.as_str()));
        for other in ["food_", "horticulture_", "plantation_"] {
            let present = payload.keys().any(|key| key.starts_with(other));
            assert_eq!(present, other == prefix, "{kind}: prefix {other}");
        }
        assert_eq!(payload.attachments().len(), 1);
        assert_eq!(payload.attachments()[0].field, "photo");
        assert_eq!(payload.get("has_pest"), Some("false"));
        assert!(!payload.contains("pest_type"));
    }
}

#[test]
fn success_resets_and_schedules_return() {
    let mut flow = ready_flow(CommodityKind::Food);
    flow.enter(StepId::Review);
    assert_eq!(flow.previews().live_count(), 1);

    let before = Instant::now();
    let receipt = flow
        .submit(&RecordingTransport::default(), &ctx())
        .expect("submission succeeds");
    assert_eq!(receipt.status, 201);

    assert_eq!(flow.session(), &farmvisit_core::FormSession::new());
    assert_eq!(flow.previews().live_count(), 0);
    assert!(flow.navigator().has_pending_return());
    assert_eq!(flow.current_step(), StepId::Review);

    assert_eq!(flow.poll(before), None);
    assert_eq!(
        flow.poll(Instant::now() + Duration::from_secs(3)),
        Some(StepId::Identity)
    );
    assert_eq!(flow.current_step(), StepId::Identity);
    assert!(!flow.is_submitting());
}

#[test]
fn transport_failure_keeps_everything() {
    let mut flow = ready_flow(CommodityKind::Horticulture);
    let snapshot = flow.session().clone();

    let err = flow
        .submit(&RejectingTransport, &ctx())
        .expect_err("server rejects");
    assert!(matches!(
        err,
        SubmitError::Transport(TransportError::Status { status: 503, .. })
    ));
    assert_eq!(flow.session(), &snapshot);
    assert_eq!(flow.previews().live_count(), 1);
    assert!(!flow.navigator().has_pending_return());
    assert!(!flow.is_submitting());

    flow.submit(&RecordingTransport::default(), &ctx())
        .expect("retry succeeds");
}

#[test]
fn second_submission_is_rejected_while_in_flight() {
    let mut flow = ready_flow(CommodityKind::Plantation);
    let ticket = flow.begin_submission(&ctx()).expect("valid session");
    assert!(flow.is_submitting());
    assert!(matches!(
        flow.begin_submission(&ctx()),
        Err(SubmitError::AlreadyInFlight)
    ));

    let receipt = SubmitReceipt {
        status: 200,
        body: String::new(),
    };
    flow.finish_submission(ticket, Ok(receipt), Instant::now())
        .expect("finish succeeds");
    assert!(!flow.is_submitting());
}

#[test]
fn reset_mid_submission_keeps_ticket_outstanding() {
    let mut flow = ready_flow(CommodityKind::Food);
    let first = flow.begin_submission(&ctx()).expect("valid session");

    flow.reset();
    assert!(flow.is_submitting());
    flow.set_field("officer_name", "Budi Santoso").unwrap();
    flow.set_field("farmer_name", "Bu Ratmi").unwrap();
    flow.stage_attachment(photo()).unwrap();
    assert!(matches!(
        flow.begin_submission(&ctx()),
        Err(SubmitError::AlreadyInFlight)
    ));

    let receipt = SubmitReceipt {
        status: 201,
        body: String::new(),
    };
    flow.finish_submission(first, Ok(receipt), Instant::now())
        .expect("finish succeeds");
    assert!(!flow.is_submitting());
    assert_eq!(flow.session().identity.officer_name, "Budi Santoso");
    assert!(flow.session().attachment.is_some());
    assert_eq!(flow.previews().live_count(), 1);
    assert!(!flow.navigator().has_pending_return());

    match flow.begin_submission(&ctx()) {
        Err(SubmitError::Invalid(report)) => assert!(report.has_issue("village")),
        other => panic!("expected invalid refill, got {other:?}"),
    }
}

#[test]
fn invalid_session_is_never_sent() {
    let mut flow = FormFlow::new();
    let transport = RecordingTransport::default();
    match flow.submit(&transport, &ctx()) {
        Err(SubmitError::Invalid(report)) => assert!(report.has_issue("officer_name")),
        other => panic!("expected invalid, got {other:?}"),
    }
    assert!(transport.sent.borrow().is_empty());
    assert!(!flow.is_submitting());
}

#[test]
fn replacing_or_clearing_photo_releases_preview() {
    let mut flow = FormFlow::new();
    let first = flow.stage_attachment(photo()).unwrap();
    let second = flow
        .stage_attachment(Attachment::new("plot.png", "image/png", vec![9, 9, 9]))
        .unwrap();

    assert_eq!(flow.previews().live_count(), 1);
    assert!(flow.previews().get(first).is_none());
    assert_eq!(flow.previews().get(second).as_deref(), Some(&[9u8, 9, 9][..]));
    assert_eq!(flow.preview_id(), Some(second));

    flow.clear_attachment();
    assert_eq!(flow.previews().live_count(), 0);
    assert!(flow.session().attachment.is_none());

    flow.stage_attachment(photo()).unwrap();
    flow.reset();
    assert_eq!(flow.previews().live_count(), 0);
}

#[test]
fn rejected_photo_keeps_previous_one() {
    let mut flow = FormFlow::new();
    let id = flow.stage_attachment(photo()).unwrap();
    assert!(flow
        .stage_attachment(Attachment::new("scan.gif", "image/gif", vec![1]))
        .is_err());
    assert_eq!(flow.preview_id(), Some(id));
    assert_eq!(
        flow.session().attachment.as_ref().map(|a| a.file_name.as_str()),
        Some("sawah.jpg")
    );
}

#[test]
fn location_fix_fills_coordinates_and_is_cached() {
    let mut flow = FormFlow::new();
    let provider = FixedProvider { calls: Cell::new(0) };
    let now = Instant::now();

    flow.locate(&provider, now).expect("fix");
    assert_eq!(flow.session().identity.latitude, "-7.403400");
    assert_eq!(flow.session().identity.longitude, "109.234500");

    flow.set_field("latitude", "").unwrap();
    let request = flow.begin_location(now + Duration::from_secs(5)).unwrap();
    assert!(matches!(request, LocationRequest::Cached(_)));
    assert_eq!(flow.session().identity.latitude, "-7.403400");
    assert_eq!(provider.calls.get(), 1);
}

#[test]
fn location_failure_leaves_manual_entry_intact() {
    let mut flow = FormFlow::new();
    flow.set_field("latitude", "-6.2").unwrap();
    let now = Instant::now();

    assert!(matches!(
        flow.begin_location(now).unwrap(),
        LocationRequest::Started(_)
    ));
    assert_eq!(
        flow.begin_location(now),
        Err(GeolocationError::RequestPending)
    );
    let err = flow
        .complete_location(Err(GeolocationError::PermissionDenied), now)
        .unwrap_err();
    assert!(err.alert_message().contains("manually"));
    assert_eq!(flow.session().identity.latitude, "-6.2");
    assert!(flow.begin_location(now).is_ok());
}
