//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the survey form flow to Dart via FRB: field edits, step
//!   navigation, location and submission.
//! - Translate core errors into plain envelopes the view layer can render.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - One process-wide form flow backs every call; the lock is never held
//!   while a submission is on the network.

use farmvisit_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    Attachment, Choice, CommodityKind, FormFlow, GeoFix, GeolocationError, HttpTransport,
    LocationRequest, NavigationOutcome, StepId, SubmitConfig, SubmitError, Transport,
    TransportError, ValidationContext, ValidationReport,
};
use log::warn;
use std::sync::{Mutex, MutexGuard, OnceLock};
use std::time::Instant;

static FLOW: OnceLock<Mutex<FormFlow>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// One field-level validation message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    /// Field path, equal to the wire key.
    pub path: String,
    pub message: String,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Optional result value (preview id, JSON snapshot).
    pub value: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, value: Option<String>) -> Self {
        Self {
            ok: true,
            value,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            value: None,
            message: message.into(),
        }
    }
}

/// Step cursor response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepResponse {
    /// Whether the requested move happened as asked.
    pub ok: bool,
    /// Step index (1..=5) the cursor ended on.
    pub step: u8,
    pub route: String,
    /// Blocking notice when an entry was redirected.
    pub notice: Option<String>,
    /// Field messages when the current step failed validation.
    pub issues: Vec<FieldIssue>,
    pub message: String,
}

impl StepResponse {
    fn from_outcome(outcome: NavigationOutcome) -> Self {
        match outcome {
            NavigationOutcome::Entered(step) => Self::at(step, true, "Entered."),
            NavigationOutcome::Redirected { to, notice } => Self {
                notice: Some(notice.message.clone()),
                ..Self::at(to, false, notice.message)
            },
        }
    }

    fn invalid(step: StepId, report: &ValidationReport) -> Self {
        Self {
            issues: to_issues(report),
            ..Self::at(step, false, format!("{} field(s) need attention.", report.len()))
        }
    }

    fn at(step: StepId, ok: bool, message: impl Into<String>) -> Self {
        Self {
            ok,
            step: step.index(),
            route: step.route().to_string(),
            notice: None,
            issues: Vec::new(),
            message: message.into(),
        }
    }
}

/// Location response envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationResponse {
    pub ok: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// The view layer must query the platform and report back through
    /// `location_complete` or `location_failed`.
    pub needs_platform_call: bool,
    pub high_accuracy: bool,
    pub timeout_ms: u64,
    pub maximum_age_ms: u64,
    pub message: String,
}

impl LocationResponse {
    fn fix(fix: GeoFix, message: impl Into<String>) -> Self {
        Self {
            ok: true,
            latitude: Some(fix.latitude),
            longitude: Some(fix.longitude),
            needs_platform_call: false,
            high_accuracy: false,
            timeout_ms: 0,
            maximum_age_ms: 0,
            message: message.into(),
        }
    }

    fn failure(err: &GeolocationError) -> Self {
        Self {
            ok: false,
            latitude: None,
            longitude: None,
            needs_platform_call: false,
            high_accuracy: false,
            timeout_ms: 0,
            maximum_age_ms: 0,
            message: err.alert_message(),
        }
    }
}

/// Submission response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitResponse {
    pub ok: bool,
    /// HTTP status when the server answered.
    pub status: Option<u16>,
    pub issues: Vec<FieldIssue>,
    pub message: String,
}

impl SubmitResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            status: None,
            issues: Vec::new(),
            message: message.into(),
        }
    }
}

/// Sets one form field by its wire key.
///
/// # FFI contract
/// - Sync call, in-memory only.
/// - Unknown keys, inactive-branch keys and unparsable values fail without
///   changing the session.
#[flutter_rust_bridge::frb(sync)]
pub fn session_set_field(key: String, value: String) -> ActionResponse {
    match with_flow(|flow| flow.set_field(key.trim(), &value)) {
        Ok(()) => ActionResponse::success("Field updated.", None),
        Err(err) => ActionResponse::failure(format!("session_set_field failed: {err}")),
    }
}

/// Selects the commodity kind (`food|horticulture|plantation`).
///
/// Switching to another kind discards the previous branch details.
#[flutter_rust_bridge::frb(sync)]
pub fn session_select_commodity(kind: String) -> ActionResponse {
    let Some(kind) = CommodityKind::parse(&kind) else {
        return ActionResponse::failure(format!(
            "session_select_commodity failed: unknown commodity kind `{}`",
            kind.trim()
        ));
    };
    with_flow(|flow| flow.select_commodity(kind));
    ActionResponse::success(format!("{} selected.", kind.title()), None)
}

/// Stages the plot photo and returns its preview id.
///
/// `content_type` may be omitted; it is then guessed from the file name.
#[flutter_rust_bridge::frb(sync)]
pub fn session_set_attachment(
    file_name: String,
    content_type: Option<String>,
    bytes: Vec<u8>,
) -> ActionResponse {
    let content_type = content_type
        .map(|value| value.trim().to_ascii_lowercase())
        .filter(|value| !value.is_empty())
        .or_else(|| Attachment::content_type_for_path(&file_name).map(str::to_string))
        .unwrap_or_default();
    let attachment = Attachment::new(file_name, content_type, bytes);
    match with_flow(|flow| flow.stage_attachment(attachment)) {
        Ok(id) => ActionResponse::success("Photo attached.", Some(id.to_string())),
        Err(err) => ActionResponse::failure(format!("session_set_attachment failed: {err}")),
    }
}

/// Removes the staged photo and releases its preview.
#[flutter_rust_bridge::frb(sync)]
pub fn session_clear_attachment() -> ActionResponse {
    with_flow(FormFlow::clear_attachment);
    ActionResponse::success("Photo removed.", None)
}

/// Current session as pretty JSON, for the review step and diagnostics.
#[flutter_rust_bridge::frb(sync)]
pub fn session_snapshot_json() -> ActionResponse {
    match with_flow(|flow| flow.session().to_json_pretty()) {
        Ok(json) => ActionResponse::success("Snapshot ready.", Some(json)),
        Err(err) => ActionResponse::failure(format!("session_snapshot_json failed: {err}")),
    }
}

/// Discards the session and returns to step 1.
#[flutter_rust_bridge::frb(sync)]
pub fn session_reset() -> ActionResponse {
    with_flow(FormFlow::reset);
    ActionResponse::success("Form cleared.", None)
}

/// Validates one step (1..=5) without moving the cursor.
#[flutter_rust_bridge::frb(sync)]
pub fn step_validate(step: u8) -> StepResponse {
    let Some(step) = StepId::from_index(step) else {
        return unknown_step(step);
    };
    let report = with_flow(|flow| flow.validate_step(step, &ValidationContext::current()));
    if report.is_valid() {
        StepResponse::at(step, true, "Step is complete.")
    } else {
        StepResponse::invalid(step, &report)
    }
}

/// Enters a step through the gate; denied entries redirect with a notice.
#[flutter_rust_bridge::frb(sync)]
pub fn step_enter(step: u8) -> StepResponse {
    let Some(target) = StepId::from_index(step) else {
        return unknown_step(step);
    };
    StepResponse::from_outcome(with_flow(|flow| flow.enter(target)))
}

/// Validates the current step and moves to the next one.
#[flutter_rust_bridge::frb(sync)]
pub fn step_advance() -> StepResponse {
    with_flow(|flow| match flow.advance(&ValidationContext::current()) {
        Ok(outcome) => StepResponse::from_outcome(outcome),
        Err(report) => StepResponse::invalid(flow.current_step(), &report),
    })
}

/// Moves one step back.
#[flutter_rust_bridge::frb(sync)]
pub fn step_back() -> StepResponse {
    match with_flow(FormFlow::back) {
        NavigationOutcome::Entered(step) => StepResponse::at(step, true, "Moved back."),
        redirected => StepResponse::from_outcome(redirected),
    }
}

/// Highest step completed cumulatively from step 1; `0` when none.
#[flutter_rust_bridge::frb(sync)]
pub fn step_last_completed() -> u8 {
    with_flow(|flow| flow.last_completed_step())
}

/// Applies a due post-submission return; returns the new step index.
///
/// The view layer polls this after a successful submission.
#[flutter_rust_bridge::frb(sync)]
pub fn navigation_poll() -> Option<u8> {
    with_flow(|flow| flow.poll(Instant::now())).map(StepId::index)
}

/// Starts a location request.
///
/// A recent fix is applied immediately; otherwise the response asks the
/// view layer to query the platform with the returned options.
#[flutter_rust_bridge::frb(sync)]
pub fn location_begin() -> LocationResponse {
    match with_flow(|flow| flow.begin_location(Instant::now())) {
        Ok(LocationRequest::Cached(fix)) => LocationResponse::fix(fix, "Using recent location."),
        Ok(LocationRequest::Started(options)) => LocationResponse {
            ok: true,
            latitude: None,
            longitude: None,
            needs_platform_call: true,
            high_accuracy: options.high_accuracy,
            timeout_ms: duration_ms(options.timeout),
            maximum_age_ms: duration_ms(options.maximum_age),
            message: "Requesting location.".to_string(),
        },
        Err(err) => LocationResponse::failure(&err),
    }
}

/// Reports a platform position for the outstanding request.
#[flutter_rust_bridge::frb(sync)]
pub fn location_complete(
    latitude: f64,
    longitude: f64,
    accuracy_m: Option<f64>,
) -> LocationResponse {
    let fix = GeoFix {
        latitude,
        longitude,
        accuracy_m,
    };
    finish_location(Ok(fix))
}

/// Reports a platform failure (1 denied, 2 unavailable, 3 timeout).
#[flutter_rust_bridge::frb(sync)]
pub fn location_failed(code: u16, message: String) -> LocationResponse {
    finish_location(Err(GeolocationError::from_platform_code(code, &message)))
}

/// Validates and submits the session to the configured backend.
///
/// # FFI contract
/// - Async call (FRB worker thread); performs blocking network I/O.
/// - Configuration is read from `SURVEY_API_BASE_URL` and
///   `SURVEY_API_TIMEOUT_SECS`.
/// - Never panics; a second call while one is in flight is rejected.
pub fn submit_session() -> SubmitResponse {
    let transport = match SubmitConfig::from_env()
        .map_err(|err| err.to_string())
        .and_then(|config| HttpTransport::new(&config).map_err(|err| err.to_string()))
    {
        Ok(transport) => transport,
        Err(err) => {
            warn!("event=ffi_submit module=ffi status=error reason=config");
            return SubmitResponse::failure(format!("submit_session failed: {err}"));
        }
    };
    submit_with(&transport, &ValidationContext::current())
}

fn submit_with<T: Transport + ?Sized>(transport: &T, ctx: &ValidationContext) -> SubmitResponse {
    let ticket = match with_flow(|flow| flow.begin_submission(ctx)) {
        Ok(ticket) => ticket,
        Err(err) => return submit_failure(err),
    };
    let result = transport.send(ticket.payload());
    match with_flow(|flow| flow.finish_submission(ticket, result, Instant::now())) {
        Ok(receipt) => SubmitResponse {
            ok: true,
            status: Some(receipt.status),
            issues: Vec::new(),
            message: "Survey submitted.".to_string(),
        },
        Err(err) => submit_failure(err),
    }
}

fn submit_failure(err: SubmitError) -> SubmitResponse {
    match err {
        SubmitError::Invalid(report) => SubmitResponse {
            issues: to_issues(&report),
            ..SubmitResponse::failure(format!(
                "{} field(s) need attention before submitting.",
                report.len()
            ))
        },
        SubmitError::Transport(TransportError::Status { status, .. }) => {
            SubmitResponse {
                status: Some(status),
                ..SubmitResponse::failure(format!(
                    "Submission failed (status {status}). Your answers are kept; try again."
                ))
            }
        }
        other => SubmitResponse::failure(format!("Submission failed: {other}")),
    }
}

fn finish_location(result: Result<GeoFix, GeolocationError>) -> LocationResponse {
    match with_flow(|flow| flow.complete_location(result, Instant::now())) {
        Ok(fix) => LocationResponse::fix(fix, "Location captured."),
        Err(err) => LocationResponse::failure(&err),
    }
}

fn unknown_step(step: u8) -> StepResponse {
    StepResponse {
        ok: false,
        step: 0,
        route: String::new(),
        notice: None,
        issues: Vec::new(),
        message: format!("unknown survey step: {step}"),
    }
}

fn to_issues(report: &ValidationReport) -> Vec<FieldIssue> {
    report
        .field_errors()
        .into_iter()
        .map(|(path, message)| FieldIssue { path, message })
        .collect()
}

fn duration_ms(duration: std::time::Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn with_flow<R>(f: impl FnOnce(&mut FormFlow) -> R) -> R {
    let mut guard = lock_flow();
    f(&mut guard)
}

fn lock_flow() -> MutexGuard<'static, FormFlow> {
    FLOW.get_or_init(|| Mutex::new(FormFlow::new()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, init_logging, location_begin, location_complete, location_failed,
        navigation_poll, ping, session_clear_attachment, session_reset, session_select_commodity,
        session_set_attachment, session_set_field, session_snapshot_json, step_advance,
        step_back, step_enter, step_last_completed, step_validate, submit_with,
    };
    use farmvisit_core::{
        SubmissionPayload, SubmitReceipt, Transport, TransportError, ValidationContext,
    };
    use std::sync::{Mutex, MutexGuard};

    static SERIAL: Mutex<()> = Mutex::new(());

    fn serial() -> MutexGuard<'static, ()> {
        let guard = SERIAL.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        assert!(session_reset().ok);
        guard
    }

    struct AcceptAll;

    impl Transport for AcceptAll {
        fn send(&self, payload: &SubmissionPayload) -> Result<SubmitReceipt, TransportError> {
            assert!(payload.contains("food_commodity"));
            Ok(SubmitReceipt {
                status: 201,
                body: String::new(),
            })
        }
    }

    struct Offline;

    impl Transport for Offline {
        fn send(&self, _payload: &SubmissionPayload) -> Result<SubmitReceipt, TransportError> {
            Err(TransportError::Status {
                status: 502,
                body: String::new(),
            })
        }
    }

    fn fill_valid_session() {
        for (key, value) in [
            ("officer_name", "Sari"),
            ("visit_date", "2026-03-09"),
            ("farmer_name", "Pak Darmo"),
            ("farmer_group", "Tani Makmur"),
            ("village", "Karangsari"),
            ("district", "Banyumas"),
            ("latitude", "-7.4034"),
            ("longitude", "109.2345"),
        ] {
            assert!(session_set_field(key.to_string(), value.to_string()).ok);
        }
        assert!(session_select_commodity("food".to_string()).ok);
        for (key, value) in [
            ("food_commodity", "padi"),
            ("food_land_status", "owned"),
            ("food_land_area", "0.5"),
            ("food_growth_phase", "ripening"),
            ("food_plant_age", "90"),
            ("food_method", "sri"),
            ("food_planting_date", "2026-01-02"),
            ("food_harvest_date", "2026-04-02"),
            ("food_delay_reason", "-"),
            ("food_post_harvest", "harga gabah turun"),
            ("weather_condition", "cerah"),
            ("weather_impact", "baik"),
            ("main_constraint", "limited_capital"),
            ("hope", "credit_access"),
            ("training_need", "farm_management"),
            ("urgent_need", "machinery"),
            ("water_access", "sufficient"),
        ] {
            let response = session_set_field(key.to_string(), value.to_string());
            assert!(response.ok, "{key}: {}", response.message);
        }
        let photo = session_set_attachment("plot.jpg".to_string(), None, vec![0xFF, 0xD8, 1]);
        assert!(photo.ok, "{}", photo.message);
    }

    fn ctx() -> ValidationContext {
        ValidationContext::current()
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn set_field_reports_unknown_and_inactive_keys() {
        let _guard = serial();
        assert!(!session_set_field("nickname".to_string(), "x".to_string()).ok);
        let inactive = session_set_field("plantation_commodity".to_string(), "kopi".to_string());
        assert!(!inactive.ok);
        assert!(inactive.message.contains("plantation_commodity"));
        assert!(!session_select_commodity("fisheries".to_string()).ok);
    }

    #[test]
    fn early_entry_redirects_with_notice() {
        let _guard = serial();
        let response = step_enter(4);
        assert!(!response.ok);
        assert_eq!(response.step, 1);
        assert_eq!(response.route, "/survey/identitas");
        assert!(response.notice.unwrap().contains("Identitas"));
        assert!(!step_enter(9).ok);
    }

    #[test]
    fn advance_reports_field_issues() {
        let _guard = serial();
        let response = step_advance();
        assert!(!response.ok);
        assert_eq!(response.step, 1);
        assert!(response.issues.iter().any(|issue| issue.path == "farmer_name"));
        assert_eq!(step_last_completed(), 0);
        assert!(!step_validate(1).ok);
    }

    #[test]
    fn valid_session_walks_and_submits() {
        let _guard = serial();
        fill_valid_session();
        assert_eq!(step_last_completed(), 4);
        assert!(step_enter(5).ok);
        assert_eq!(step_back().step, 4);

        let snapshot = session_snapshot_json();
        assert!(snapshot.value.unwrap().contains("\"kind\": \"food\""));

        let response = submit_with(&AcceptAll, &ctx());
        assert!(response.ok, "{}", response.message);
        assert_eq!(response.status, Some(201));
        assert_eq!(step_last_completed(), 0);
        assert_eq!(navigation_poll(), None);
    }

    #[test]
    fn back_into_cleared_step_is_redirected() {
        let _guard = serial();
        fill_valid_session();
        assert!(step_enter(4).ok);
        assert!(session_set_field("commodity_kind".to_string(), String::new()).ok);

        let response = step_back();
        assert!(!response.ok);
        assert_eq!(response.step, 2);
        assert!(response.notice.is_some());
    }

    #[test]
    fn failed_submission_keeps_answers() {
        let _guard = serial();
        fill_valid_session();
        let response = submit_with(&Offline, &ctx());
        assert!(!response.ok);
        assert_eq!(response.status, Some(502));
        assert_eq!(step_last_completed(), 4);
    }

    #[test]
    fn invalid_submission_lists_issues() {
        let _guard = serial();
        let response = submit_with(&AcceptAll, &ctx());
        assert!(!response.ok);
        assert!(response.issues.iter().any(|issue| issue.path == "photo"));
    }

    #[test]
    fn attachment_rejects_unknown_type() {
        let _guard = serial();
        let response = session_set_attachment("notes.txt".to_string(), None, vec![1, 2]);
        assert!(!response.ok);
        let accepted = session_set_attachment("plot.PNG".to_string(), None, vec![1, 2]);
        assert!(accepted.value.is_some());
        assert!(session_clear_attachment().ok);
    }

    #[test]
    fn location_round_trip() {
        let _guard = serial();
        let first = location_begin();
        if first.needs_platform_call {
            assert!(first.timeout_ms > 0);
            assert!(!location_begin().ok);
            let failed = location_failed(1, String::new());
            assert!(!failed.ok);
            assert!(failed.message.contains("denied"));

            assert!(location_begin().needs_platform_call);
            let fix = location_complete(-7.4034, 109.2345, Some(12.0));
            assert!(fix.ok);
        }
        let cached = location_begin();
        assert!(cached.ok);
        assert!(!cached.needs_platform_call);
        assert_eq!(cached.latitude, Some(-7.4034));
    }
}
