//! Form flow use-case service.
//!
//! # Responsibility
//! - Own one survey session together with its step cursor, photo preview and
//!   location state.
//! - Run the submission lifecycle: validate, assemble, send, then reset or
//!   retain.
//!
//! # Invariants
//! - At most one submission is in flight, including across `reset`.
//! - Settling a ticket only touches the session it was taken from.
//! - A failed submission leaves the session untouched.
//! - A successful submission resets the session, releases the preview and
//!   schedules the return to step 1.

use crate::gate::{last_completed_step, NavigationOutcome, Navigator};
use crate::geo::{
    apply_fix, GeoFix, GeolocationError, GeolocationProvider, LocationRequest, Locator,
};
use crate::model::attachment::{Attachment, AttachmentError};
use crate::model::commodity::CommodityKind;
use crate::model::session::FormSession;
use crate::model::step::StepId;
use crate::model::FieldError;
use crate::preview::{PreviewHandle, PreviewId, PreviewStore};
use crate::schema::{validate_session, validate_step, ValidationContext, ValidationReport};
use crate::submission::{assemble, SubmissionPayload, SubmitReceipt, Transport, TransportError};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Submission lifecycle failure.
#[derive(Debug)]
pub enum SubmitError {
    /// The composed schema rejected the session; nothing was sent.
    Invalid(ValidationReport),
    /// Another submission has not finished yet.
    AlreadyInFlight,
    /// The transport failed; the session is retained for retry.
    Transport(TransportError),
}

impl Display for SubmitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(report) => write!(f, "survey is incomplete: {report}"),
            Self::AlreadyInFlight => write!(f, "a submission is already in progress"),
            Self::Transport(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SubmitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(report) => Some(report),
            Self::AlreadyInFlight => None,
            Self::Transport(err) => Some(err),
        }
    }
}

impl From<TransportError> for SubmitError {
    fn from(value: TransportError) -> Self {
        Self::Transport(value)
    }
}

/// Payload snapshot for one in-flight submission.
///
/// Obtained from `FormFlow::begin_submission` and consumed by
/// `FormFlow::finish_submission`.
#[derive(Debug)]
pub struct SubmissionTicket {
    id: u64,
    generation: u64,
    payload: SubmissionPayload,
    started_at: Instant,
}

impl SubmissionTicket {
    pub fn payload(&self) -> &SubmissionPayload {
        &self.payload
    }
}

/// One survey form from first step to submission.
#[derive(Debug, Default)]
pub struct FormFlow {
    session: FormSession,
    navigator: Navigator,
    previews: PreviewStore,
    preview: Option<PreviewHandle>,
    locator: Locator,
    /// Id of the outstanding ticket.
    in_flight: Option<u64>,
    next_ticket: u64,
    /// Bumped by every session reset.
    generation: u64,
}

impl FormFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resumes a flow from an existing session (e.g. a saved draft).
    pub fn with_session(session: FormSession) -> Self {
        Self {
            session,
            ..Self::default()
        }
    }

    pub fn session(&self) -> &FormSession {
        &self.session
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn current_step(&self) -> StepId {
        self.navigator.current()
    }

    pub fn previews(&self) -> &PreviewStore {
        &self.previews
    }

    pub fn preview_id(&self) -> Option<PreviewId> {
        self.preview.as_ref().map(PreviewHandle::id)
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn set_field(&mut self, key: &str, value: &str) -> Result<(), FieldError> {
        self.session.set_field(key, value)
    }

    pub fn select_commodity(&mut self, kind: CommodityKind) {
        self.session.select_commodity(kind);
    }

    /// Stages a photo and replaces the previous preview.
    ///
    /// # Errors
    /// Rejects photos violating size or type constraints; the previously
    /// staged photo stays in place.
    pub fn stage_attachment(
        &mut self,
        attachment: Attachment,
    ) -> Result<PreviewId, AttachmentError> {
        attachment.check()?;
        let handle = self.previews.acquire(&attachment.bytes);
        let id = handle.id();
        self.preview = Some(handle);
        info!(
            "event=attachment_stage module=flow status=ok size={} content_type={}",
            attachment.size(),
            attachment.content_type
        );
        self.session.set_attachment(attachment);
        Ok(id)
    }

    pub fn clear_attachment(&mut self) {
        self.preview = None;
        self.session.clear_attachment();
    }

    pub fn validate_step(&self, step: StepId, ctx: &ValidationContext) -> ValidationReport {
        validate_step(step, &self.session, ctx)
    }

    pub fn last_completed_step(&self) -> u8 {
        last_completed_step(&self.session)
    }

    pub fn enter(&mut self, step: StepId) -> NavigationOutcome {
        self.navigator.enter(step, &self.session)
    }

    pub fn advance(
        &mut self,
        ctx: &ValidationContext,
    ) -> Result<NavigationOutcome, ValidationReport> {
        self.navigator.advance(&self.session, ctx)
    }

    pub fn back(&mut self) -> NavigationOutcome {
        self.navigator.back(&self.session)
    }

    /// Applies a due post-submission return to step 1.
    pub fn poll(&mut self, now: Instant) -> Option<StepId> {
        self.navigator.poll(now)
    }

    /// Starts a location request, applying a cached fix immediately.
    pub fn begin_location(&mut self, now: Instant) -> Result<LocationRequest, GeolocationError> {
        let request = self.locator.begin(now)?;
        if let LocationRequest::Cached(fix) = request {
            apply_fix(&mut self.session, &fix);
        }
        Ok(request)
    }

    /// Finishes the outstanding location request; a fix is written into the
    /// session, a failure leaves the coordinates as they were.
    pub fn complete_location(
        &mut self,
        result: Result<GeoFix, GeolocationError>,
        now: Instant,
    ) -> Result<GeoFix, GeolocationError> {
        let fix = self.locator.complete(result, now)?;
        apply_fix(&mut self.session, &fix);
        Ok(fix)
    }

    /// Acquires a position from a synchronous provider.
    pub fn locate<P: GeolocationProvider + ?Sized>(
        &mut self,
        provider: &P,
        now: Instant,
    ) -> Result<GeoFix, GeolocationError> {
        let fix = self.locator.locate(provider, now)?;
        apply_fix(&mut self.session, &fix);
        Ok(fix)
    }

    /// Validates the whole session and snapshots the payload.
    ///
    /// # Errors
    /// - `AlreadyInFlight` while a previous ticket is unfinished.
    /// - `Invalid` when the composed schema fails.
    pub fn begin_submission(
        &mut self,
        ctx: &ValidationContext,
    ) -> Result<SubmissionTicket, SubmitError> {
        if self.in_flight.is_some() {
            warn!("event=submission module=flow status=rejected reason=in_flight");
            return Err(SubmitError::AlreadyInFlight);
        }
        let report = validate_session(&self.session, ctx);
        if !report.is_valid() {
            info!(
                "event=submission module=flow status=invalid issues={}",
                report.len()
            );
            return Err(SubmitError::Invalid(report));
        }

        let payload = assemble(&self.session);
        info!(
            "event=submission module=flow status=start fields={} attachments={}",
            payload.fields().len(),
            payload.attachments().len()
        );
        self.next_ticket += 1;
        self.in_flight = Some(self.next_ticket);
        Ok(SubmissionTicket {
            id: self.next_ticket,
            generation: self.generation,
            payload,
            started_at: Instant::now(),
        })
    }

    /// Records the transport outcome of `ticket`.
    ///
    /// On success the session resets and the return to step 1 is scheduled
    /// relative to `now`; on failure the session is kept as it was. A ticket
    /// whose session was reset while it was on the wire leaves the current
    /// session alone.
    pub fn finish_submission(
        &mut self,
        ticket: SubmissionTicket,
        result: Result<SubmitReceipt, TransportError>,
        now: Instant,
    ) -> Result<SubmitReceipt, SubmitError> {
        if self.in_flight == Some(ticket.id) {
            self.in_flight = None;
        } else {
            warn!(
                "event=submission module=flow status=stale_ticket ticket={}",
                ticket.id
            );
        }
        let duration_ms = ticket.started_at.elapsed().as_millis();
        match result {
            Ok(receipt) => {
                info!(
                    "event=submission module=flow status=ok duration_ms={} http_status={}",
                    duration_ms, receipt.status
                );
                if ticket.generation != self.generation {
                    info!(
                        "event=submission module=flow status=ok session=replaced ticket={}",
                        ticket.id
                    );
                    return Ok(receipt);
                }
                self.session.reset();
                self.generation += 1;
                self.preview = None;
                self.navigator.schedule_return(now);
                Ok(receipt)
            }
            Err(err) => {
                error!(
                    "event=submission module=flow status=error duration_ms={} error={}",
                    duration_ms, err
                );
                Err(err.into())
            }
        }
    }

    /// Validates, sends and settles one submission.
    pub fn submit<T: Transport + ?Sized>(
        &mut self,
        transport: &T,
        ctx: &ValidationContext,
    ) -> Result<SubmitReceipt, SubmitError> {
        let ticket = self.begin_submission(ctx)?;
        let result = transport.send(ticket.payload());
        self.finish_submission(ticket, result, Instant::now())
    }

    /// Discards everything entered and returns to step 1.
    ///
    /// An outstanding submission stays outstanding; its ticket still has to
    /// be finished before another one can begin.
    pub fn reset(&mut self) {
        self.session.reset();
        self.generation += 1;
        self.preview = None;
        self.navigator.reset();
    }
}
