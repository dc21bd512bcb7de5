//! Navigation controller: turns step-cursor changes into gated route entries.
//!
//! # Responsibility
//! - Enforce the step gate once per route entry.
//! - Redirect denied entries to the first incomplete step with a notice.
//! - Schedule the return to step 1 after a successful submission.
//!
//! # Invariants
//! - Backward navigation to an accessible step is never blocked; backward
//!   navigation passes through the gate like any other entry.
//! - A denied entry leaves the cursor on the redirect target, never on the
//!   requested step.

use super::step_gate::{can_access_step, resume_step};
use crate::model::session::FormSession;
use crate::model::step::StepId;
use crate::schema::{validate_step, ValidationContext, ValidationReport};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{Duration, Instant};

/// Delay between a successful submission and the return to step 1, leaving
/// time for the success indicator.
pub const RETURN_TO_START_DELAY: Duration = Duration::from_secs(2);

/// Blocking notification shown when a step route is entered too early.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepNotice {
    /// Step the user must complete first.
    pub required_step: StepId,
    pub message: String,
}

impl StepNotice {
    fn for_step(step: StepId) -> Self {
        Self {
            required_step: step,
            message: format!(
                "Complete step {} ({}) first.",
                step.index(),
                step.title()
            ),
        }
    }
}

/// Result of one route entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    Entered(StepId),
    Redirected { to: StepId, notice: StepNotice },
}

impl NavigationOutcome {
    /// Step the cursor ended on.
    pub fn step(&self) -> StepId {
        match self {
            Self::Entered(step) => *step,
            Self::Redirected { to, .. } => *to,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    UnknownRoute(String),
    UnknownStep(u8),
}

impl Display for NavigationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownRoute(path) => write!(f, "unknown survey route: `{path}`"),
            Self::UnknownStep(index) => write!(f, "unknown survey step: {index}"),
        }
    }
}

impl Error for NavigationError {}

/// Step cursor of one form session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    current: StepId,
    return_at: Option<Instant>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            current: StepId::Identity,
            return_at: None,
        }
    }

    pub fn current(&self) -> StepId {
        self.current
    }

    /// Enters `target` if the gate allows it, otherwise redirects to the first
    /// incomplete step.
    pub fn enter(&mut self, target: StepId, session: &FormSession) -> NavigationOutcome {
        if can_access_step(target, session) {
            self.current = target;
            info!(
                "event=step_enter module=navigation status=ok step={}",
                target.index()
            );
            return NavigationOutcome::Entered(target);
        }

        let to = resume_step(session);
        self.current = to;
        warn!(
            "event=step_enter module=navigation status=redirected requested={} redirected_to={}",
            target.index(),
            to.index()
        );
        NavigationOutcome::Redirected {
            to,
            notice: StepNotice::for_step(to),
        }
    }

    /// Index-based entry for callers that only know the step number.
    pub fn enter_index(
        &mut self,
        index: u8,
        session: &FormSession,
    ) -> Result<NavigationOutcome, NavigationError> {
        let step = StepId::from_index(index).ok_or(NavigationError::UnknownStep(index))?;
        Ok(self.enter(step, session))
    }

    /// Route-based entry, as triggered by the client-side router.
    pub fn enter_route(
        &mut self,
        path: &str,
        session: &FormSession,
    ) -> Result<NavigationOutcome, NavigationError> {
        let step = StepId::from_route(path)
            .ok_or_else(|| NavigationError::UnknownRoute(path.to_string()))?;
        Ok(self.enter(step, session))
    }

    /// Validates the current step in full and, when it passes, enters the
    /// next step through the gate. On the review step this is a no-op.
    ///
    /// # Errors
    /// Returns the step's validation report when any field fails.
    pub fn advance(
        &mut self,
        session: &FormSession,
        ctx: &ValidationContext,
    ) -> Result<NavigationOutcome, ValidationReport> {
        let report = validate_step(self.current, session, ctx);
        if !report.is_valid() {
            info!(
                "event=step_advance module=navigation status=invalid step={} issues={}",
                self.current.index(),
                report.len()
            );
            return Err(report);
        }
        match self.current.next() {
            Some(next) => Ok(self.enter(next, session)),
            None => Ok(NavigationOutcome::Entered(self.current)),
        }
    }

    /// Moves one step back through the gate.
    ///
    /// An earlier step whose predecessors are still complete is entered; one
    /// invalidated by later edits redirects to the first incomplete step.
    pub fn back(&mut self, session: &FormSession) -> NavigationOutcome {
        let target = self.current.previous().unwrap_or(self.current);
        self.enter(target, session)
    }

    /// Schedules the post-submission return to step 1.
    pub fn schedule_return(&mut self, now: Instant) {
        self.return_at = Some(now + RETURN_TO_START_DELAY);
    }

    pub fn has_pending_return(&self) -> bool {
        self.return_at.is_some()
    }

    /// Applies a due scheduled return. Returns the new step when it fired.
    pub fn poll(&mut self, now: Instant) -> Option<StepId> {
        match self.return_at {
            Some(due) if now >= due => {
                self.return_at = None;
                self.current = StepId::Identity;
                info!("event=step_return module=navigation status=ok step=1");
                Some(StepId::Identity)
            }
            _ => None,
        }
    }

    /// Back to step 1 with nothing scheduled.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
