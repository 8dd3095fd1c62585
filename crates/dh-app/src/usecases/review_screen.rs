//! The verified-account (review) screen: outcome derivation, the delayed
//! auto-advance to subscription, rejection reasons, and resubmission.

use std::sync::Arc;

use dh_core::error::OnboardingError;
use dh_core::flow::{FlowPayload, ResubmissionCursor};
use dh_core::review::{self, ReviewInputs, ReviewOutcome};
use dh_core::session::SessionSnapshot;
use dh_core::steps::{Route, StepId};
use tokio::sync::Mutex;
use tokio::time::{sleep, Duration};
use tracing::{debug, info};

use crate::ports::NavigatorPort;
use crate::session::SessionContext;

/// Delay before an approved review advances to the subscription step.
pub const AUTO_ADVANCE_DELAY: Duration = Duration::from_millis(2000);

pub struct ReviewScreen {
    session: Arc<SessionContext>,
    navigator: Arc<dyn NavigatorPort>,
    outcome: Mutex<ReviewOutcome>,
    pending_advance: Mutex<Option<tokio::task::AbortHandle>>,
}

impl ReviewScreen {
    pub fn new(session: Arc<SessionContext>, navigator: Arc<dyn NavigatorPort>) -> Self {
        Self {
            session,
            navigator,
            outcome: Mutex::new(ReviewOutcome::default()),
            pending_advance: Mutex::new(None),
        }
    }

    /// Re-derive the displayed outcome from the current session and the
    /// navigation payload, and (re)arm the auto-advance timer when the
    /// outcome warrants it.
    pub async fn refresh(&self, payload: &FlowPayload) -> ReviewOutcome {
        let snapshot = self.session.snapshot().await;
        let previous = *self.outcome.lock().await;
        let outcome = {
            let inputs = inputs_from(payload, &snapshot);
            review::resolve_outcome(&inputs, previous)
        };
        *self.outcome.lock().await = outcome;

        // Any outcome change invalidates a previously armed advance.
        self.cancel_pending().await;
        if review::should_auto_advance(outcome, snapshot.documents()) {
            self.arm_advance(payload.clone()).await;
        }

        debug!(outcome = ?outcome, "review outcome resolved");
        outcome
    }

    /// The outcome currently displayed.
    pub async fn outcome(&self) -> ReviewOutcome {
        *self.outcome.lock().await
    }

    /// Rejection reasons for the rejected screen.
    pub async fn reasons(&self, payload: &FlowPayload) -> Vec<String> {
        let snapshot = self.session.snapshot().await;
        let inputs = inputs_from(payload, &snapshot);
        review::rejection_reasons(&inputs)
    }

    /// Leave the screen; a pending auto-advance must not fire afterwards.
    pub async fn dismiss(&self) {
        self.cancel_pending().await;
    }

    /// Begin the resubmission traversal over every rejected document.
    ///
    /// The traversal starts at the first planned step carrying a cursor in
    /// the payload. An empty plan falls back to signup.
    pub async fn resubmit(&self, payload: &FlowPayload) -> Result<Route, OnboardingError> {
        self.cancel_pending().await;

        let snapshot = self.session.snapshot().await;
        let plan = {
            let inputs = inputs_from(payload, &snapshot);
            review::build_resubmission_plan(&inputs)
        };

        let Some(cursor) = ResubmissionCursor::start(plan) else {
            let route = Route::Step(StepId::Signup);
            self.navigator.navigate(route, FlowPayload::default()).await;
            return Ok(route);
        };

        let route = cursor
            .current()
            .map(|kind| Route::Step(kind.step()))
            .unwrap_or(Route::Step(StepId::Signup));

        let mut next_payload = payload.clone();
        next_payload.review_signal = None;
        next_payload.rejected_documents = None;
        next_payload.resubmission = Some(cursor);

        info!(route = route.path(), "starting resubmission");
        self.navigator.navigate(route, next_payload).await;
        Ok(route)
    }

    async fn arm_advance(&self, payload: FlowPayload) {
        let navigator = Arc::clone(&self.navigator);
        let handle = tokio::spawn(async move {
            sleep(AUTO_ADVANCE_DELAY).await;
            navigator
                .navigate(Route::Step(StepId::Subscription), payload)
                .await;
        });
        *self.pending_advance.lock().await = Some(handle.abort_handle());
    }

    async fn cancel_pending(&self) {
        if let Some(handle) = self.pending_advance.lock().await.take() {
            handle.abort();
        }
    }
}

fn inputs_from<'a>(
    payload: &'a FlowPayload,
    snapshot: &'a SessionSnapshot,
) -> ReviewInputs<'a> {
    ReviewInputs {
        signal: payload.review_signal,
        transient_rejected: payload.rejected_documents.as_deref(),
        session_rejected: &snapshot.rejected_documents,
        documents: snapshot.documents(),
    }
}
