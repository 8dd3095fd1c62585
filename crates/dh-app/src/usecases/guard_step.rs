//! Page-guard use case: runs the rule chain against the live session and
//! ledger, applying any opportunistic ledger mark the chain asks for.

use std::sync::Arc;

use dh_core::error::OnboardingError;
use dh_core::flow::FlowPayload;
use dh_core::guard::{self, GuardContext, GuardDecision};
use dh_core::ports::{StepLedgerPort, VerifiedPhonePort};
use dh_core::steps::{Route, StepId};
use tracing::debug;

use crate::session::SessionContext;

pub struct GuardStepAccess {
    session: Arc<SessionContext>,
    ledger: Arc<dyn StepLedgerPort>,
    verified_phone: Arc<dyn VerifiedPhonePort>,
}

impl GuardStepAccess {
    pub fn new(
        session: Arc<SessionContext>,
        ledger: Arc<dyn StepLedgerPort>,
        verified_phone: Arc<dyn VerifiedPhonePort>,
    ) -> Self {
        Self {
            session,
            ledger,
            verified_phone,
        }
    }

    /// Decide whether the attempted navigation to `step` may proceed.
    pub async fn check(
        &self,
        step: StepId,
        payload: Option<&FlowPayload>,
    ) -> Result<GuardDecision, OnboardingError> {
        let snapshot = self.session.snapshot().await;

        // The signup page is gated on device-local phone verification, not
        // on the rule chain: without a verified phone the user belongs on
        // the login page.
        if step == StepId::Signup && snapshot.user.is_none() {
            let verified = self
                .verified_phone
                .load()
                .await
                .map_err(OnboardingError::storage)?;
            let decision = if verified.is_some() {
                GuardDecision::Allow
            } else {
                GuardDecision::Redirect(Route::Login)
            };
            debug!(step = ?step, decision = ?decision, "guard decision");
            return Ok(decision);
        }

        let mut ledger = self
            .ledger
            .load()
            .await
            .map_err(OnboardingError::storage)?;

        let outcome = guard::evaluate(&GuardContext {
            step,
            session: &snapshot,
            payload,
            ledger: &ledger,
        });

        if let Some(mark) = outcome.mark_completed {
            if !ledger.is_completed(mark) {
                ledger.mark_completed(mark);
                self.ledger
                    .save(&ledger)
                    .await
                    .map_err(OnboardingError::storage)?;
                debug!(step = ?mark, "step recorded from server hint");
            }
        }

        debug!(step = ?step, decision = ?outcome.decision, "guard decision");
        Ok(outcome.decision)
    }
}
