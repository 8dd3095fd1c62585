//! Backwards navigation, gated on the ledger.

use std::sync::Arc;

use dh_core::error::OnboardingError;
use dh_core::flow::FlowPayload;
use dh_core::guard;
use dh_core::ports::StepLedgerPort;
use dh_core::steps::{Route, StepId};
use tracing::debug;

use crate::ports::{NavigatorPort, NotifierPort};

pub struct BackNavigation {
    ledger: Arc<dyn StepLedgerPort>,
    navigator: Arc<dyn NavigatorPort>,
    notifier: Arc<dyn NotifierPort>,
}

impl BackNavigation {
    pub fn new(
        ledger: Arc<dyn StepLedgerPort>,
        navigator: Arc<dyn NavigatorPort>,
        notifier: Arc<dyn NotifierPort>,
    ) -> Self {
        Self {
            ledger,
            navigator,
            notifier,
        }
    }

    /// Go back one step, unless the previous step is already completed.
    pub async fn back(
        &self,
        step: StepId,
        payload: FlowPayload,
    ) -> Result<Route, OnboardingError> {
        let ledger = self
            .ledger
            .load()
            .await
            .map_err(OnboardingError::storage)?;

        match guard::back_target(step, &ledger) {
            Ok(previous) => {
                let route = Route::Step(previous);
                debug!(from = ?step, to = ?previous, "navigating back");
                self.navigator.navigate(route, payload).await;
                Ok(route)
            }
            Err(err) => {
                self.notifier.error(&err.to_string()).await;
                Err(err)
            }
        }
    }
}
