//! Logout: clear every trace of the flow and return to login.

use std::sync::Arc;

use dh_core::error::OnboardingError;
use dh_core::flow::FlowPayload;
use dh_core::ports::{StepLedgerPort, VerifiedPhonePort};
use dh_core::steps::Route;
use tracing::info;

use crate::ports::NavigatorPort;
use crate::session::SessionContext;

pub struct Logout {
    session: Arc<SessionContext>,
    ledger: Arc<dyn StepLedgerPort>,
    verified_phone: Arc<dyn VerifiedPhonePort>,
    navigator: Arc<dyn NavigatorPort>,
}

impl Logout {
    pub fn new(
        session: Arc<SessionContext>,
        ledger: Arc<dyn StepLedgerPort>,
        verified_phone: Arc<dyn VerifiedPhonePort>,
        navigator: Arc<dyn NavigatorPort>,
    ) -> Self {
        Self {
            session,
            ledger,
            verified_phone,
            navigator,
        }
    }

    pub async fn execute(&self) -> Result<Route, OnboardingError> {
        self.session.clear().await;
        self.ledger
            .clear()
            .await
            .map_err(OnboardingError::storage)?;
        self.verified_phone
            .clear()
            .await
            .map_err(OnboardingError::storage)?;

        info!("signed out");
        self.navigator
            .navigate(Route::Login, FlowPayload::default())
            .await;
        Ok(Route::Login)
    }
}
