//! Subscription management for the final flow step.

use std::sync::Arc;

use dh_core::error::OnboardingError;
use tracing::info;

use crate::models::{Plan, PurchaseOutcome, SubscriptionDetails};
use crate::ports::{NavigatorPort, NotifierPort, OnboardingApiPort};
use crate::session::SessionContext;
use crate::usecases::report_failure;

pub struct ManageSubscription {
    api: Arc<dyn OnboardingApiPort>,
    session: Arc<SessionContext>,
    navigator: Arc<dyn NavigatorPort>,
    notifier: Arc<dyn NotifierPort>,
}

impl ManageSubscription {
    pub fn new(
        api: Arc<dyn OnboardingApiPort>,
        session: Arc<SessionContext>,
        navigator: Arc<dyn NavigatorPort>,
        notifier: Arc<dyn NotifierPort>,
    ) -> Self {
        Self {
            api,
            session,
            navigator,
            notifier,
        }
    }

    pub async fn plans(&self) -> Result<Vec<Plan>, OnboardingError> {
        match self.api.list_plans().await {
            Ok(plans) => Ok(plans),
            Err(err) => Err(self.fail(err).await),
        }
    }

    /// The driver's active subscription, when one exists.
    pub async fn details(&self) -> Result<Option<SubscriptionDetails>, OnboardingError> {
        match self.api.subscription_details().await {
            Ok(details) => Ok(details),
            Err(err) => Err(self.fail(err).await),
        }
    }

    /// Purchase a plan. A checkout URL in the outcome must be opened by the
    /// host shell; a purchase without one completed immediately.
    pub async fn purchase(&self, plan_id: &str) -> Result<PurchaseOutcome, OnboardingError> {
        if plan_id.trim().is_empty() {
            let err = OnboardingError::Rejected("Invalid plan selected".to_string());
            self.notifier.error(&err.to_string()).await;
            return Err(err);
        }

        match self.api.purchase_plan(plan_id).await {
            Ok(outcome) => {
                if outcome.checkout_url.is_none() {
                    self.notifier.success(&outcome.message).await;
                }
                info!(plan_id, "plan purchased");
                Ok(outcome)
            }
            Err(err) => Err(self.fail(err).await),
        }
    }

    pub async fn cancel(&self) -> Result<String, OnboardingError> {
        match self.api.cancel_subscription().await {
            Ok(message) => {
                self.notifier.success(&message).await;
                Ok(message)
            }
            Err(err) => Err(self.fail(err).await),
        }
    }

    async fn fail(&self, err: OnboardingError) -> OnboardingError {
        report_failure(
            err,
            &self.session,
            self.navigator.as_ref(),
            self.notifier.as_ref(),
        )
        .await
    }
}
