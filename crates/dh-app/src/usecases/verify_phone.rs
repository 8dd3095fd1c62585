//! Phone verification and the post-verification routing decision.

use std::sync::Arc;

use dh_core::error::OnboardingError;
use dh_core::flow::FlowPayload;
use dh_core::ports::VerifiedPhonePort;
use dh_core::review::ReviewSignal;
use dh_core::steps::{Route, StepId};
use dh_core::validation;
use tracing::info;

use crate::ports::{NavigatorPort, NotifierPort, OnboardingApiPort};
use crate::session::SessionContext;
use crate::usecases::report_failure;

pub struct VerifyPhone {
    api: Arc<dyn OnboardingApiPort>,
    session: Arc<SessionContext>,
    verified_phone: Arc<dyn VerifiedPhonePort>,
    navigator: Arc<dyn NavigatorPort>,
    notifier: Arc<dyn NotifierPort>,
}

impl VerifyPhone {
    pub fn new(
        api: Arc<dyn OnboardingApiPort>,
        session: Arc<SessionContext>,
        verified_phone: Arc<dyn VerifiedPhonePort>,
        navigator: Arc<dyn NavigatorPort>,
        notifier: Arc<dyn NotifierPort>,
    ) -> Self {
        Self {
            api,
            session,
            verified_phone,
            navigator,
            notifier,
        }
    }

    /// Request an OTP for the phone number.
    pub async fn send_code(&self, phone: &str) -> Result<(), OnboardingError> {
        let digits = validation::validate_phone(phone)?;
        match self.api.send_otp(&digits).await {
            Ok(message) => {
                self.notifier.success(&message).await;
                Ok(())
            }
            Err(err) => Err(report_failure(
                err,
                &self.session,
                self.navigator.as_ref(),
                self.notifier.as_ref(),
            )
            .await),
        }
    }

    /// Verify the OTP, store the session, and route to wherever the flow
    /// should resume.
    ///
    /// Routing, first match wins: stored rejections open the review page in
    /// its rejected state; a profile with a next-required-step hint resumes
    /// at that document step; a profile without one goes to review; no
    /// profile at all starts at signup.
    pub async fn verify(&self, phone: &str, otp: &str) -> Result<Route, OnboardingError> {
        let digits = validation::validate_phone(phone)?;
        validation::validate_otp(otp)?;

        let verified = match self.api.verify_otp(&digits, otp).await {
            Ok(verified) => verified,
            Err(err) => {
                return Err(report_failure(
                    err,
                    &self.session,
                    self.navigator.as_ref(),
                    self.notifier.as_ref(),
                )
                .await)
            }
        };

        self.verified_phone
            .save(&digits)
            .await
            .map_err(OnboardingError::storage)?;

        let has_rejections = !verified.rejected_documents.is_empty();
        let has_user = verified.user.is_some();
        let next_required = verified.next_required_step;
        self.session.apply_verified(verified).await;

        let (route, payload) = if has_rejections {
            (
                Route::Step(StepId::VerifiedAccount),
                FlowPayload {
                    review_signal: Some(ReviewSignal::Rejected),
                    ..Default::default()
                },
            )
        } else if has_user {
            match next_required {
                Some(kind) => (Route::Step(kind.step()), FlowPayload::default()),
                None => (Route::Step(StepId::VerifiedAccount), FlowPayload::default()),
            }
        } else {
            (Route::Step(StepId::Signup), FlowPayload::default())
        };

        info!(route = route.path(), "phone verified");
        self.navigator.navigate(route, payload).await;
        Ok(route)
    }
}
