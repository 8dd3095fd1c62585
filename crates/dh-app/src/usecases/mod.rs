//! Use cases of the onboarding flow.

mod back_navigation;
mod complete_step;
mod guard_step;
mod logout;
mod review_screen;
mod subscription;
mod verify_phone;

pub use back_navigation::BackNavigation;
pub use complete_step::{CompleteStep, StepSubmission};
pub use guard_step::GuardStepAccess;
pub use logout::Logout;
pub use review_screen::ReviewScreen;
pub use subscription::ManageSubscription;
pub use verify_phone::VerifyPhone;

use dh_core::error::OnboardingError;
use dh_core::flow::FlowPayload;
use dh_core::steps::Route;

use crate::ports::{NavigatorPort, NotifierPort};
use crate::session::SessionContext;

/// Common failure path for API-backed operations: surface the message, and
/// on an expired session tear the session down and send the user to login.
pub(crate) async fn report_failure(
    err: OnboardingError,
    session: &SessionContext,
    navigator: &dyn NavigatorPort,
    notifier: &dyn NotifierPort,
) -> OnboardingError {
    notifier.error(&err.to_string()).await;
    if matches!(err, OnboardingError::AuthExpired) {
        session.clear().await;
        navigator.navigate(Route::Login, FlowPayload::default()).await;
    }
    err
}

#[cfg(test)]
pub(crate) mod support;
