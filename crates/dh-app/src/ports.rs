//! Ports the use cases depend on.
//!
//! `OnboardingApiPort` is the backend REST API. `NavigatorPort` performs
//! page navigation in the host shell. `NotifierPort` shows transient
//! success/error messages. All three are injected as trait objects so tests
//! run against hand-written fakes.

use async_trait::async_trait;
use dh_core::error::OnboardingError;
use dh_core::flow::{
    FlowPayload, InsuranceForm, LicenseForm, RegistrationForm, SignupForm, VehicleDetailsForm,
};
use dh_core::session::{ProfileCreated, VerifiedSession};
use dh_core::steps::Route;

use crate::models::{Plan, PurchaseOutcome, StepAccepted, SubscriptionDetails};

#[async_trait]
pub trait OnboardingApiPort: Send + Sync {
    /// Request an OTP for the phone number. Returns the server's message.
    async fn send_otp(&self, phone: &str) -> Result<String, OnboardingError>;

    async fn verify_otp(&self, phone: &str, otp: &str)
        -> Result<VerifiedSession, OnboardingError>;

    /// Create the driver profile (signup step).
    async fn create_profile(&self, form: &SignupForm) -> Result<ProfileCreated, OnboardingError>;

    async fn submit_license(
        &self,
        driver_id: &str,
        form: &LicenseForm,
    ) -> Result<StepAccepted, OnboardingError>;

    async fn submit_registration(
        &self,
        driver_id: &str,
        form: &RegistrationForm,
    ) -> Result<StepAccepted, OnboardingError>;

    async fn submit_insurance(
        &self,
        driver_id: &str,
        form: &InsuranceForm,
    ) -> Result<StepAccepted, OnboardingError>;

    async fn submit_vehicle_details(
        &self,
        driver_id: &str,
        form: &VehicleDetailsForm,
    ) -> Result<StepAccepted, OnboardingError>;

    async fn list_plans(&self) -> Result<Vec<Plan>, OnboardingError>;

    /// The driver's current subscription, `None` when there is none.
    async fn subscription_details(
        &self,
    ) -> Result<Option<SubscriptionDetails>, OnboardingError>;

    async fn purchase_plan(&self, plan_id: &str) -> Result<PurchaseOutcome, OnboardingError>;

    async fn cancel_subscription(&self) -> Result<String, OnboardingError>;
}

#[async_trait]
pub trait NavigatorPort: Send + Sync {
    async fn navigate(&self, route: Route, payload: FlowPayload);
}

#[async_trait]
pub trait NotifierPort: Send + Sync {
    async fn success(&self, message: &str);
    async fn error(&self, message: &str);
}
