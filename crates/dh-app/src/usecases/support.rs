//! Hand-written fakes shared by the use-case tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use dh_core::error::OnboardingError;
use dh_core::flow::{
    FlowPayload, InsuranceForm, LicenseForm, RegistrationForm, SignupForm, VehicleDetailsForm,
};
use dh_core::ledger::StepLedger;
use dh_core::ports::{StepLedgerPort, VerifiedPhonePort};
use dh_core::session::{ProfileCreated, VerifiedSession};
use dh_core::steps::Route;

use crate::models::{Plan, PurchaseOutcome, StepAccepted, SubscriptionDetails};
use crate::ports::{NavigatorPort, NotifierPort, OnboardingApiPort};

#[derive(Default)]
pub(crate) struct MemoryStepLedger {
    ledger: Mutex<StepLedger>,
}

impl MemoryStepLedger {
    pub(crate) fn with(steps: impl IntoIterator<Item = dh_core::steps::StepId>) -> Self {
        let mut ledger = StepLedger::new();
        for step in steps {
            ledger.mark_completed(step);
        }
        Self {
            ledger: Mutex::new(ledger),
        }
    }

    pub(crate) fn current(&self) -> StepLedger {
        self.ledger.lock().unwrap().clone()
    }
}

#[async_trait]
impl StepLedgerPort for MemoryStepLedger {
    async fn load(&self) -> anyhow::Result<StepLedger> {
        Ok(self.ledger.lock().unwrap().clone())
    }

    async fn save(&self, ledger: &StepLedger) -> anyhow::Result<()> {
        *self.ledger.lock().unwrap() = ledger.clone();
        Ok(())
    }

    async fn clear(&self) -> anyhow::Result<()> {
        self.ledger.lock().unwrap().clear();
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct MemoryVerifiedPhone {
    phone: Mutex<Option<String>>,
}

impl MemoryVerifiedPhone {
    pub(crate) fn with(phone: &str) -> Self {
        Self {
            phone: Mutex::new(Some(phone.to_string())),
        }
    }

    pub(crate) fn current(&self) -> Option<String> {
        self.phone.lock().unwrap().clone()
    }
}

#[async_trait]
impl VerifiedPhonePort for MemoryVerifiedPhone {
    async fn load(&self) -> anyhow::Result<Option<String>> {
        Ok(self.phone.lock().unwrap().clone())
    }

    async fn save(&self, phone: &str) -> anyhow::Result<()> {
        *self.phone.lock().unwrap() = Some(phone.to_string());
        Ok(())
    }

    async fn clear(&self) -> anyhow::Result<()> {
        *self.phone.lock().unwrap() = None;
        Ok(())
    }
}

/// Records every navigation the use case performs.
#[derive(Default)]
pub(crate) struct RecordedNav {
    calls: Mutex<Vec<(Route, FlowPayload)>>,
}

impl RecordedNav {
    pub(crate) fn routes(&self) -> Vec<Route> {
        self.calls.lock().unwrap().iter().map(|(r, _)| *r).collect()
    }

    pub(crate) fn last(&self) -> Option<(Route, FlowPayload)> {
        self.calls.lock().unwrap().last().cloned()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.calls.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl NavigatorPort for RecordedNav {
    async fn navigate(&self, route: Route, payload: FlowPayload) {
        self.calls.lock().unwrap().push((route, payload));
    }
}

#[derive(Default)]
pub(crate) struct RecordedNotifier {
    pub(crate) successes: Mutex<Vec<String>>,
    pub(crate) errors: Mutex<Vec<String>>,
}

impl RecordedNotifier {
    pub(crate) fn last_error(&self) -> Option<String> {
        self.errors.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl NotifierPort for RecordedNotifier {
    async fn success(&self, message: &str) {
        self.successes.lock().unwrap().push(message.to_string());
    }

    async fn error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}

fn unscripted<T>(endpoint: &str) -> Result<T, OnboardingError> {
    Err(OnboardingError::Rejected(format!(
        "unscripted call to {endpoint}"
    )))
}

/// Scripted API fake. Single-shot results are consumed by the first call;
/// step submissions pop from a queue so multi-step walks can be scripted.
#[derive(Default)]
pub(crate) struct StubApi {
    pub(crate) send_otp_result: Mutex<Option<Result<String, OnboardingError>>>,
    pub(crate) verify_result: Mutex<Option<Result<VerifiedSession, OnboardingError>>>,
    pub(crate) profile_result: Mutex<Option<Result<ProfileCreated, OnboardingError>>>,
    pub(crate) step_results: Mutex<VecDeque<Result<StepAccepted, OnboardingError>>>,
    pub(crate) plans: Mutex<Option<Result<Vec<Plan>, OnboardingError>>>,
    pub(crate) details: Mutex<Option<Result<Option<SubscriptionDetails>, OnboardingError>>>,
    pub(crate) purchase: Mutex<Option<Result<PurchaseOutcome, OnboardingError>>>,
    pub(crate) cancel: Mutex<Option<Result<String, OnboardingError>>>,
    /// Endpoint names in call order.
    pub(crate) calls: Mutex<Vec<String>>,
}

impl StubApi {
    pub(crate) fn push_step_result(&self, result: Result<StepAccepted, OnboardingError>) {
        self.step_results.lock().unwrap().push_back(result);
    }

    fn record(&self, endpoint: &str) {
        self.calls.lock().unwrap().push(endpoint.to_string());
    }

    fn next_step_result(&self, endpoint: &str) -> Result<StepAccepted, OnboardingError> {
        self.record(endpoint);
        self.step_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| unscripted(endpoint))
    }
}

#[async_trait]
impl OnboardingApiPort for StubApi {
    async fn send_otp(&self, _phone: &str) -> Result<String, OnboardingError> {
        self.record("send_otp");
        self.send_otp_result
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| unscripted("send_otp"))
    }

    async fn verify_otp(
        &self,
        _phone: &str,
        _otp: &str,
    ) -> Result<VerifiedSession, OnboardingError> {
        self.record("verify_otp");
        self.verify_result
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| unscripted("verify_otp"))
    }

    async fn create_profile(&self, _form: &SignupForm) -> Result<ProfileCreated, OnboardingError> {
        self.record("create_profile");
        self.profile_result
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| unscripted("create_profile"))
    }

    async fn submit_license(
        &self,
        _driver_id: &str,
        _form: &LicenseForm,
    ) -> Result<StepAccepted, OnboardingError> {
        self.next_step_result("submit_license")
    }

    async fn submit_registration(
        &self,
        _driver_id: &str,
        _form: &RegistrationForm,
    ) -> Result<StepAccepted, OnboardingError> {
        self.next_step_result("submit_registration")
    }

    async fn submit_insurance(
        &self,
        _driver_id: &str,
        _form: &InsuranceForm,
    ) -> Result<StepAccepted, OnboardingError> {
        self.next_step_result("submit_insurance")
    }

    async fn submit_vehicle_details(
        &self,
        _driver_id: &str,
        _form: &VehicleDetailsForm,
    ) -> Result<StepAccepted, OnboardingError> {
        self.next_step_result("submit_vehicle_details")
    }

    async fn list_plans(&self) -> Result<Vec<Plan>, OnboardingError> {
        self.record("list_plans");
        self.plans
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| unscripted("list_plans"))
    }

    async fn subscription_details(
        &self,
    ) -> Result<Option<SubscriptionDetails>, OnboardingError> {
        self.record("subscription_details");
        self.details
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| unscripted("subscription_details"))
    }

    async fn purchase_plan(&self, _plan_id: &str) -> Result<PurchaseOutcome, OnboardingError> {
        self.record("purchase_plan");
        self.purchase
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| unscripted("purchase_plan"))
    }

    async fn cancel_subscription(&self) -> Result<String, OnboardingError> {
        self.record("cancel_subscription");
        self.cancel
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| unscripted("cancel_subscription"))
    }
}

pub(crate) fn driver(id: &str) -> dh_core::session::DriverProfile {
    dh_core::session::DriverProfile {
        id: id.to_string(),
        name: "Ada Driver".to_string(),
        email: "ada@example.com".to_string(),
        phone: "5551234567".to_string(),
        ..Default::default()
    }
}

pub(crate) fn image() -> dh_core::flow::DocumentImage {
    dh_core::flow::DocumentImage::new("doc.png", "image/png", vec![0u8; 32])
}
