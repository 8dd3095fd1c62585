//! Step completion: validate the form, submit it, record the step, and
//! compute the forward target (next step, or the resubmission traversal).

use std::sync::Arc;

use chrono::Utc;
use dh_core::error::OnboardingError;
use dh_core::flow::{
    FlowPayload, InsuranceForm, LicenseForm, RegistrationForm, ResubmissionAdvance, SignupForm,
    VehicleDetailsForm,
};
use dh_core::ports::StepLedgerPort;
use dh_core::review::ReviewSignal;
use dh_core::steps::{Route, StepId};
use dh_core::validation;
use tracing::info;

use crate::ports::{NavigatorPort, NotifierPort, OnboardingApiPort};
use crate::session::SessionContext;
use crate::usecases::report_failure;

/// A completed form for one of the five data-entry steps.
#[derive(Debug, Clone)]
pub enum StepSubmission {
    Signup(SignupForm),
    License(LicenseForm),
    Registration(RegistrationForm),
    Insurance(InsuranceForm),
    VehicleDetails(VehicleDetailsForm),
}

impl StepSubmission {
    pub fn step(&self) -> StepId {
        match self {
            StepSubmission::Signup(_) => StepId::Signup,
            StepSubmission::License(_) => StepId::LicenseInformation,
            StepSubmission::Registration(_) => StepId::VehicleRegistration,
            StepSubmission::Insurance(_) => StepId::InsuranceInformation,
            StepSubmission::VehicleDetails(_) => StepId::AddVehicleDetails,
        }
    }

    fn validate(&self) -> Result<(), OnboardingError> {
        let today = Utc::now().date_naive();
        match self {
            StepSubmission::Signup(form) => validation::validate_signup(form)?,
            StepSubmission::License(form) => validation::validate_license(form, today)?,
            StepSubmission::Registration(form) => validation::validate_registration(form)?,
            StepSubmission::Insurance(form) => validation::validate_insurance(form)?,
            StepSubmission::VehicleDetails(form) => {
                validation::validate_vehicle_details(form, today)?
            }
        }
        Ok(())
    }
}

pub struct CompleteStep {
    api: Arc<dyn OnboardingApiPort>,
    session: Arc<SessionContext>,
    ledger: Arc<dyn StepLedgerPort>,
    navigator: Arc<dyn NavigatorPort>,
    notifier: Arc<dyn NotifierPort>,
}

impl CompleteStep {
    pub fn new(
        api: Arc<dyn OnboardingApiPort>,
        session: Arc<SessionContext>,
        ledger: Arc<dyn StepLedgerPort>,
        navigator: Arc<dyn NavigatorPort>,
        notifier: Arc<dyn NotifierPort>,
    ) -> Self {
        Self {
            api,
            session,
            ledger,
            navigator,
            notifier,
        }
    }

    /// Submit a step and move the flow forward.
    ///
    /// During a resubmission traversal the forward target is the next step
    /// of the plan, or the review page (as freshly submitted) when the plan
    /// is exhausted. Otherwise it is simply the next step in flow order.
    pub async fn submit(
        &self,
        submission: StepSubmission,
        mut payload: FlowPayload,
    ) -> Result<Route, OnboardingError> {
        submission.validate()?;
        let step = submission.step();

        match &submission {
            StepSubmission::Signup(form) => {
                let created = match self.api.create_profile(form).await {
                    Ok(created) => created,
                    Err(err) => return Err(self.fail(err).await),
                };
                self.session.apply_profile(created).await;
            }
            _ => {
                let Some(user) = self.session.user().await else {
                    self.notifier
                        .error("User data not found. Please sign up again.")
                        .await;
                    self.navigator
                        .navigate(Route::Step(StepId::Signup), FlowPayload::default())
                        .await;
                    return Err(OnboardingError::Rejected(
                        "User data not found".to_string(),
                    ));
                };

                let accepted = match &submission {
                    StepSubmission::License(form) => self.api.submit_license(&user.id, form).await,
                    StepSubmission::Registration(form) => {
                        self.api.submit_registration(&user.id, form).await
                    }
                    StepSubmission::Insurance(form) => {
                        self.api.submit_insurance(&user.id, form).await
                    }
                    StepSubmission::VehicleDetails(form) => {
                        self.api.submit_vehicle_details(&user.id, form).await
                    }
                    StepSubmission::Signup(_) => unreachable!("handled above"),
                };
                let accepted = match accepted {
                    Ok(accepted) => accepted,
                    Err(err) => return Err(self.fail(err).await),
                };

                self.session
                    .update_next_required_step(accepted.next_required_step)
                    .await;
                if !accepted.message.is_empty() {
                    self.notifier.success(&accepted.message).await;
                }
            }
        }

        self.mark_step(step).await?;
        store_form(&mut payload, submission);

        let route = forward_target(step, &mut payload);
        info!(step = ?step, route = route.path(), "step completed");
        self.navigator.navigate(route, payload).await;
        Ok(route)
    }

    async fn mark_step(&self, step: StepId) -> Result<(), OnboardingError> {
        let mut ledger = self
            .ledger
            .load()
            .await
            .map_err(OnboardingError::storage)?;
        if !ledger.is_completed(step) {
            ledger.mark_completed(step);
            self.ledger
                .save(&ledger)
                .await
                .map_err(OnboardingError::storage)?;
        }
        Ok(())
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

fn store_form(payload: &mut FlowPayload, submission: StepSubmission) {
    match submission {
        StepSubmission::Signup(form) => payload.signup = Some(form),
        StepSubmission::License(form) => payload.license = Some(form),
        StepSubmission::Registration(form) => payload.registration = Some(form),
        StepSubmission::Insurance(form) => payload.insurance = Some(form),
        StepSubmission::VehicleDetails(form) => payload.vehicle_details = Some(form),
    }
}

fn forward_target(step: StepId, payload: &mut FlowPayload) -> Route {
    if let Some(cursor) = payload.resubmission.take() {
        return match cursor.advance() {
            ResubmissionAdvance::Next(next) => {
                let target = next
                    .current()
                    .map(|kind| Route::Step(kind.step()))
                    .unwrap_or(Route::Step(StepId::VerifiedAccount));
                payload.resubmission = Some(next);
                target
            }
            ResubmissionAdvance::ReturnToReview => {
                payload.review_signal = Some(ReviewSignal::Submitted);
                Route::Step(StepId::VerifiedAccount)
            }
        };
    }

    match step.next() {
        Some(next) => Route::Step(next),
        None => Route::Step(StepId::Subscription),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StepAccepted;
    use crate::usecases::support::{
        driver, image, MemoryStepLedger, RecordedNav, RecordedNotifier, StubApi,
    };
    use chrono::NaiveDate;
    use dh_core::documents::DocumentKind;
    use dh_core::flow::{ResubmissionCursor, ResubmissionPlan};
    use dh_core::session::{ProfileCreated, VerifiedSession};

    struct Fixture {
        api: Arc<StubApi>,
        session: Arc<SessionContext>,
        ledger: Arc<MemoryStepLedger>,
        nav: Arc<RecordedNav>,
        notifier: Arc<RecordedNotifier>,
        uc: CompleteStep,
    }

    fn fixture() -> Fixture {
        let api = Arc::new(StubApi::default());
        let session = Arc::new(SessionContext::new());
        let ledger = Arc::new(MemoryStepLedger::default());
        let nav = Arc::new(RecordedNav::default());
        let notifier = Arc::new(RecordedNotifier::default());
        let uc = CompleteStep::new(
            api.clone(),
            session.clone(),
            ledger.clone(),
            nav.clone(),
            notifier.clone(),
        );
        Fixture {
            api,
            session,
            ledger,
            nav,
            notifier,
            uc,
        }
    }

    async fn sign_in(f: &Fixture) {
        f.session
            .apply_verified(VerifiedSession {
                user: Some(driver("d1")),
                next_required_step: Some(DocumentKind::DriverLicense),
                ..Default::default()
            })
            .await;
    }

    fn license_form() -> LicenseForm {
        LicenseForm {
            license_number: "DL-555".into(),
            expiry_date: NaiveDate::from_ymd_opt(2031, 1, 1).unwrap(),
            front: image(),
            back: image(),
        }
    }

    fn insurance_form() -> InsuranceForm {
        InsuranceForm {
            certificate: image(),
        }
    }

    #[tokio::test]
    async fn test_signup_creates_profile_and_moves_to_license() {
        let f = fixture();
        *f.api.profile_result.lock().unwrap() = Some(Ok(ProfileCreated {
            token: Some("tok".into()),
            user: Some(driver("d1")),
        }));

        let form = SignupForm {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            phone: "5551234567".into(),
            photo: None,
        };
        let route = f
            .uc
            .submit(StepSubmission::Signup(form), FlowPayload::default())
            .await
            .unwrap();

        assert_eq!(route, Route::Step(StepId::LicenseInformation));
        assert!(f.ledger.current().is_completed(StepId::Signup));
        assert!(f.session.user().await.is_some());

        let (_, payload) = f.nav.last().unwrap();
        assert!(payload.signup.is_some());
    }

    #[tokio::test]
    async fn test_validation_failure_never_reaches_the_server() {
        let f = fixture();
        let form = SignupForm::default();
        let err = f
            .uc
            .submit(StepSubmission::Signup(form), FlowPayload::default())
            .await
            .unwrap_err();
        assert!(matches!(err, OnboardingError::Validation(_)));
        assert!(f.api.calls.lock().unwrap().is_empty());
        assert!(f.nav.is_empty());
    }

    #[tokio::test]
    async fn test_license_submission_updates_hint_and_advances() {
        let f = fixture();
        sign_in(&f).await;
        f.api.push_step_result(Ok(StepAccepted {
            message: "Documents uploaded".into(),
            next_required_step: Some(DocumentKind::VehicleRegistration),
        }));

        let route = f
            .uc
            .submit(
                StepSubmission::License(license_form()),
                FlowPayload::default(),
            )
            .await
            .unwrap();

        assert_eq!(route, Route::Step(StepId::VehicleRegistration));
        assert!(f.ledger.current().is_completed(StepId::LicenseInformation));
        assert_eq!(
            f.session.snapshot().await.next_required_step,
            Some(DocumentKind::VehicleRegistration)
        );
        let (_, payload) = f.nav.last().unwrap();
        assert!(payload.license.is_some());
    }

    #[tokio::test]
    async fn test_missing_hint_in_response_keeps_previous() {
        let f = fixture();
        sign_in(&f).await;
        f.api.push_step_result(Ok(StepAccepted::default()));

        f.uc.submit(
            StepSubmission::License(license_form()),
            FlowPayload::default(),
        )
        .await
        .unwrap();

        assert_eq!(
            f.session.snapshot().await.next_required_step,
            Some(DocumentKind::DriverLicense)
        );
    }

    #[tokio::test]
    async fn test_document_step_without_session_bounces_to_signup() {
        let f = fixture();
        let err = f
            .uc
            .submit(
                StepSubmission::License(license_form()),
                FlowPayload::default(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, OnboardingError::Rejected(_)));
        assert_eq!(f.nav.routes(), vec![Route::Step(StepId::Signup)]);
        assert!(f.notifier.last_error().is_some());
    }

    #[tokio::test]
    async fn test_rejected_upload_marks_nothing() {
        let f = fixture();
        sign_in(&f).await;
        f.api
            .push_step_result(Err(OnboardingError::Rejected("File too large".into())));

        let err = f
            .uc
            .submit(
                StepSubmission::License(license_form()),
                FlowPayload::default(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, OnboardingError::Rejected(_)));
        assert!(!f.ledger.current().is_completed(StepId::LicenseInformation));
        assert!(f.nav.is_empty());
        assert_eq!(f.notifier.last_error().as_deref(), Some("File too large"));
    }

    #[tokio::test]
    async fn test_expired_session_tears_down_and_redirects_to_login() {
        let f = fixture();
        sign_in(&f).await;
        f.api.push_step_result(Err(OnboardingError::AuthExpired));

        let err = f
            .uc
            .submit(
                StepSubmission::License(license_form()),
                FlowPayload::default(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, OnboardingError::AuthExpired));
        assert!(f.session.user().await.is_none());
        assert_eq!(f.nav.routes(), vec![Route::Login]);
    }

    #[tokio::test]
    async fn test_resubmission_advances_to_next_planned_step() {
        let f = fixture();
        sign_in(&f).await;
        f.api.push_step_result(Ok(StepAccepted::default()));

        let plan = ResubmissionPlan::from_kinds([
            DocumentKind::DriverLicense,
            DocumentKind::Insurance,
        ]);
        let payload = FlowPayload {
            resubmission: ResubmissionCursor::start(plan),
            ..Default::default()
        };

        let route = f
            .uc
            .submit(StepSubmission::License(license_form()), payload)
            .await
            .unwrap();

        assert_eq!(route, Route::Step(StepId::InsuranceInformation));
        let (_, forwarded) = f.nav.last().unwrap();
        let cursor = forwarded.resubmission.unwrap();
        assert_eq!(cursor.current(), Some(DocumentKind::Insurance));
        assert_eq!(cursor.index(), 1);
    }

    #[tokio::test]
    async fn test_exhausted_resubmission_returns_to_review_as_submitted() {
        let f = fixture();
        sign_in(&f).await;
        f.api.push_step_result(Ok(StepAccepted::default()));

        let plan = ResubmissionPlan::from_kinds([DocumentKind::Insurance]);
        let payload = FlowPayload {
            resubmission: ResubmissionCursor::start(plan),
            ..Default::default()
        };

        let route = f
            .uc
            .submit(StepSubmission::Insurance(insurance_form()), payload)
            .await
            .unwrap();

        assert_eq!(route, Route::Step(StepId::VerifiedAccount));
        let (_, forwarded) = f.nav.last().unwrap();
        assert_eq!(forwarded.review_signal, Some(ReviewSignal::Submitted));
        assert!(forwarded.resubmission.is_none());
    }
}
