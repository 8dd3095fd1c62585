//! HTTP client for the onboarding backend.
//!
//! Wraps `reqwest` with the backend's envelope contract: bearer-token auth,
//! a fixed request timeout, `401` mapped to `AuthExpired`, and
//! `{ success: false }` mapped to `Rejected` with the server's message.

use std::time::Duration;

use async_trait::async_trait;
use dh_core::error::OnboardingError;
use dh_core::flow::{
    DocumentImage, InsuranceForm, LicenseForm, RegistrationForm, SignupForm, VehicleDetailsForm,
};
use dh_core::session::{ProfileCreated, VerifiedSession};
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use tokio::sync::RwLock;
use tracing::debug;

use dh_app::models::{Plan, PurchaseOutcome, StepAccepted, SubscriptionDetails};
use dh_app::ports::OnboardingApiPort;

use super::models::{
    Envelope, OnboardDto, PlanDto, PurchaseDto, StepUploadDto, SubscriptionDto, VerifySessionDto,
};

/// Request timeout applied to every call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: RwLock::new(None),
        })
    }

    /// Set or clear the bearer token attached to subsequent requests.
    pub async fn set_token(&self, token: Option<String>) {
        *self.token.write().await = token;
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token.read().await.as_ref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send a request and unwrap the response envelope.
    ///
    /// Returns the (possibly absent) data payload and the server message.
    async fn send_envelope<T: DeserializeOwned + Default>(
        &self,
        request: RequestBuilder,
    ) -> Result<(Option<T>, String), OnboardingError> {
        let request = self.authorized(request).await;
        let response = request.send().await.map_err(OnboardingError::transport)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(OnboardingError::AuthExpired);
        }

        let envelope: Envelope<T> = match response.json().await {
            Ok(envelope) => envelope,
            Err(err) if status.is_success() => return Err(OnboardingError::transport(err)),
            Err(_) => {
                return Err(OnboardingError::Transport(format!(
                    "request failed with status {status}"
                )))
            }
        };

        let message = envelope.message.unwrap_or_default();
        if !envelope.success {
            let reason = if message.is_empty() {
                format!("request failed with status {status}")
            } else {
                message
            };
            return Err(OnboardingError::Rejected(reason));
        }

        debug!(status = %status, "request succeeded");
        Ok((envelope.data, message))
    }

    /// As `send_envelope`, but the data payload is mandatory.
    async fn send_expecting<T: DeserializeOwned + Default>(
        &self,
        request: RequestBuilder,
    ) -> Result<(T, String), OnboardingError> {
        let (data, message) = self.send_envelope(request).await?;
        let data = data.ok_or_else(|| {
            OnboardingError::Transport("response is missing its data payload".to_string())
        })?;
        Ok((data, message))
    }

    fn image_part(image: &DocumentImage) -> Result<Part, OnboardingError> {
        Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.content_type)
            .map_err(OnboardingError::transport)
    }

    fn documents_url(&self, driver_id: &str, step: u8) -> String {
        self.url(&format!(
            "/api/auth/onboard/driver/{driver_id}/documents?step={step}"
        ))
    }

    async fn upload_documents(
        &self,
        url: String,
        form: Form,
    ) -> Result<StepAccepted, OnboardingError> {
        let request = self.http.post(url).multipart(form);
        let (data, message): (Option<StepUploadDto>, String) =
            self.send_envelope(request).await?;
        Ok(data.unwrap_or_default().into_domain(message))
    }
}

#[async_trait]
impl OnboardingApiPort for ApiClient {
    async fn send_otp(&self, phone: &str) -> Result<String, OnboardingError> {
        let request = self
            .http
            .post(self.url("/api/auth/send-otp"))
            .json(&json!({ "phone": phone }));
        let (_, message): (Option<serde_json::Value>, String) =
            self.send_envelope(request).await?;
        Ok(message)
    }

    async fn verify_otp(
        &self,
        phone: &str,
        otp: &str,
    ) -> Result<VerifiedSession, OnboardingError> {
        let request = self
            .http
            .post(self.url("/api/auth/verify-otp"))
            .json(&json!({ "phone": phone, "otp": otp }));
        let (dto, _): (VerifySessionDto, String) = self.send_expecting(request).await?;

        let session = dto.into_domain();
        self.set_token(session.token.clone()).await;
        Ok(session)
    }

    async fn create_profile(&self, form: &SignupForm) -> Result<ProfileCreated, OnboardingError> {
        let mut multipart = Form::new()
            .text("name", form.name.clone())
            .text("email", form.email.clone())
            .text("phone", form.phone.clone());
        if let Some(photo) = &form.photo {
            multipart = multipart.part("file", Self::image_part(photo)?);
        }

        let request = self
            .http
            .post(self.url("/api/auth/onboard/driver"))
            .multipart(multipart);
        let (dto, _): (OnboardDto, String) = self.send_expecting(request).await?;

        let created = dto.into_domain();
        if created.token.is_some() {
            self.set_token(created.token.clone()).await;
        }
        Ok(created)
    }

    async fn submit_license(
        &self,
        driver_id: &str,
        form: &LicenseForm,
    ) -> Result<StepAccepted, OnboardingError> {
        let multipart = Form::new()
            .part("files", Self::image_part(&form.front)?)
            .part("files", Self::image_part(&form.back)?)
            .text("expiryDate", form.expiry_date.format("%Y-%m-%d").to_string())
            .text("licenseNumber", form.license_number.clone());
        self.upload_documents(self.documents_url(driver_id, 1), multipart)
            .await
    }

    async fn submit_registration(
        &self,
        driver_id: &str,
        form: &RegistrationForm,
    ) -> Result<StepAccepted, OnboardingError> {
        let multipart = Form::new()
            .part("files", Self::image_part(&form.front)?)
            .part("files", Self::image_part(&form.back)?);
        self.upload_documents(self.documents_url(driver_id, 2), multipart)
            .await
    }

    async fn submit_insurance(
        &self,
        driver_id: &str,
        form: &InsuranceForm,
    ) -> Result<StepAccepted, OnboardingError> {
        let multipart = Form::new().part("files", Self::image_part(&form.certificate)?);
        self.upload_documents(self.documents_url(driver_id, 3), multipart)
            .await
    }

    async fn submit_vehicle_details(
        &self,
        driver_id: &str,
        form: &VehicleDetailsForm,
    ) -> Result<StepAccepted, OnboardingError> {
        let expiry = form
            .expiry_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        let multipart = Form::new()
            .text("make", form.make.clone())
            .text("model", form.model.clone())
            .text("yearOfManufacture", form.year_of_manufacture.clone())
            .text("color", form.color.clone())
            .text(
                "vehicleIdentificationNumber",
                form.vehicle_identification_number.clone(),
            )
            .text("licensePlateNumber", form.license_plate_number.clone())
            .text("registrationNumber", form.registration_number.clone())
            .text("regionOfRegistration", form.region_of_registration.clone())
            .text("expiryDate", expiry)
            .text("vehicleType", form.vehicle_type.clone());
        self.upload_documents(self.documents_url(driver_id, 4), multipart)
            .await
    }

    async fn list_plans(&self) -> Result<Vec<Plan>, OnboardingError> {
        let request = self.http.get(self.url("/api/plan"));
        let (plans, _): (Vec<PlanDto>, String) = self.send_expecting(request).await?;
        Ok(plans.into_iter().map(PlanDto::into_domain).collect())
    }

    async fn subscription_details(
        &self,
    ) -> Result<Option<SubscriptionDetails>, OnboardingError> {
        let request = self.http.get(self.url("/api/subscription/details"));
        let (dto, _): (Option<SubscriptionDto>, String) = self.send_envelope(request).await?;
        Ok(dto.map(SubscriptionDto::into_domain))
    }

    async fn purchase_plan(&self, plan_id: &str) -> Result<PurchaseOutcome, OnboardingError> {
        let request = self
            .http
            .post(self.url(&format!("/api/subscription/purchase/{plan_id}")));
        let (dto, message): (Option<PurchaseDto>, String) = self.send_envelope(request).await?;
        Ok(dto.unwrap_or_default().into_domain(message))
    }

    async fn cancel_subscription(&self) -> Result<String, OnboardingError> {
        let request = self.http.post(self.url("/api/subscription/cancel"));
        let (_, message): (Option<serde_json::Value>, String) =
            self.send_envelope(request).await?;
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dh_core::documents::{DocumentKind, ReviewStatus};
    use mockito::Matcher;

    async fn client_for(server: &mockito::ServerGuard) -> ApiClient {
        ApiClient::new(ApiConfig::new(server.url())).unwrap()
    }

    #[tokio::test]
    async fn test_verify_otp_maps_session_and_stores_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/auth/verify-otp")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                  "success": true,
                  "message": "OTP verified",
                  "data": {
                    "token": "jwt-123",
                    "stepToComplete": "insurance",
                    "isOnboarded": false,
                    "rejectedDocuments": [
                      { "key": "insurance", "rejectReason": "unreadable" },
                      { "key": "passport", "rejectReason": "ignored" }
                    ],
                    "user": {
                      "_id": "driver-1",
                      "name": "Ada",
                      "email": "ada@example.com",
                      "phone": "5551234567",
                      "insurance": { "status": "rejected", "rejectReason": "unreadable" }
                    }
                  }
                }"#,
            )
            .create_async()
            .await;

        let client = client_for(&server).await;
        let session = client.verify_otp("5551234567", "123456").await.unwrap();

        assert_eq!(session.token.as_deref(), Some("jwt-123"));
        assert_eq!(session.next_required_step, Some(DocumentKind::Insurance));
        // The unknown "passport" key is dropped.
        assert_eq!(session.rejected_documents.len(), 1);
        let user = session.user.unwrap();
        assert_eq!(user.id, "driver-1");
        assert_eq!(user.documents.insurance.status, ReviewStatus::Rejected);
        // Fields the server omitted default to pending.
        assert_eq!(user.documents.driver_license.status, ReviewStatus::Pending);

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_auth_expired() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/plan")
            .with_status(401)
            .with_body(r#"{"success":false,"message":"jwt expired"}"#)
            .create_async()
            .await;

        let client = client_for(&server).await;
        let err = client.list_plans().await.unwrap_err();
        assert!(matches!(err, OnboardingError::AuthExpired));
    }

    #[tokio::test]
    async fn test_failure_envelope_maps_to_rejected_with_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/auth/send-otp")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success":false,"message":"Invalid phone number"}"#)
            .create_async()
            .await;

        let client = client_for(&server).await;
        let err = client.send_otp("123").await.unwrap_err();
        assert!(matches!(
            err,
            OnboardingError::Rejected(message) if message == "Invalid phone number"
        ));
    }

    #[tokio::test]
    async fn test_submit_license_hits_step_one_and_maps_hint() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/auth/onboard/driver/driver-1/documents")
            .match_query(Matcher::UrlEncoded("step".into(), "1".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                  "success": true,
                  "message": "Documents uploaded",
                  "data": { "stepToComplete": "vehicleRegistration" }
                }"#,
            )
            .create_async()
            .await;

        let client = client_for(&server).await;
        let form = LicenseForm {
            license_number: "DL-555".into(),
            expiry_date: chrono::NaiveDate::from_ymd_opt(2031, 1, 1).unwrap(),
            front: DocumentImage::new("front.png", "image/png", vec![1, 2, 3]),
            back: DocumentImage::new("back.png", "image/png", vec![4, 5, 6]),
        };
        let accepted = client.submit_license("driver-1", &form).await.unwrap();

        assert_eq!(accepted.message, "Documents uploaded");
        assert_eq!(
            accepted.next_required_step,
            Some(DocumentKind::VehicleRegistration)
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_list_plans_maps_amounts() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/plan")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                  "success": true,
                  "data": [
                    { "id": "p1", "name": "Monthly", "amount": 2999, "currency": "usd", "interval": "month" },
                    { "id": "p2", "name": "Yearly", "amount": 29900 }
                  ]
                }"#,
            )
            .create_async()
            .await;

        let client = client_for(&server).await;
        let plans = client.list_plans().await.unwrap();
        assert_eq!(plans.len(), 2);
        assert_eq!(plans[0].amount, 2999);
        assert_eq!(plans[1].currency, "usd");
    }

    #[tokio::test]
    async fn test_purchase_extracts_checkout_url() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/subscription/purchase/p1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                  "success": true,
                  "message": "redirect",
                  "data": { "url": "https://checkout.example.com/cs_123" }
                }"#,
            )
            .create_async()
            .await;

        let client = client_for(&server).await;
        let outcome = client.purchase_plan("p1").await.unwrap();
        assert_eq!(
            outcome.checkout_url.as_deref(),
            Some("https://checkout.example.com/cs_123")
        );
    }

    #[tokio::test]
    async fn test_subscription_details_absent_data_is_none() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/subscription/details")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success": true, "message": "No active subscription"}"#)
            .create_async()
            .await;

        let client = client_for(&server).await;
        assert!(client.subscription_details().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_bearer_token_is_attached_after_verification() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/auth/verify-otp")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success":true,"data":{"token":"jwt-123"}}"#)
            .create_async()
            .await;
        let plans = server
            .mock("GET", "/api/plan")
            .match_header("authorization", "Bearer jwt-123")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success":true,"data":[]}"#)
            .create_async()
            .await;

        let client = client_for(&server).await;
        client.verify_otp("5551234567", "123456").await.unwrap();
        client.list_plans().await.unwrap();
        plans.assert_async().await;
    }
}
