//! Wire models for the backend's response envelope and payloads.
//!
//! Every response is `{ success, message, data }`. Payload fields are
//! individually optional; missing pieces map to domain defaults so a partial
//! server response never fails deserialization.

use chrono::{DateTime, Utc};
use dh_core::documents::{
    DocumentKind, DocumentRecord, DocumentSnapshot, RejectedDocument, ReviewStatus,
};
use dh_core::session::{DriverProfile, ProfileCreated, VerifiedSession};
use serde::Deserialize;

use dh_app::models::{Plan, PurchaseOutcome, StepAccepted, SubscriptionDetails};

#[derive(Debug, Deserialize)]
pub(super) struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct DocumentDto {
    #[serde(default)]
    pub status: Option<ReviewStatus>,
    #[serde(default)]
    pub reject_reason: Option<String>,
}

impl DocumentDto {
    fn into_record(self) -> DocumentRecord {
        DocumentRecord {
            status: self.status.unwrap_or_default(),
            reject_reason: self.reject_reason,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UserDto {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub driver_license: Option<DocumentDto>,
    #[serde(default)]
    pub vehicle_registration: Option<DocumentDto>,
    #[serde(default)]
    pub insurance: Option<DocumentDto>,
    #[serde(default)]
    pub vehicle_details: Option<DocumentDto>,
    #[serde(default)]
    pub is_onboarded: Option<bool>,
}

impl UserDto {
    pub(super) fn into_profile(self) -> DriverProfile {
        let documents = DocumentSnapshot {
            driver_license: self.driver_license.unwrap_or_default().into_record(),
            vehicle_registration: self.vehicle_registration.unwrap_or_default().into_record(),
            insurance: self.insurance.unwrap_or_default().into_record(),
            vehicle_details: self.vehicle_details.unwrap_or_default().into_record(),
        };
        DriverProfile {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            phone: self.phone.unwrap_or_default(),
            documents,
            is_onboarded: self.is_onboarded.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RejectedDocumentDto {
    pub key: String,
    #[serde(default)]
    pub reject_reason: Option<String>,
}

impl RejectedDocumentDto {
    fn into_domain(self) -> Option<RejectedDocument> {
        // Unknown document keys are dropped rather than failing the whole
        // response.
        DocumentKind::parse(&self.key).map(|key| RejectedDocument {
            key,
            reject_reason: self.reject_reason,
        })
    }
}

fn parse_kinds(keys: Vec<String>) -> Vec<DocumentKind> {
    keys.iter().filter_map(|k| DocumentKind::parse(k)).collect()
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct VerifySessionDto {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<UserDto>,
    #[serde(default)]
    pub step_to_complete: Option<String>,
    #[serde(default)]
    pub is_onboarded: Option<bool>,
    #[serde(default)]
    pub rejected_documents: Vec<RejectedDocumentDto>,
    #[serde(default)]
    pub approved_documents: Vec<String>,
    #[serde(default)]
    pub pending_documents: Vec<String>,
}

impl VerifySessionDto {
    pub(super) fn into_domain(self) -> VerifiedSession {
        VerifiedSession {
            token: self.token,
            user: self.user.map(UserDto::into_profile),
            next_required_step: self
                .step_to_complete
                .as_deref()
                .and_then(DocumentKind::parse),
            is_onboarded: self.is_onboarded.unwrap_or_default(),
            rejected_documents: self
                .rejected_documents
                .into_iter()
                .filter_map(RejectedDocumentDto::into_domain)
                .collect(),
            approved_documents: parse_kinds(self.approved_documents),
            pending_documents: parse_kinds(self.pending_documents),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct OnboardDto {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<UserDto>,
}

impl OnboardDto {
    pub(super) fn into_domain(self) -> ProfileCreated {
        ProfileCreated {
            token: self.token,
            user: self.user.map(UserDto::into_profile),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct StepUploadDto {
    #[serde(default)]
    pub step_to_complete: Option<String>,
}

impl StepUploadDto {
    pub(super) fn into_domain(self, message: String) -> StepAccepted {
        StepAccepted {
            message,
            next_required_step: self
                .step_to_complete
                .as_deref()
                .and_then(DocumentKind::parse),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PlanDto {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub amount: u64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub interval: Option<String>,
}

fn default_currency() -> String {
    "usd".to_string()
}

impl PlanDto {
    pub(super) fn into_domain(self) -> Plan {
        Plan {
            id: self.id,
            name: self.name,
            amount: self.amount,
            currency: self.currency,
            interval: self.interval,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SubscriptionDto {
    pub id: String,
    #[serde(default)]
    pub plan_id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub current_period_end: Option<DateTime<Utc>>,
}

impl SubscriptionDto {
    pub(super) fn into_domain(self) -> SubscriptionDetails {
        SubscriptionDetails {
            id: self.id,
            plan_id: self.plan_id,
            status: self.status,
            current_period_end: self.current_period_end,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PurchaseDto {
    #[serde(default)]
    pub url: Option<String>,
}

impl PurchaseDto {
    pub(super) fn into_domain(self, message: String) -> PurchaseOutcome {
        PurchaseOutcome {
            checkout_url: self.url,
            message,
        }
    }
}
