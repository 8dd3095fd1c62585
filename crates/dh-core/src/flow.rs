//! Typed flow context carried across step navigations.
//!
//! Pages hand each other captured form data and flow markers when
//! navigating. This module gives that hand-off a concrete type instead of an
//! untyped bag, so the guard can reason about what a navigation carries.

use chrono::NaiveDate;

use crate::documents::{DocumentKind, RejectedDocument};
use crate::review::ReviewSignal;
use crate::steps::StepId;

/// An image selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentImage {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl DocumentImage {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

/// Captured signup form data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub photo: Option<DocumentImage>,
}

/// Captured driver-license form data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseForm {
    pub license_number: String,
    pub expiry_date: NaiveDate,
    pub front: DocumentImage,
    pub back: DocumentImage,
}

/// Captured vehicle-registration form data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationForm {
    pub front: DocumentImage,
    pub back: DocumentImage,
}

/// Captured insurance form data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsuranceForm {
    pub certificate: DocumentImage,
}

/// Captured vehicle-details form data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VehicleDetailsForm {
    pub make: String,
    pub model: String,
    pub year_of_manufacture: String,
    pub color: String,
    pub vehicle_identification_number: String,
    pub license_plate_number: String,
    pub registration_number: String,
    pub region_of_registration: String,
    pub expiry_date: Option<NaiveDate>,
    pub vehicle_type: String,
}

/// An ordered plan of document steps to revisit after rejection.
///
/// Plans are always in [`DocumentKind::CANONICAL_ORDER`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResubmissionPlan {
    kinds: Vec<DocumentKind>,
}

impl ResubmissionPlan {
    /// Build a plan from an arbitrary collection of rejected kinds.
    /// Duplicates collapse and the result follows canonical order.
    pub fn from_kinds(kinds: impl IntoIterator<Item = DocumentKind>) -> Self {
        let requested: Vec<DocumentKind> = kinds.into_iter().collect();
        let ordered = DocumentKind::CANONICAL_ORDER
            .iter()
            .copied()
            .filter(|k| requested.contains(k))
            .collect();
        Self { kinds: ordered }
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn get(&self, index: usize) -> Option<DocumentKind> {
        self.kinds.get(index).copied()
    }

    pub fn kinds(&self) -> &[DocumentKind] {
        &self.kinds
    }
}

/// Position within an active resubmission traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResubmissionCursor {
    plan: ResubmissionPlan,
    index: usize,
}

/// Where a resubmission traversal goes after completing its current step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResubmissionAdvance {
    /// Another rejected step remains; the cursor points at it.
    Next(ResubmissionCursor),
    /// The plan is exhausted; return to the review page as freshly submitted.
    ReturnToReview,
}

impl ResubmissionCursor {
    /// Start a traversal at the plan's first step. Empty plans have no
    /// traversal.
    pub fn start(plan: ResubmissionPlan) -> Option<Self> {
        if plan.is_empty() {
            None
        } else {
            Some(Self { plan, index: 0 })
        }
    }

    pub fn current(&self) -> Option<DocumentKind> {
        self.plan.get(self.index)
    }

    pub fn plan(&self) -> &ResubmissionPlan {
        &self.plan
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Move past the current step.
    pub fn advance(self) -> ResubmissionAdvance {
        let next = self.index + 1;
        if next < self.plan.len() {
            ResubmissionAdvance::Next(Self {
                plan: self.plan,
                index: next,
            })
        } else {
            ResubmissionAdvance::ReturnToReview
        }
    }
}

/// Everything a navigation can carry between pages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowPayload {
    pub signup: Option<SignupForm>,
    pub license: Option<LicenseForm>,
    pub registration: Option<RegistrationForm>,
    pub insurance: Option<InsuranceForm>,
    pub vehicle_details: Option<VehicleDetailsForm>,
    /// Explicit review-state hint set by the navigating page.
    pub review_signal: Option<ReviewSignal>,
    /// Rejections carried into the review page by the verification flow.
    pub rejected_documents: Option<Vec<RejectedDocument>>,
    /// Set while walking a resubmission plan.
    pub resubmission: Option<ResubmissionCursor>,
}

impl FlowPayload {
    /// Whether this payload carries form data captured at a step strictly
    /// before `step`. Such a navigation is mid-flow and bypasses the
    /// completed/prior-step ledger checks.
    pub fn carries_prior_step_data(&self, step: StepId) -> bool {
        let slots = [
            (StepId::Signup, self.signup.is_some()),
            (StepId::LicenseInformation, self.license.is_some()),
            (StepId::VehicleRegistration, self.registration.is_some()),
            (StepId::InsuranceInformation, self.insurance.is_some()),
            (StepId::AddVehicleDetails, self.vehicle_details.is_some()),
        ];
        slots
            .iter()
            .any(|(origin, present)| *present && origin.index() < step.index())
    }

    /// Whether this navigation is part of an explicit review flow, either a
    /// review signal or an active resubmission traversal.
    pub fn is_review_flow(&self) -> bool {
        self.review_signal.is_some() || self.resubmission.is_some()
    }
}
