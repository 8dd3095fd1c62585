//! Onboarding step identity and ordering.
//!
//! The onboarding flow is a fixed seven-step sequence. Steps carry their
//! persisted ledger key (via serde) and their client route, and know their
//! position in the sequence.

use serde::{Deserialize, Serialize};

use crate::documents::DocumentKind;

/// One step of the driver onboarding sequence, in flow order.
///
/// Serialized values are the persisted ledger keys, which must stay stable
/// across releases: a ledger written by an older client must keep meaning
/// the same steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StepId {
    #[serde(rename = "step1_signup")]
    Signup,
    #[serde(rename = "step2_license")]
    LicenseInformation,
    #[serde(rename = "step3_vehicle")]
    VehicleRegistration,
    #[serde(rename = "step4_insurance")]
    InsuranceInformation,
    #[serde(rename = "step5_addVehicle")]
    AddVehicleDetails,
    #[serde(rename = "step6_verified")]
    VerifiedAccount,
    #[serde(rename = "step7_subscription")]
    Subscription,
}

impl StepId {
    /// All steps in flow order.
    pub const ALL: [StepId; 7] = [
        StepId::Signup,
        StepId::LicenseInformation,
        StepId::VehicleRegistration,
        StepId::InsuranceInformation,
        StepId::AddVehicleDetails,
        StepId::VerifiedAccount,
        StepId::Subscription,
    ];

    /// Zero-based position in the flow.
    pub fn index(self) -> usize {
        match self {
            StepId::Signup => 0,
            StepId::LicenseInformation => 1,
            StepId::VehicleRegistration => 2,
            StepId::InsuranceInformation => 3,
            StepId::AddVehicleDetails => 4,
            StepId::VerifiedAccount => 5,
            StepId::Subscription => 6,
        }
    }

    /// Client route for the step's page.
    pub fn route(self) -> &'static str {
        match self {
            StepId::Signup => "/signup",
            StepId::LicenseInformation => "/license-information",
            StepId::VehicleRegistration => "/vehicle-details",
            StepId::InsuranceInformation => "/insurance-information",
            StepId::AddVehicleDetails => "/add-vehicle-details",
            StepId::VerifiedAccount => "/verified-account",
            StepId::Subscription => "/subscription",
        }
    }

    /// The document submitted at this step, if any.
    ///
    /// Only the four document-upload steps map to a document kind; the server
    /// identifies the next required step by this kind.
    pub fn document_kind(self) -> Option<DocumentKind> {
        match self {
            StepId::LicenseInformation => Some(DocumentKind::DriverLicense),
            StepId::VehicleRegistration => Some(DocumentKind::VehicleRegistration),
            StepId::InsuranceInformation => Some(DocumentKind::Insurance),
            StepId::AddVehicleDetails => Some(DocumentKind::VehicleDetails),
            _ => None,
        }
    }

    pub fn next(self) -> Option<StepId> {
        StepId::ALL.get(self.index() + 1).copied()
    }

    pub fn previous(self) -> Option<StepId> {
        self.index().checked_sub(1).map(|i| StepId::ALL[i])
    }
}

/// A navigation target: either a flow step or the login entry page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// The pre-flow login page ("/").
    Login,
    Step(StepId),
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/",
            Route::Step(step) => step.route(),
        }
    }
}
