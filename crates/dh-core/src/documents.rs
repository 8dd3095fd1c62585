//! Driver document kinds and review state.
//!
//! The backend reviews four documents per driver. Serialized kind names are
//! the server's wire keys and double as the values of the "next required
//! step" hint returned after OTP verification and after each upload.

use serde::{Deserialize, Serialize};

use crate::steps::StepId;

/// A reviewable driver document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentKind {
    DriverLicense,
    VehicleRegistration,
    Insurance,
    VehicleDetails,
}

impl DocumentKind {
    /// The canonical resubmission order. Plans are always emitted in this
    /// order regardless of the order rejections were reported in.
    pub const CANONICAL_ORDER: [DocumentKind; 4] = [
        DocumentKind::DriverLicense,
        DocumentKind::VehicleRegistration,
        DocumentKind::Insurance,
        DocumentKind::VehicleDetails,
    ];

    /// Server wire key for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentKind::DriverLicense => "driverLicense",
            DocumentKind::VehicleRegistration => "vehicleRegistration",
            DocumentKind::Insurance => "insurance",
            DocumentKind::VehicleDetails => "vehicleDetails",
        }
    }

    /// Parse a server wire key. Unknown keys yield `None`.
    pub fn parse(key: &str) -> Option<DocumentKind> {
        match key {
            "driverLicense" => Some(DocumentKind::DriverLicense),
            "vehicleRegistration" => Some(DocumentKind::VehicleRegistration),
            "insurance" => Some(DocumentKind::Insurance),
            "vehicleDetails" => Some(DocumentKind::VehicleDetails),
            _ => None,
        }
    }

    /// Human-readable name, used when synthesizing rejection reasons.
    pub fn display_name(self) -> &'static str {
        match self {
            DocumentKind::DriverLicense => "Driver License",
            DocumentKind::VehicleRegistration => "Vehicle Registration",
            DocumentKind::Insurance => "Insurance",
            DocumentKind::VehicleDetails => "Vehicle Details",
        }
    }

    /// The flow step where this document is submitted.
    pub fn step(self) -> StepId {
        match self {
            DocumentKind::DriverLicense => StepId::LicenseInformation,
            DocumentKind::VehicleRegistration => StepId::VehicleRegistration,
            DocumentKind::Insurance => StepId::InsuranceInformation,
            DocumentKind::VehicleDetails => StepId::AddVehicleDetails,
        }
    }
}

/// Review state of a single document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// Per-document review record from the driver profile.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub status: ReviewStatus,
    pub reject_reason: Option<String>,
}

impl DocumentRecord {
    pub fn with_status(status: ReviewStatus) -> Self {
        Self {
            status,
            reject_reason: None,
        }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            status: ReviewStatus::Rejected,
            reject_reason: Some(reason.into()),
        }
    }
}

/// Review state of all four documents on a driver profile.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    pub driver_license: DocumentRecord,
    pub vehicle_registration: DocumentRecord,
    pub insurance: DocumentRecord,
    pub vehicle_details: DocumentRecord,
}

impl DocumentSnapshot {
    pub fn get(&self, kind: DocumentKind) -> &DocumentRecord {
        match kind {
            DocumentKind::DriverLicense => &self.driver_license,
            DocumentKind::VehicleRegistration => &self.vehicle_registration,
            DocumentKind::Insurance => &self.insurance,
            DocumentKind::VehicleDetails => &self.vehicle_details,
        }
    }

    pub fn get_mut(&mut self, kind: DocumentKind) -> &mut DocumentRecord {
        match kind {
            DocumentKind::DriverLicense => &mut self.driver_license,
            DocumentKind::VehicleRegistration => &mut self.vehicle_registration,
            DocumentKind::Insurance => &mut self.insurance,
            DocumentKind::VehicleDetails => &mut self.vehicle_details,
        }
    }

    pub fn all_pending(&self) -> bool {
        DocumentKind::CANONICAL_ORDER
            .iter()
            .all(|k| self.get(*k).status == ReviewStatus::Pending)
    }

    pub fn all_approved(&self) -> bool {
        DocumentKind::CANONICAL_ORDER
            .iter()
            .all(|k| self.get(*k).status == ReviewStatus::Approved)
    }

    pub fn any_rejected(&self) -> bool {
        DocumentKind::CANONICAL_ORDER
            .iter()
            .any(|k| self.get(*k).status == ReviewStatus::Rejected)
    }

    /// Rejected kinds in canonical order.
    pub fn rejected_kinds(&self) -> Vec<DocumentKind> {
        DocumentKind::CANONICAL_ORDER
            .iter()
            .copied()
            .filter(|k| self.get(*k).status == ReviewStatus::Rejected)
            .collect()
    }
}

/// A rejection entry as reported by the server alongside the session,
/// independent of the per-document records on the profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedDocument {
    pub key: DocumentKind,
    pub reject_reason: Option<String>,
}

impl RejectedDocument {
    pub fn new(key: DocumentKind, reason: Option<&str>) -> Self {
        Self {
            key,
            reject_reason: reason.map(str::to_owned),
        }
    }
}
