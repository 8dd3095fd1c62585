//! Driver profile and session state.

use serde::{Deserialize, Serialize};

use crate::documents::{DocumentKind, DocumentSnapshot, RejectedDocument};

/// The authenticated driver's profile as known to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DriverProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub documents: DocumentSnapshot,
    pub is_onboarded: bool,
}

/// Read-only view of the current session, as consumed by the page guard and
/// the review resolver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// `None` when nobody is signed in.
    pub user: Option<DriverProfile>,
    /// Server hint for the next required document step. `None` means the
    /// server considers every document step submitted.
    pub next_required_step: Option<DocumentKind>,
    /// Rejections reported alongside the session at verification time.
    pub rejected_documents: Vec<RejectedDocument>,
}

impl SessionSnapshot {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn documents(&self) -> Option<&DocumentSnapshot> {
        self.user.as_ref().map(|u| &u.documents)
    }
}

/// Session data returned by the backend after a successful OTP verification.
#[derive(Debug, Clone, Default)]
pub struct VerifiedSession {
    pub token: Option<String>,
    pub user: Option<DriverProfile>,
    pub next_required_step: Option<DocumentKind>,
    pub is_onboarded: bool,
    pub rejected_documents: Vec<RejectedDocument>,
    pub approved_documents: Vec<DocumentKind>,
    pub pending_documents: Vec<DocumentKind>,
}

/// Session data returned by the backend after profile creation (signup).
#[derive(Debug, Clone, Default)]
pub struct ProfileCreated {
    pub token: Option<String>,
    pub user: Option<DriverProfile>,
}
