//! Shared in-memory session state.
//!
//! One `SessionContext` is created per running client and shared across use
//! cases. It mirrors what the backend told us at verification time and is
//! updated after every accepted step submission.

use dh_core::documents::{DocumentKind, RejectedDocument};
use dh_core::session::{DriverProfile, ProfileCreated, SessionSnapshot, VerifiedSession};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct SessionState {
    token: Option<String>,
    user: Option<DriverProfile>,
    next_required_step: Option<DocumentKind>,
    is_onboarded: bool,
    rejected_documents: Vec<RejectedDocument>,
    approved_documents: Vec<DocumentKind>,
    pending_documents: Vec<DocumentKind>,
}

#[derive(Debug, Default)]
pub struct SessionContext {
    state: RwLock<SessionState>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the session with the result of an OTP verification.
    pub async fn apply_verified(&self, verified: VerifiedSession) {
        let mut state = self.state.write().await;
        state.token = verified.token;
        state.user = verified.user;
        state.next_required_step = verified.next_required_step;
        state.is_onboarded = verified.is_onboarded;
        state.rejected_documents = verified.rejected_documents;
        state.approved_documents = verified.approved_documents;
        state.pending_documents = verified.pending_documents;
    }

    /// Record the result of profile creation (signup).
    pub async fn apply_profile(&self, created: ProfileCreated) {
        let mut state = self.state.write().await;
        if created.token.is_some() {
            state.token = created.token;
        }
        if created.user.is_some() {
            state.user = created.user;
        }
    }

    /// Update the server's next-required-step hint after an accepted
    /// submission. `None` responses keep the current hint; the server omits
    /// the field rather than clearing it.
    pub async fn update_next_required_step(&self, next: Option<DocumentKind>) {
        if let Some(kind) = next {
            self.state.write().await.next_required_step = Some(kind);
        }
    }

    /// Clear the hint once the server reports every step submitted.
    pub async fn clear_next_required_step(&self) {
        self.state.write().await.next_required_step = None;
    }

    pub async fn token(&self) -> Option<String> {
        self.state.read().await.token.clone()
    }

    pub async fn user(&self) -> Option<DriverProfile> {
        self.state.read().await.user.clone()
    }

    pub async fn is_onboarded(&self) -> bool {
        self.state.read().await.is_onboarded
    }

    /// Read-only view for the guard and the review resolver.
    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.read().await;
        SessionSnapshot {
            user: state.user.clone(),
            next_required_step: state.next_required_step,
            rejected_documents: state.rejected_documents.clone(),
        }
    }

    /// Drop everything. Used on logout and on session expiry.
    pub async fn clear(&self) {
        *self.state.write().await = SessionState::default();
    }
}
