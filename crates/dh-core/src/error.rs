//! Error taxonomy for the onboarding flow.

use thiserror::Error;

use crate::validation::ValidationError;

/// Every failure a flow operation can surface.
#[derive(Debug, Error)]
pub enum OnboardingError {
    /// A form field failed a local rule; nothing was sent to the server.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The server could not be reached or answered outside the envelope
    /// contract.
    #[error("network error: {0}")]
    Transport(String),

    /// The server rejected the credentials (HTTP 401). The session must be
    /// torn down and the user sent back to login.
    #[error("session expired, please log in again")]
    AuthExpired,

    /// The server answered but refused the operation.
    #[error("{0}")]
    Rejected(String),

    /// A navigation was refused by the gating rules.
    #[error("{0}")]
    GatingRefusal(String),

    /// Local persistence failed.
    #[error("storage error: {0}")]
    Storage(String),
}

impl OnboardingError {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }

    pub fn storage(err: impl std::fmt::Display) -> Self {
        Self::Storage(err.to_string())
    }
}
