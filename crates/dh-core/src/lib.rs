//! Core domain for the DriverHub onboarding flow.
//!
//! Pure types and decision logic: the step sequence and ledger, the page
//! guard rule chain, the review-outcome resolver, resubmission planning, and
//! local form validation. Nothing here performs I/O; persistence and the
//! backend API live behind ports implemented in `dh-infra`.

pub mod documents;
pub mod error;
pub mod flow;
pub mod guard;
pub mod ledger;
pub mod ports;
pub mod review;
pub mod session;
pub mod steps;
pub mod validation;

pub use documents::{DocumentKind, DocumentRecord, DocumentSnapshot, RejectedDocument, ReviewStatus};
pub use error::OnboardingError;
pub use flow::{FlowPayload, ResubmissionCursor, ResubmissionPlan};
pub use ledger::StepLedger;
pub use review::{ReviewOutcome, ReviewSignal};
pub use session::{DriverProfile, SessionSnapshot};
pub use steps::{Route, StepId};
