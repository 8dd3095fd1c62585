//! Application layer for the DriverHub onboarding flow.
//!
//! Wires the pure domain of `dh-core` to the outside world through injected
//! ports: the backend API, page navigation, and user notifications. Each use
//! case is a small struct holding `Arc<dyn Port>` references.

pub mod models;
pub mod ports;
pub mod session;
pub mod usecases;

pub use session::SessionContext;
pub use usecases::{
    BackNavigation, CompleteStep, GuardStepAccess, Logout, ManageSubscription, ReviewScreen,
    StepSubmission, VerifyPhone,
};
