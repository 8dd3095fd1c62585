//! Infrastructure adapters: file-backed persistence for the step ledger and
//! the verified phone record, the REST client for the onboarding backend,
//! and an in-memory navigator for headless hosts.

pub mod api;
pub mod nav;
pub mod step_ledger;
pub mod verified_phone;

pub use api::{ApiClient, ApiConfig};
pub use nav::RecordingNavigator;
pub use step_ledger::FileStepLedgerRepository;
pub use verified_phone::FileVerifiedPhoneRepository;
