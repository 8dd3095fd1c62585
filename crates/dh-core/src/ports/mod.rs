//! Outbound ports for device-local persistence.

mod step_ledger;
mod verified_phone;

pub use step_ledger::StepLedgerPort;
pub use verified_phone::VerifiedPhonePort;
