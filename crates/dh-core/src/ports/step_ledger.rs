use async_trait::async_trait;

use crate::ledger::StepLedger;

/// Persistence port for the step ledger.
///
/// Implementations return a default (empty) ledger when nothing has been
/// stored yet.
#[async_trait]
pub trait StepLedgerPort: Send + Sync {
    async fn load(&self) -> anyhow::Result<StepLedger>;

    async fn save(&self, ledger: &StepLedger) -> anyhow::Result<()>;

    /// Remove the stored ledger entirely.
    async fn clear(&self) -> anyhow::Result<()>;
}
