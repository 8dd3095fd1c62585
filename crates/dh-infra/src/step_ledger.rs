//! File-based step ledger repository
//!
//! Persists the completed-step ledger to a local JSON file in the
//! application data directory. A missing or empty file reads as an empty
//! ledger.

use async_trait::async_trait;
use dh_core::ledger::StepLedger;
use dh_core::ports::StepLedgerPort;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;

pub const DEFAULT_STEP_LEDGER_FILE: &str = ".completed_steps";

pub struct FileStepLedgerRepository {
    ledger_file_path: PathBuf,
}

impl FileStepLedgerRepository {
    /// Create repository with custom file path
    pub fn new(ledger_file_path: PathBuf) -> Self {
        Self { ledger_file_path }
    }

    /// Create repository with base dir and filename
    pub fn with_base_dir(base_dir: PathBuf, filename: impl Into<String>) -> Self {
        Self {
            ledger_file_path: base_dir.join(filename.into()),
        }
    }

    /// Create repository with defaults
    pub fn with_defaults(base_dir: PathBuf) -> Self {
        Self {
            ledger_file_path: base_dir.join(DEFAULT_STEP_LEDGER_FILE),
        }
    }

    async fn ensure_parent_dir(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.ledger_file_path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl StepLedgerPort for FileStepLedgerRepository {
    async fn load(&self) -> anyhow::Result<StepLedger> {
        if !self.ledger_file_path.exists() {
            return Ok(StepLedger::default());
        }

        let content = fs::read_to_string(&self.ledger_file_path).await?;

        if content.trim().is_empty() {
            return Ok(StepLedger::default());
        }

        let ledger: StepLedger = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse step ledger: {}", e))?;

        Ok(ledger)
    }

    async fn save(&self, ledger: &StepLedger) -> anyhow::Result<()> {
        self.ensure_parent_dir().await?;

        let json = serde_json::to_string_pretty(ledger)
            .map_err(|e| anyhow::anyhow!("Failed to serialize step ledger: {}", e))?;

        let mut file = fs::File::create(&self.ledger_file_path)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create ledger file: {}", e))?;

        file.write_all(json.as_bytes())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to write ledger file: {}", e))?;

        file.sync_all()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to sync ledger file: {}", e))?;

        Ok(())
    }

    async fn clear(&self) -> anyhow::Result<()> {
        if self.ledger_file_path.exists() {
            fs::remove_file(&self.ledger_file_path).await?;
        }
        Ok(())
    }
}
