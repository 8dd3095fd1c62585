//! File-based verified-phone repository
//!
//! Stores the phone number that passed OTP verification on this device as a
//! small JSON file next to the step ledger.

use async_trait::async_trait;
use dh_core::ports::VerifiedPhonePort;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;

pub const DEFAULT_VERIFIED_PHONE_FILE: &str = ".verified_phone";

#[derive(Debug, Serialize, Deserialize)]
struct VerifiedPhoneRecord {
    phone: String,
}

pub struct FileVerifiedPhoneRepository {
    record_file_path: PathBuf,
}

impl FileVerifiedPhoneRepository {
    pub fn new(record_file_path: PathBuf) -> Self {
        Self { record_file_path }
    }

    pub fn with_defaults(base_dir: PathBuf) -> Self {
        Self {
            record_file_path: base_dir.join(DEFAULT_VERIFIED_PHONE_FILE),
        }
    }

    async fn ensure_parent_dir(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.record_file_path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl VerifiedPhonePort for FileVerifiedPhoneRepository {
    async fn load(&self) -> anyhow::Result<Option<String>> {
        if !self.record_file_path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.record_file_path).await?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        let record: VerifiedPhoneRecord = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse verified phone record: {}", e))?;

        Ok(Some(record.phone))
    }

    async fn save(&self, phone: &str) -> anyhow::Result<()> {
        self.ensure_parent_dir().await?;

        let record = VerifiedPhoneRecord {
            phone: phone.to_string(),
        };
        let json = serde_json::to_string_pretty(&record)
            .map_err(|e| anyhow::anyhow!("Failed to serialize verified phone record: {}", e))?;

        let mut file = fs::File::create(&self.record_file_path)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create verified phone file: {}", e))?;

        file.write_all(json.as_bytes())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to write verified phone file: {}", e))?;

        file.sync_all()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to sync verified phone file: {}", e))?;

        Ok(())
    }

    async fn clear(&self) -> anyhow::Result<()> {
        if self.record_file_path.exists() {
            fs::remove_file(&self.record_file_path).await?;
        }
        Ok(())
    }
}
