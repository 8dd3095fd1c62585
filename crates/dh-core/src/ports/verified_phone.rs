use async_trait::async_trait;

/// Persistence port for the phone number that passed OTP verification on
/// this device. The signup page is only reachable after verification.
#[async_trait]
pub trait VerifiedPhonePort: Send + Sync {
    /// The verified phone number, or `None` when no verification happened.
    async fn load(&self) -> anyhow::Result<Option<String>>;

    async fn save(&self, phone: &str) -> anyhow::Result<()>;

    async fn clear(&self) -> anyhow::Result<()>;
}
