//! Application-level models returned by the backend API port.

use chrono::{DateTime, Utc};
use dh_core::documents::DocumentKind;
use serde::Serialize;

/// Result of an accepted step submission.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StepAccepted {
    pub message: String,
    /// Updated hint, when the server includes one in the response.
    pub next_required_step: Option<DocumentKind>,
}

/// A purchasable subscription plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plan {
    pub id: String,
    pub name: String,
    /// Price in the currency's minor unit (cents).
    pub amount: u64,
    pub currency: String,
    pub interval: Option<String>,
}

/// The driver's current subscription, when one exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubscriptionDetails {
    pub id: String,
    pub plan_id: String,
    pub status: String,
    pub current_period_end: Option<DateTime<Utc>>,
}

/// Checkout hand-off returned by a plan purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchaseOutcome {
    /// External checkout URL to open. Absent when the purchase completed
    /// without a checkout step.
    pub checkout_url: Option<String>,
    pub message: String,
}
