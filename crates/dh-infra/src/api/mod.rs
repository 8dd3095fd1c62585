//! REST client for the onboarding backend.

mod client;
mod models;

pub use client::{ApiClient, ApiConfig, DEFAULT_TIMEOUT};
