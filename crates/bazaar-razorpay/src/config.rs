//! Gateway configuration.

use serde::{Deserialize, Serialize};

/// Razorpay credentials and endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RazorpayOptions {
    /// API key id (basic-auth username).
    pub key_id: String,
    /// API key secret (basic-auth password, also signs payment signatures).
    pub key_secret: String,
    /// API base URL; overridable for tests.
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

fn default_api_base() -> String {
    "https://api.razorpay.com".to_string()
}

impl RazorpayOptions {
    pub fn new(key_id: impl Into<String>, key_secret: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            key_secret: key_secret.into(),
            api_base: default_api_base(),
        }
    }

    /// Read `RAZORPAY_KEY_ID` / `RAZORPAY_KEY_SECRET`; `None` when either
    /// is unset (the service then runs without a payment gateway).
    pub fn from_env() -> Option<Self> {
        let key_id = std::env::var("RAZORPAY_KEY_ID").ok()?;
        let key_secret = std::env::var("RAZORPAY_KEY_SECRET").ok()?;
        Some(Self::new(key_id, key_secret))
    }
}
