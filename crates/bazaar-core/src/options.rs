// Service configuration assembled at startup (env or code) and shared
// through the context.

use serde::{Deserialize, Serialize};

/// What checkout does with a cart line whose product no longer exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingProductPolicy {
    /// Drop the line silently and convert the rest of the cart.
    Skip,
    /// Abort the checkout with a product-not-found error.
    Fail,
}

impl Default for MissingProductPolicy {
    fn default() -> Self {
        MissingProductPolicy::Skip
    }
}

/// Top-level service options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommerceOptions {
    /// Secret used to sign access tokens.
    pub secret: String,
    /// ISO currency code used for orders and gateway amounts.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// How long a dealer's plan stays valid after signup.
    #[serde(default = "default_plan_duration_days")]
    pub plan_duration_days: i64,
    /// Window (whole days since delivery) during which a return is accepted.
    #[serde(default = "default_return_window_days")]
    pub return_window_days: i64,
    /// Access-token lifetime in seconds.
    #[serde(default = "default_token_expiry_secs")]
    pub token_expiry_secs: u64,
    #[serde(default)]
    pub missing_product_policy: MissingProductPolicy,
}

fn default_currency() -> String {
    "INR".to_string()
}

fn default_plan_duration_days() -> i64 {
    30
}

fn default_return_window_days() -> i64 {
    7
}

fn default_token_expiry_secs() -> u64 {
    7 * 24 * 60 * 60
}

impl CommerceOptions {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            currency: default_currency(),
            plan_duration_days: default_plan_duration_days(),
            return_window_days: default_return_window_days(),
            token_expiry_secs: default_token_expiry_secs(),
            missing_product_policy: MissingProductPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opts = CommerceOptions::new("secret");
        assert_eq!(opts.currency, "INR");
        assert_eq!(opts.plan_duration_days, 30);
        assert_eq!(opts.return_window_days, 7);
        assert_eq!(opts.missing_product_policy, MissingProductPolicy::Skip);
    }

    #[test]
    fn policy_deserializes_from_config() {
        let opts: CommerceOptions = serde_json::from_value(serde_json::json!({
            "secret": "s",
            "missing_product_policy": "fail",
        }))
        .unwrap();
        assert_eq!(opts.missing_product_policy, MissingProductPolicy::Fail);
    }
}
