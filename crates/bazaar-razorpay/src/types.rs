//! Wire types for gateway orders and split-payment transfers.

use std::collections::BTreeMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::RazorpayError;

/// Convert a major-unit amount (e.g. rupees) into minor units (paise).
pub fn minor_units(amount: Decimal) -> Result<i64, RazorpayError> {
    (amount * Decimal::from(100))
        .round()
        .to_i64()
        .ok_or_else(|| RazorpayError::InvalidAmount(amount.to_string()))
}

/// Instruction to route part of a payment to a dealer's sub-account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferSpec {
    /// Dealer's payout account id.
    pub account: String,
    /// Amount in minor units.
    pub amount: i64,
    pub currency: String,
    /// Free-form reconciliation notes (order id, product name).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub notes: BTreeMap<String, String>,
}

/// Request body for creating a gateway order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    /// Total amount in minor units.
    pub amount: i64,
    pub currency: String,
    /// Receipt id correlating back to our order documents.
    pub receipt: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transfers: Vec<TransferSpec>,
}

/// A gateway order as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}
