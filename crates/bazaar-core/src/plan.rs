// Dealer subscription tiers and the commission table keyed by them.
//
// The platform retains `rate` of each order's price; the dealer receives
// the rest. A dealer without a (known) plan pays the 25% default rate.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Subscription tier a dealer can hold. Higher tiers pay lower commission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlanTier {
    #[serde(rename = "plan 1")]
    Plan1,
    #[serde(rename = "plan 2")]
    Plan2,
    #[serde(rename = "plan 3")]
    Plan3,
    #[serde(rename = "plan 4")]
    Plan4,
    #[serde(rename = "plan 5")]
    Plan5,
    #[serde(rename = "plan 6")]
    Plan6,
    #[serde(rename = "plan 7")]
    Plan7,
}

/// Commission rate applied when the dealer has no plan (or the plan label
/// is unknown). Highest rate, smallest payout.
pub fn default_commission_rate() -> Decimal {
    Decimal::new(25, 2)
}

impl PlanTier {
    /// The fraction of the order price retained by the platform.
    pub fn commission_rate(&self) -> Decimal {
        match self {
            PlanTier::Plan1 => Decimal::new(22, 2),
            PlanTier::Plan2 => Decimal::new(20, 2),
            PlanTier::Plan3 => Decimal::new(18, 2),
            PlanTier::Plan4 => Decimal::new(16, 2),
            PlanTier::Plan5 => Decimal::new(14, 2),
            PlanTier::Plan6 => Decimal::new(12, 2),
            PlanTier::Plan7 => Decimal::new(10, 2),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanTier::Plan1 => "plan 1",
            PlanTier::Plan2 => "plan 2",
            PlanTier::Plan3 => "plan 3",
            PlanTier::Plan4 => "plan 4",
            PlanTier::Plan5 => "plan 5",
            PlanTier::Plan6 => "plan 6",
            PlanTier::Plan7 => "plan 7",
        }
    }
}

/// Commission rate for an optional plan; `None` falls back to the default.
pub fn commission_rate(plan: Option<PlanTier>) -> Decimal {
    plan.map(|p| p.commission_rate())
        .unwrap_or_else(default_commission_rate)
}

/// Amount payable to the dealer after commission, rounded to 2 decimal
/// places: `order_price * (1 - rate)`.
pub fn balance_total(order_price: Decimal, plan: Option<PlanTier>) -> Decimal {
    let rate = commission_rate(plan);
    (order_price * (Decimal::ONE - rate)).round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commission_table_is_exact() {
        let expected = [
            (PlanTier::Plan1, Decimal::new(22, 2)),
            (PlanTier::Plan2, Decimal::new(20, 2)),
            (PlanTier::Plan3, Decimal::new(18, 2)),
            (PlanTier::Plan4, Decimal::new(16, 2)),
            (PlanTier::Plan5, Decimal::new(14, 2)),
            (PlanTier::Plan6, Decimal::new(12, 2)),
            (PlanTier::Plan7, Decimal::new(10, 2)),
        ];
        for (tier, rate) in expected {
            assert_eq!(tier.commission_rate(), rate, "{}", tier.as_str());
        }
        assert_eq!(commission_rate(None), Decimal::new(25, 2));
    }

    #[test]
    fn balance_total_per_tier() {
        let price = Decimal::new(10000, 2); // 100.00
        assert_eq!(balance_total(price, Some(PlanTier::Plan1)), Decimal::new(7800, 2));
        assert_eq!(balance_total(price, Some(PlanTier::Plan4)), Decimal::new(8400, 2));
        assert_eq!(balance_total(price, Some(PlanTier::Plan7)), Decimal::new(9000, 2));
        assert_eq!(balance_total(price, None), Decimal::new(7500, 2));
    }

    #[test]
    fn balance_total_rounds_to_two_places() {
        // 33.33 * 0.78 = 25.9974 → 26.00
        let price = Decimal::new(3333, 2);
        assert_eq!(balance_total(price, Some(PlanTier::Plan1)), Decimal::new(2600, 2));
        // 10.01 * 0.75 = 7.5075 → 7.51
        let price = Decimal::new(1001, 2);
        assert_eq!(balance_total(price, None), Decimal::new(751, 2));
    }

    #[test]
    fn plan_wire_form() {
        assert_eq!(serde_json::to_value(PlanTier::Plan3).unwrap(), "plan 3");
        let parsed: PlanTier = serde_json::from_value(serde_json::json!("plan 7")).unwrap();
        assert_eq!(parsed, PlanTier::Plan7);
        // Unknown labels fail typed parsing; callers treat that as "no plan".
        assert!(serde_json::from_value::<PlanTier>(serde_json::json!("plan 9")).is_err());
    }
}
