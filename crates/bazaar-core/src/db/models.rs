// Domain models. Stored as JSON documents (camelCase field names) via the
// Adapter trait; the HTTP layer exposes separate request/response shapes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::plan::PlanTier;

/// Account role. Dealers sign up as `admin` and own products; `user` is a
/// plain buyer account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "Super Admin")]
    SuperAdmin,
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "Manager")]
    Manager,
    #[serde(rename = "user")]
    User,
}

impl Role {
    pub fn is_dealer(&self) -> bool {
        matches!(self, Role::Admin | Role::Manager)
    }
}

/// How the account was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginMethod {
    Local,
    Google,
}

/// One cart entry: a product reference plus a positive quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: String,
    pub quantity: u32,
}

/// Payout bank details captured at dealer signup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankDetails {
    pub beneficiary_name: String,
    pub business_type: String,
    pub ifsc_code: String,
    pub account_number: String,
}

/// User account. Dealer accounts additionally carry plan, payout and bank
/// fields; plain buyer accounts leave them unset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Scrypt hash; absent for Google-only accounts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_id: Option<String>,
    pub login_method: LoginMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub role: Role,
    pub is_dealer: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dealer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<PlanTier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_valid_until: Option<DateTime<Utc>>,
    /// Gateway sub-account receiving split transfers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payout_account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_details: Option<BankDetails>,
    pub is_active: bool,
    #[serde(default)]
    pub cart: Vec<CartLine>,
    #[serde(default)]
    pub wishlist: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a plain buyer account.
    pub fn new(id: String, name: String, email: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            email: email.to_lowercase(),
            phone: None,
            password: None,
            google_id: None,
            login_method: LoginMethod::Local,
            image: None,
            role: Role::User,
            is_dealer: false,
            dealer_name: None,
            plan: None,
            plan_valid_until: None,
            payout_account_id: None,
            bank_details: None,
            is_active: true,
            cart: Vec::new(),
            wishlist: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Catalog item owned by a dealer (`agent`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    /// Category label; used by the sales-by-category aggregation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Owning dealer user id.
    pub agent: String,
    pub product_price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<Decimal>,
    pub stock: i64,
    #[serde(default)]
    pub images: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Effective unit price: sale price when present, list price otherwise.
    pub fn unit_price(&self) -> Decimal {
        self.sale_price.unwrap_or(self.product_price)
    }
}

/// Shipping address owned by a user. Exactly one address per user carries
/// `is_default` at checkout time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: String,
    pub user: String,
    pub name: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub is_default: bool,
}

/// Fulfillment status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryStatus {
    Pending,
    Processing,
    Shipped,
    #[serde(rename = "Out for Delivery")]
    OutForDelivery,
    Delivered,
    Cancelled,
    Returned,
    #[serde(rename = "Failed Delivery")]
    FailedDelivery,
}

impl DeliveryStatus {
    /// Parse the wire form; anything outside the fixed set is rejected.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Pending" => Some(Self::Pending),
            "Processing" => Some(Self::Processing),
            "Shipped" => Some(Self::Shipped),
            "Out for Delivery" => Some(Self::OutForDelivery),
            "Delivered" => Some(Self::Delivered),
            "Cancelled" => Some(Self::Cancelled),
            "Returned" => Some(Self::Returned),
            "Failed Delivery" => Some(Self::FailedDelivery),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Shipped => "Shipped",
            Self::OutForDelivery => "Out for Delivery",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
            Self::Returned => "Returned",
            Self::FailedDelivery => "Failed Delivery",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Pending,
    Paid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "COD")]
    Cod,
    Razorpay,
}

impl PaymentMethod {
    /// Cash methods skip gateway-order creation entirely.
    pub fn is_cash(&self) -> bool {
        matches!(self, PaymentMethod::Cod)
    }
}

/// The single product line an order covers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub product: String,
    pub quantity: u32,
}

/// One purchase of a single product line. A checkout producing several
/// lines creates several orders sharing a `checkout_group_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    /// Correlates all orders created by one checkout.
    pub checkout_group_id: String,
    /// Buyer.
    pub user: String,
    /// Fulfilling dealer, resolved from the product at checkout.
    pub agent: String,
    pub order_items: OrderItem,
    /// Snapshot of the buyer's default address at checkout time.
    pub shipping_address: Address,
    pub payment_method: PaymentMethod,
    pub total_price: Decimal,
    /// Amount owed to the agent after commission.
    pub balance_total: Decimal,
    pub delivery_status: DeliveryStatus,
    pub payment_status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub razorpay_order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub razorpay_payment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub awb_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub courier_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
