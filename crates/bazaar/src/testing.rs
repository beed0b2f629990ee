// Shared fixtures for the unit tests: seeded documents, a recording mock
// gateway, and context constructors wired to the in-memory adapter.

use std::str::FromStr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use bazaar_core::db::adapter::{collections, WhereClause};
use bazaar_core::db::models::{
    Address, CartLine, DeliveryStatus, LoginMethod, Order, OrderItem, PaymentMethod,
    PaymentStatus, Product, Role, User,
};
use bazaar_core::options::CommerceOptions;
use bazaar_core::plan::PlanTier;
use bazaar_memory::MemoryAdapter;
use bazaar_razorpay::{CreateOrderRequest, GatewayOrder, PaymentGateway, RazorpayError};

use crate::context::CommerceContext;

/// Gateway double: records every request; optionally fails.
pub struct MockGateway {
    fail: bool,
    requests: Mutex<Vec<CreateOrderRequest>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            fail: false,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<CreateOrderRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn create_order(&self, req: &CreateOrderRequest) -> Result<GatewayOrder, RazorpayError> {
        if self.fail {
            return Err(RazorpayError::Api {
                status: 502,
                body: "gateway unavailable".into(),
            });
        }
        let mut requests = self.requests.lock().unwrap();
        requests.push(req.clone());
        Ok(GatewayOrder {
            id: format!("order_mock_{}", requests.len()),
            amount: req.amount,
            currency: req.currency.clone(),
            receipt: Some(req.receipt.clone()),
            status: Some("created".into()),
        })
    }
}

pub async fn context_with_gateway(
    options: CommerceOptions,
    gateway: Option<Arc<MockGateway>>,
) -> Arc<CommerceContext> {
    context_with_gateway_secret(options, gateway, "rzp-test-secret").await
}

pub async fn context_with_gateway_secret(
    options: CommerceOptions,
    gateway: Option<Arc<MockGateway>>,
    key_secret: &str,
) -> Arc<CommerceContext> {
    let builder = CommerceContext::builder(options, Arc::new(MemoryAdapter::new()));
    match gateway {
        Some(gateway) => builder.gateway(gateway, key_secret).build(),
        None => builder.build(),
    }
}

pub async fn seed_user(ctx: &CommerceContext, id: &str, role: Role, active: bool) -> User {
    let mut user = User::new(id.to_string(), id.to_string(), format!("{id}@example.com"));
    user.phone = Some(format!("phone-{id}"));
    user.role = role;
    user.is_active = active;
    ctx.store.create_user(&user).await.unwrap()
}

pub async fn seed_dealer(
    ctx: &CommerceContext,
    id: &str,
    plan: Option<PlanTier>,
    payout_account: Option<&str>,
) -> User {
    let mut user = User::new(id.to_string(), id.to_string(), format!("{id}@example.com"));
    user.phone = Some(format!("phone-{id}"));
    user.role = Role::Admin;
    user.is_dealer = true;
    user.dealer_name = Some(format!("{id} Traders"));
    user.login_method = LoginMethod::Local;
    user.plan = plan;
    user.plan_valid_until = plan.map(|_| Utc::now() + chrono::Duration::days(30));
    user.payout_account_id = payout_account.map(str::to_string);
    ctx.store.create_user(&user).await.unwrap()
}

pub async fn seed_product(
    ctx: &CommerceContext,
    id: &str,
    agent: &str,
    price: &str,
    stock: i64,
) -> Product {
    seed_product_inner(ctx, id, agent, price, stock, None).await
}

pub async fn seed_categorized_product(
    ctx: &CommerceContext,
    id: &str,
    agent: &str,
    price: &str,
    stock: i64,
    category: &str,
) -> Product {
    seed_product_inner(ctx, id, agent, price, stock, Some(category.to_string())).await
}

async fn seed_product_inner(
    ctx: &CommerceContext,
    id: &str,
    agent: &str,
    price: &str,
    stock: i64,
    category: Option<String>,
) -> Product {
    let now = Utc::now();
    let product = Product {
        id: id.to_string(),
        name: format!("Product {id}"),
        category,
        agent: agent.to_string(),
        product_price: Decimal::from_str(price).unwrap(),
        sale_price: None,
        stock,
        images: Vec::new(),
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    ctx.store.create_product(&product).await.unwrap()
}

pub fn snapshot_address(user: &str) -> Address {
    Address {
        id: format!("addr-{user}"),
        user: user.to_string(),
        name: user.to_string(),
        phone: "9876543210".into(),
        street: "14 MG Road".into(),
        city: "Bengaluru".into(),
        state: "Karnataka".into(),
        pincode: "560001".into(),
        is_default: true,
    }
}

pub async fn seed_default_address(ctx: &CommerceContext, user: &str) -> Address {
    ctx.store
        .create_address(&snapshot_address(user))
        .await
        .unwrap()
}

pub async fn seed_order(ctx: &CommerceContext, id: &str, user: &str, product: &Product) -> Order {
    seed_order_with_quantity(ctx, id, user, product, 1).await
}

pub async fn seed_order_with_quantity(
    ctx: &CommerceContext,
    id: &str,
    user: &str,
    product: &Product,
    quantity: u32,
) -> Order {
    let now = Utc::now();
    let total_price = product.unit_price() * Decimal::from(quantity);
    let order = Order {
        id: id.to_string(),
        checkout_group_id: format!("group-{id}"),
        user: user.to_string(),
        agent: product.agent.clone(),
        order_items: OrderItem {
            product: product.id.clone(),
            quantity,
        },
        shipping_address: snapshot_address(user),
        payment_method: PaymentMethod::Cod,
        total_price,
        balance_total: bazaar_core::plan::balance_total(total_price, None),
        delivery_status: DeliveryStatus::Pending,
        payment_status: PaymentStatus::Pending,
        razorpay_order_id: None,
        razorpay_payment_id: None,
        awb_code: None,
        courier_name: None,
        delivered_at: None,
        created_at: now,
        updated_at: now,
    };
    ctx.store.create_order(&order).await.unwrap()
}

pub async fn set_cart(ctx: &CommerceContext, user_id: &str, lines: Vec<CartLine>) {
    ctx.store
        .update_user(user_id, serde_json::json!({ "cart": lines }))
        .await
        .unwrap();
}

pub async fn set_stock(ctx: &CommerceContext, product_id: &str, stock: i64) {
    ctx.store.set_product_stock(product_id, stock).await.unwrap();
}

pub async fn set_plan_valid_until(ctx: &CommerceContext, user_id: &str, until: DateTime<Utc>) {
    ctx.store
        .update_user(user_id, serde_json::json!({ "planValidUntil": until }))
        .await
        .unwrap();
}

pub async fn delete_product(ctx: &CommerceContext, product_id: &str) {
    ctx.store
        .adapter()
        .delete(collections::PRODUCTS, &[WhereClause::eq("id", product_id)])
        .await
        .unwrap();
}
