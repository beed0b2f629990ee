// HTTP-level tests driving the full router with tower::ServiceExt::oneshot
// against the in-memory adapter, with no TCP server involved.

use std::str::FromStr;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::Utc;
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use tower::ServiceExt;

use bazaar::context::CommerceContext;
use bazaar_axum::Bazaar;
use bazaar_core::db::models::{Product, Role, User};
use bazaar_core::options::CommerceOptions;
use bazaar_memory::MemoryAdapter;
use bazaar_razorpay::signature::payment_signature;
use bazaar_razorpay::{CreateOrderRequest, GatewayOrder, PaymentGateway, RazorpayError};

const GATEWAY_SECRET: &str = "rzp-test-secret";

/// Stub gateway so checkout and payment verification have a collaborator.
struct StubGateway;

#[async_trait::async_trait]
impl PaymentGateway for StubGateway {
    async fn create_order(&self, req: &CreateOrderRequest) -> Result<GatewayOrder, RazorpayError> {
        Ok(GatewayOrder {
            id: "order_stub_1".to_string(),
            amount: req.amount,
            currency: req.currency.clone(),
            receipt: Some(req.receipt.clone()),
            status: Some("created".to_string()),
        })
    }
}

fn test_app() -> (Router, Arc<CommerceContext>) {
    let ctx = CommerceContext::builder(
        CommerceOptions::new("integration-secret"),
        Arc::new(MemoryAdapter::new()),
    )
    .gateway(Arc::new(StubGateway), GATEWAY_SECRET)
    .build();
    (Bazaar::new(ctx.clone()).router(), ctx)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::json!(null)
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::json!(null))
    };
    (status, json)
}

async fn seed_dealer_and_product(ctx: &CommerceContext) -> Product {
    let mut dealer = User::new(
        "dealer".to_string(),
        "Ravi Traders".to_string(),
        "dealer@example.com".to_string(),
    );
    dealer.role = Role::Admin;
    dealer.is_dealer = true;
    ctx.store.create_user(&dealer).await.unwrap();

    let now = Utc::now();
    let product = Product {
        id: "p1".to_string(),
        name: "Blue Kettle".to_string(),
        category: Some("Kitchen".to_string()),
        agent: "dealer".to_string(),
        product_price: Decimal::from_str("50.00").unwrap(),
        sale_price: None,
        stock: 10,
        images: Vec::new(),
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    ctx.store.create_product(&product).await.unwrap()
}

async fn sign_up_and_login(app: &Router, email: &str, phone: &str) -> String {
    let (status, _) = send(
        app,
        "POST",
        "/signup",
        None,
        Some(serde_json::json!({
            "name": "Asha",
            "email": email,
            "phone": phone,
            "password": "hunter22",
            "role": "user",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        app,
        "POST",
        "/login",
        None,
        Some(serde_json::json!({ "email": email, "password": "hunter22" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["accessToken"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_endpoint() {
    let (app, _ctx) = test_app();
    let (status, body) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn signup_rejects_duplicates_and_login_issues_token() {
    let (app, _ctx) = test_app();
    let token = sign_up_and_login(&app, "asha@example.com", "9876543210").await;
    assert!(!token.is_empty());

    // Same email again → 422
    let (status, body) = send(
        &app,
        "POST",
        "/signup",
        None,
        Some(serde_json::json!({
            "name": "Asha",
            "email": "asha@example.com",
            "phone": "9111111111",
            "password": "hunter22",
            "role": "user",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "USER_ALREADY_EXISTS");
}

#[tokio::test]
async fn detail_requires_bearer_token() {
    let (app, _ctx) = test_app();
    let (status, _) = send(&app, "GET", "/detail", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/detail", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = sign_up_and_login(&app, "asha@example.com", "9876543210").await;
    let (status, body) = send(&app, "GET", "/detail", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "asha@example.com");
}

#[tokio::test]
async fn cod_checkout_end_to_end() {
    let (app, ctx) = test_app();
    seed_dealer_and_product(&ctx).await;
    let token = sign_up_and_login(&app, "buyer@example.com", "9876543210").await;

    // Shipping address (first one becomes the default)
    let (status, _) = send(
        &app,
        "POST",
        "/address",
        Some(&token),
        Some(serde_json::json!({
            "name": "Asha",
            "phone": "9876543210",
            "street": "14 MG Road",
            "city": "Bengaluru",
            "state": "Karnataka",
            "pincode": "560001",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Two kettles into the cart
    let (status, _) = send(
        &app,
        "POST",
        "/cart",
        Some(&token),
        Some(serde_json::json!({ "productId": "p1", "quantity": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Everything in stock
    let (status, body) = send(&app, "GET", "/order/check-cart", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    // COD checkout: one order, no gateway order
    let (status, body) = send(
        &app,
        "POST",
        "/order",
        Some(&token),
        Some(serde_json::json!({ "paymentMethod": "COD" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["orders"].as_array().unwrap().len(), 1);
    assert_eq!(body["orders"][0]["totalPrice"], "100.00");
    assert!(body["orders"][0].get("razorpayOrderId").is_none());
    assert!(body.get("razorpayOrder").is_none());

    // Stock went down, cart is empty
    let product = ctx.store.find_product("p1").await.unwrap().unwrap();
    assert_eq!(product.stock, 8);
    let (_, cart) = send(&app, "GET", "/cart", Some(&token), None).await;
    assert_eq!(cart["cart"].as_array().unwrap().len(), 0);

    // The caller sees their order
    let (status, body) = send(&app, "GET", "/order/details", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["orders"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn insufficient_stock_checkout_names_product() {
    let (app, ctx) = test_app();
    seed_dealer_and_product(&ctx).await;
    let token = sign_up_and_login(&app, "buyer@example.com", "9876543210").await;

    send(
        &app,
        "POST",
        "/address",
        Some(&token),
        Some(serde_json::json!({
            "name": "Asha", "phone": "9876543210", "street": "14 MG Road",
            "city": "Bengaluru", "state": "Karnataka", "pincode": "560001",
        })),
    )
    .await;
    send(
        &app,
        "POST",
        "/cart",
        Some(&token),
        Some(serde_json::json!({ "productId": "p1", "quantity": 99 })),
    )
    .await;

    let (status, body) = send(
        &app,
        "POST",
        "/order",
        Some(&token),
        Some(serde_json::json!({ "paymentMethod": "COD" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INSUFFICIENT_STOCK");
    assert!(body["message"].as_str().unwrap().contains("Blue Kettle"));

    // Nothing was persisted
    assert!(ctx.store.all_orders().await.unwrap().is_empty());
    assert_eq!(ctx.store.find_product("p1").await.unwrap().unwrap().stock, 10);
}

#[tokio::test]
async fn online_checkout_and_signature_verification() {
    let (app, ctx) = test_app();
    seed_dealer_and_product(&ctx).await;
    let token = sign_up_and_login(&app, "buyer@example.com", "9876543210").await;

    send(
        &app,
        "POST",
        "/address",
        Some(&token),
        Some(serde_json::json!({
            "name": "Asha", "phone": "9876543210", "street": "14 MG Road",
            "city": "Bengaluru", "state": "Karnataka", "pincode": "560001",
        })),
    )
    .await;
    send(
        &app,
        "POST",
        "/cart",
        Some(&token),
        Some(serde_json::json!({ "productId": "p1", "quantity": 1 })),
    )
    .await;

    let (status, body) = send(
        &app,
        "POST",
        "/order",
        Some(&token),
        Some(serde_json::json!({ "paymentMethod": "Razorpay" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let gateway_order_id = body["razorpayOrder"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["razorpayOrder"]["amount"], 5000);
    assert_eq!(body["orders"][0]["razorpayOrderId"], gateway_order_id);

    // Tampered signature → 400, order stays Pending
    let (status, body) = send(
        &app,
        "POST",
        "/order/payment/verify-payment",
        None,
        Some(serde_json::json!({
            "razorpay_order_id": gateway_order_id,
            "razorpay_payment_id": "pay_1",
            "razorpay_signature": "forged",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "SIGNATURE_MISMATCH");

    // Valid signature → orders flip to Paid; a repeat succeeds too
    let signature = payment_signature(GATEWAY_SECRET, &gateway_order_id, "pay_1");
    for _ in 0..2 {
        let (status, body) = send(
            &app,
            "POST",
            "/order/payment/verify-payment",
            None,
            Some(serde_json::json!({
                "razorpay_order_id": gateway_order_id,
                "razorpay_payment_id": "pay_1",
                "razorpay_signature": signature,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
    }

    let orders = ctx.store.all_orders().await.unwrap();
    assert!(orders
        .iter()
        .all(|o| o.razorpay_payment_id.as_deref() == Some("pay_1")));
}

#[tokio::test]
async fn delivery_status_validation_over_http() {
    let (app, _ctx) = test_app();

    let (status, body) = send(
        &app,
        "PUT",
        "/order/delivery-status/ghost",
        None,
        Some(serde_json::json!({ "deliveryStatus": "Teleported" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_DELIVERY_STATUS");

    let (status, body) = send(
        &app,
        "PUT",
        "/order/delivery-status/ghost",
        None,
        Some(serde_json::json!({ "deliveryStatus": "Shipped" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "ORDER_NOT_FOUND");
}

#[tokio::test]
async fn cart_requires_authentication() {
    let (app, _ctx) = test_app();
    let (status, _) = send(&app, "GET", "/cart", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
