// Checkout: convert the caller's cart into one order per line, deduct
// stock, resolve each product's owning dealer and commission rate, and
// (for online payment) create one aggregate gateway order carrying
// per-dealer transfer instructions.
//
// Line conversion is all-or-nothing: when a line fails (insufficient
// stock, or a missing product under the `Fail` policy), every order
// created so far is deleted and every stock decrement restored before the
// error is returned. A gateway failure *after* conversion does not
// unwind; the orders stay payable and the caller retries payment.

use std::collections::BTreeMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bazaar_core::db::models::{
    DeliveryStatus, Order, OrderItem, PaymentMethod, PaymentStatus,
};
use bazaar_core::error::{ApiError, ErrorCode, HttpStatus};
use bazaar_core::options::MissingProductPolicy;
use bazaar_core::plan;
use bazaar_razorpay::{minor_units, CreateOrderRequest, GatewayOrder, TransferSpec};

use crate::context::CommerceContext;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub success: bool,
    pub message: String,
    pub payment_method: PaymentMethod,
    pub orders: Vec<Order>,
    pub total_amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub razorpay_order: Option<GatewayOrder>,
}

/// A created order plus the stock value to restore if the checkout has to
/// be unwound.
struct ConvertedLine {
    order: Order,
    product_id: String,
    previous_stock: i64,
}

/// Handle `POST /order`.
pub async fn handle_checkout(
    ctx: Arc<CommerceContext>,
    user_id: &str,
    body: CheckoutRequest,
) -> Result<CheckoutResponse, ApiError> {
    let currency = body
        .currency
        .clone()
        .unwrap_or_else(|| ctx.options.currency.clone());

    // Exactly one default address is the shipping snapshot for every line.
    let shipping_address = ctx
        .store
        .find_default_address(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found(ErrorCode::AddressNotFound))?;

    let user = ctx
        .store
        .find_user(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found(ErrorCode::UserNotFound))?;
    if user.cart.is_empty() {
        return Err(ApiError::bad_request(ErrorCode::CartEmpty));
    }

    let checkout_group_id = uuid::Uuid::new_v4().to_string();
    let mut converted: Vec<ConvertedLine> = Vec::new();
    let mut transfers: Vec<TransferSpec> = Vec::new();
    let mut total_amount = Decimal::ZERO;

    for line in &user.cart {
        let product = match ctx.store.find_product(&line.product).await? {
            Some(p) => p,
            None => match ctx.options.missing_product_policy {
                MissingProductPolicy::Skip => continue,
                MissingProductPolicy::Fail => {
                    unwind(&ctx, &converted).await;
                    return Err(ApiError::with_message(
                        HttpStatus::NotFound,
                        ErrorCode::ProductNotFound,
                        format!("Product {} is no longer available", line.product),
                    ));
                }
            },
        };

        if product.stock < i64::from(line.quantity) {
            unwind(&ctx, &converted).await;
            return Err(ApiError::with_message(
                HttpStatus::BadRequest,
                ErrorCode::InsufficientStock,
                format!("Insufficient stock for {}", product.name),
            ));
        }

        let order_price = (product.unit_price() * Decimal::from(line.quantity)).round_dp(2);

        // Commission comes from the owning dealer's plan; a vanished or
        // plan-less dealer pays the default rate.
        let agent = ctx.store.find_user(&product.agent).await?;
        let agent_plan = agent.as_ref().and_then(|a| a.plan);
        let balance_total = plan::balance_total(order_price, agent_plan);

        let now = chrono::Utc::now();
        let order = Order {
            id: uuid::Uuid::new_v4().to_string(),
            checkout_group_id: checkout_group_id.clone(),
            user: user_id.to_string(),
            agent: product.agent.clone(),
            order_items: OrderItem {
                product: product.id.clone(),
                quantity: line.quantity,
            },
            shipping_address: shipping_address.clone(),
            payment_method: body.payment_method,
            total_price: order_price,
            balance_total,
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

        let order = match ctx.store.create_order(&order).await {
            Ok(order) => order,
            Err(e) => {
                unwind(&ctx, &converted).await;
                return Err(e.into());
            }
        };

        if let Err(e) = ctx
            .store
            .set_product_stock(&product.id, product.stock - i64::from(line.quantity))
            .await
        {
            // The just-created order participates in the unwind too.
            converted.push(ConvertedLine {
                order,
                product_id: product.id.clone(),
                previous_stock: product.stock,
            });
            unwind(&ctx, &converted).await;
            return Err(e.into());
        }

        if let Some(account) = agent.and_then(|a| a.payout_account_id) {
            let mut notes = BTreeMap::new();
            notes.insert("order_id".to_string(), order.id.clone());
            notes.insert("product".to_string(), product.name.clone());
            transfers.push(TransferSpec {
                account,
                amount: minor_units(balance_total)
                    .map_err(|_| ApiError::internal(ErrorCode::InternalServerError))?,
                currency: currency.clone(),
                notes,
            });
        }

        total_amount += order_price;
        converted.push(ConvertedLine {
            order,
            product_id: product.id.clone(),
            previous_stock: product.stock,
        });
    }

    if converted.is_empty() {
        // Every line pointed at a vanished product.
        return Err(ApiError::with_message(
            HttpStatus::BadRequest,
            ErrorCode::CartEmpty,
            "Cart has no purchasable items",
        ));
    }

    let mut orders: Vec<Order> = converted.into_iter().map(|c| c.order).collect();

    if body.payment_method.is_cash() {
        clear_cart(&ctx, user_id).await?;
        return Ok(CheckoutResponse {
            success: true,
            message: "Orders created successfully from cart".to_string(),
            payment_method: body.payment_method,
            orders,
            total_amount,
            razorpay_order: None,
        });
    }

    // One gateway order covers the whole checkout; the receipt points at
    // the first order for reconciliation.
    let gateway = ctx
        .gateway
        .as_ref()
        .ok_or_else(|| ApiError::internal(ErrorCode::PaymentGatewayFailure))?;

    let request = CreateOrderRequest {
        amount: minor_units(total_amount)
            .map_err(|_| ApiError::internal(ErrorCode::InternalServerError))?,
        currency: currency.clone(),
        receipt: format!("receipt_{}", orders[0].id),
        transfers,
    };

    let gateway_order = gateway.create_order(&request).await.map_err(|e| {
        tracing::error!(error = %e, "gateway order creation failed");
        ApiError::internal(ErrorCode::PaymentGatewayFailure)
    })?;

    ctx.store
        .stamp_gateway_order(&checkout_group_id, &gateway_order.id)
        .await?;
    for order in &mut orders {
        order.razorpay_order_id = Some(gateway_order.id.clone());
    }

    clear_cart(&ctx, user_id).await?;

    Ok(CheckoutResponse {
        success: true,
        message: "Orders created successfully from cart".to_string(),
        payment_method: body.payment_method,
        orders,
        total_amount,
        razorpay_order: Some(gateway_order),
    })
}

async fn clear_cart(ctx: &CommerceContext, user_id: &str) -> Result<(), ApiError> {
    ctx.store
        .update_user(
            user_id,
            serde_json::json!({ "cart": Vec::<bazaar_core::db::models::CartLine>::new() }),
        )
        .await?;
    Ok(())
}

/// Compensation: delete the orders created so far and restore the stock
/// values they consumed. Best-effort; failures are logged, not surfaced
/// over the original error.
async fn unwind(ctx: &CommerceContext, converted: &[ConvertedLine]) {
    for line in converted.iter().rev() {
        if let Err(e) = ctx
            .store
            .set_product_stock(&line.product_id, line.previous_stock)
            .await
        {
            tracing::error!(product = %line.product_id, error = %e, "stock restore failed");
        }
        if let Err(e) = ctx.store.delete_order(&line.order.id).await {
            tracing::error!(order = %line.order.id, error = %e, "order rollback failed");
        }
    }
}
