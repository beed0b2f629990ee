// Order queries, the delivery-status state machine, and the inbound
// shipping webhook.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use bazaar_core::db::models::{DeliveryStatus, Order};
use bazaar_core::error::{ApiError, ErrorCode, HttpStatus};

use crate::context::CommerceContext;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersResponse {
    pub success: bool,
    pub message: String,
    pub orders: Vec<Order>,
}

/// All orders, newest first (admin surface).
pub async fn handle_all_orders(ctx: Arc<CommerceContext>) -> Result<OrdersResponse, ApiError> {
    let orders = ctx.store.all_orders().await?;
    if orders.is_empty() {
        return Err(ApiError::with_message(
            HttpStatus::NotFound,
            ErrorCode::OrderNotFound,
            "No orders found. Please place an order first.",
        ));
    }

    Ok(OrdersResponse {
        success: true,
        message: "Orders retrieved successfully.".to_string(),
        orders,
    })
}

/// The caller's own orders.
pub async fn handle_orders_by_user(
    ctx: Arc<CommerceContext>,
    user_id: &str,
) -> Result<OrdersResponse, ApiError> {
    let orders = ctx.store.orders_by_user(user_id).await?;
    Ok(OrdersResponse {
        success: true,
        message: "Orders retrieved successfully.".to_string(),
        orders,
    })
}

/// One cart line that cannot be fulfilled at current stock.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnavailableLine {
    pub product_id: String,
    pub name: String,
    pub available_stock: i64,
    pub requested_quantity: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckCartResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unavailable_products: Vec<UnavailableLine>,
    /// 400 when any line is short, 200 otherwise.
    #[serde(skip)]
    pub status: HttpStatus,
}

/// Pre-checkout availability report. Lines whose product has vanished are
/// not reported here; checkout's missing-product policy handles them.
pub async fn handle_check_cart(
    ctx: Arc<CommerceContext>,
    user_id: &str,
) -> Result<CheckCartResponse, ApiError> {
    let user = ctx
        .store
        .find_user(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found(ErrorCode::UserNotFound))?;

    let ids: Vec<String> = user.cart.iter().map(|l| l.product.clone()).collect();
    let products = ctx.store.find_products_by_ids(&ids).await?;

    let unavailable: Vec<UnavailableLine> = user
        .cart
        .iter()
        .filter_map(|line| {
            let product = products.iter().find(|p| p.id == line.product)?;
            (product.stock < i64::from(line.quantity)).then(|| UnavailableLine {
                product_id: product.id.clone(),
                name: product.name.clone(),
                available_stock: product.stock,
                requested_quantity: line.quantity,
            })
        })
        .collect();

    if unavailable.is_empty() {
        Ok(CheckCartResponse {
            success: true,
            message: "All products are available".to_string(),
            unavailable_products: vec![],
            status: HttpStatus::Ok,
        })
    } else {
        Ok(CheckCartResponse {
            success: false,
            message: "Some products are out of stock".to_string(),
            unavailable_products: unavailable,
            status: HttpStatus::BadRequest,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDeliveryStatusRequest {
    pub delivery_status: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub success: bool,
    pub message: String,
    pub order: Order,
}

/// Advance an order's delivery status.
///
/// `Delivered` stamps `delivered_at`. `Returned` is guarded: the order
/// must already be delivered, and no more than `return_window_days` whole
/// days may have passed since delivery (day 7 is accepted, day 8 is not).
/// Every other transition is unguarded.
pub async fn handle_update_delivery_status(
    ctx: Arc<CommerceContext>,
    order_id: &str,
    body: UpdateDeliveryStatusRequest,
) -> Result<OrderResponse, ApiError> {
    if order_id.is_empty() || body.delivery_status.is_empty() {
        return Err(ApiError::bad_request(ErrorCode::MissingRequiredFields));
    }

    let status = DeliveryStatus::parse(&body.delivery_status)
        .ok_or_else(|| ApiError::bad_request(ErrorCode::InvalidDeliveryStatus))?;

    let order = ctx
        .store
        .find_order(order_id)
        .await?
        .ok_or_else(|| ApiError::not_found(ErrorCode::OrderNotFound))?;

    if status == DeliveryStatus::Returned {
        let delivered_at = order
            .delivered_at
            .ok_or_else(|| ApiError::bad_request(ErrorCode::OrderNotDelivered))?;
        let elapsed_days = (Utc::now() - delivered_at).num_days();
        if elapsed_days > ctx.options.return_window_days {
            return Err(ApiError::bad_request(ErrorCode::ReturnWindowExpired));
        }
    }

    let mut patch = serde_json::json!({
        "deliveryStatus": status,
        "updatedAt": Utc::now(),
    });
    if status == DeliveryStatus::Delivered {
        patch["deliveredAt"] = serde_json::to_value(Utc::now())
            .map_err(|_| ApiError::internal(ErrorCode::InternalServerError))?;
    }

    let order = ctx
        .store
        .update_order(order_id, patch)
        .await?
        .ok_or_else(|| ApiError::not_found(ErrorCode::OrderNotFound))?;

    Ok(OrderResponse {
        success: true,
        message: "Delivery status updated successfully".to_string(),
        order,
    })
}

/// Push payload from the shipping provider. No signature, no idempotency
/// key: fields are overwritten as-is, which is the provider's contract.
#[derive(Debug, Deserialize)]
pub struct ShippingWebhookRequest {
    pub order_id: String,
    pub status: String,
    #[serde(default)]
    pub awb_code: Option<String>,
    #[serde(default)]
    pub courier_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingWebhookResponse {
    pub success: bool,
    pub message: String,
}

/// Handle `POST /order/webhook/shipping`.
pub async fn handle_shipping_webhook(
    ctx: Arc<CommerceContext>,
    body: ShippingWebhookRequest,
) -> Result<ShippingWebhookResponse, ApiError> {
    let status = DeliveryStatus::parse(&body.status)
        .ok_or_else(|| ApiError::bad_request(ErrorCode::InvalidDeliveryStatus))?;

    ctx.store
        .find_order(&body.order_id)
        .await?
        .ok_or_else(|| ApiError::not_found(ErrorCode::OrderNotFound))?;

    let mut patch = serde_json::json!({
        "deliveryStatus": status,
        "awbCode": body.awb_code,
        "courierName": body.courier_name,
        "updatedAt": Utc::now(),
    });
    if status == DeliveryStatus::Delivered {
        patch["deliveredAt"] = serde_json::to_value(Utc::now())
            .map_err(|_| ApiError::internal(ErrorCode::InternalServerError))?;
    }

    ctx.store.update_order(&body.order_id, patch).await?;

    Ok(ShippingWebhookResponse {
        success: true,
        message: "Webhook processed successfully".to_string(),
    })
}
