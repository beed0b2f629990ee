//! Axum HTTP surface for the bazaar service.
//!
//! Thin glue only: extract the bearer token, deserialize the body, call
//! the service handler, map the typed result (or `ApiError`) onto an HTTP
//! response. All behavior lives in the `bazaar` crate.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use bazaar::context::CommerceContext;
use bazaar::routes::{self, authenticate};
use bazaar::{analytics, checkout, payment};
use bazaar_core::error::ApiError;
use bazaar_core::HttpStatus;

// ─── Error Mapping ──────────────────────────────────────────────

/// Newtype so the core error can implement Axum's `IntoResponse`.
pub struct HttpError(pub ApiError);

impl From<ApiError> for HttpError {
    fn from(e: ApiError) -> Self {
        Self(e)
    }
}

fn status_code(status: HttpStatus) -> StatusCode {
    StatusCode::from_u16(status.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (status_code(self.0.status), Json(self.0.to_json())).into_response()
    }
}

type HandlerResult = Result<Response, HttpError>;

// ─── Token Extraction ───────────────────────────────────────────

/// Pull the bearer token out of the Authorization header.
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn authed_user_id(ctx: &CommerceContext, headers: &HeaderMap) -> Result<String, HttpError> {
    let token = bearer_token(headers);
    let claims = authenticate(ctx, token.as_deref())?;
    Ok(claims.sub)
}

// ─── Builder ────────────────────────────────────────────────────

/// Entry point wiring a [`CommerceContext`] into an Axum `Router`.
pub struct Bazaar {
    ctx: Arc<CommerceContext>,
}

impl Bazaar {
    pub fn new(ctx: Arc<CommerceContext>) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &Arc<CommerceContext> {
        &self.ctx
    }

    /// The full route table.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(handle_health))
            // Auth
            .route("/signup", post(handle_sign_up))
            .route("/login", post(handle_sign_in))
            .route("/google-login", post(handle_google_sign_in))
            // Users
            .route("/", get(handle_list_users))
            .route("/detail", get(handle_user_detail))
            .route("/admin/toggle-status/{id}", put(handle_toggle_status))
            // Cart
            .route("/cart", get(handle_get_cart).post(handle_add_to_cart))
            .route(
                "/cart/{product_id}",
                put(handle_update_cart_quantity).delete(handle_remove_from_cart),
            )
            // Wishlist
            .route(
                "/wishlist",
                get(handle_get_wishlist).post(handle_add_to_wishlist),
            )
            .route("/wishlist/{product_id}", axum::routing::delete(handle_remove_from_wishlist))
            // Addresses
            .route(
                "/address",
                get(handle_list_addresses).post(handle_create_address),
            )
            .route("/address/default/{id}", put(handle_set_default_address))
            // Orders
            .route("/order", get(handle_all_orders).post(handle_checkout))
            .route("/order/details", get(handle_orders_by_user))
            .route("/order/check-cart", get(handle_check_cart))
            .route("/order/payment/verify-payment", post(handle_verify_payment))
            .route("/order/delivery-status/{order_id}", put(handle_delivery_status))
            .route("/order/webhook/shipping", post(handle_shipping_webhook))
            .route("/order/weekly-orders", get(handle_weekly_orders))
            .route("/order/sales-by-category", get(handle_sales_by_category))
            .layer(TraceLayer::new_for_http())
            .with_state(self.ctx.clone())
    }

    /// Router with permissive CORS, for development. Configure CORS
    /// explicitly in production deployments.
    pub fn router_with_cors(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        self.router().layer(cors)
    }
}

// ─── Handlers ───────────────────────────────────────────────────

async fn handle_health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy", "service": "bazaar" }))
}

async fn handle_sign_up(
    State(ctx): State<Arc<CommerceContext>>,
    Json(body): Json<routes::sign_up::SignUpRequest>,
) -> HandlerResult {
    let result = routes::sign_up::handle_sign_up(ctx, body).await?;
    Ok((StatusCode::CREATED, Json(result)).into_response())
}

async fn handle_sign_in(
    State(ctx): State<Arc<CommerceContext>>,
    Json(body): Json<routes::sign_in::SignInRequest>,
) -> HandlerResult {
    let result = routes::sign_in::handle_sign_in(ctx, body).await?;
    Ok(Json(result).into_response())
}

async fn handle_google_sign_in(
    State(ctx): State<Arc<CommerceContext>>,
    Json(body): Json<routes::sign_in::GoogleSignInRequest>,
) -> HandlerResult {
    let result = routes::sign_in::handle_google_sign_in(ctx, body).await?;
    Ok((status_code(result.status), Json(result)).into_response())
}

async fn handle_list_users(
    State(ctx): State<Arc<CommerceContext>>,
    headers: HeaderMap,
) -> HandlerResult {
    let user_id = authed_user_id(&ctx, &headers)?;
    let result = routes::users::handle_list_users(ctx, &user_id).await?;
    Ok(Json(result).into_response())
}

async fn handle_user_detail(
    State(ctx): State<Arc<CommerceContext>>,
    headers: HeaderMap,
) -> HandlerResult {
    let user_id = authed_user_id(&ctx, &headers)?;
    let result = routes::users::handle_user_detail(ctx, &user_id).await?;
    Ok(Json(result).into_response())
}

async fn handle_toggle_status(
    State(ctx): State<Arc<CommerceContext>>,
    Path(id): Path<String>,
) -> HandlerResult {
    let result = routes::users::handle_toggle_status(ctx, &id).await?;
    Ok(Json(result).into_response())
}

async fn handle_get_cart(
    State(ctx): State<Arc<CommerceContext>>,
    headers: HeaderMap,
) -> HandlerResult {
    let user_id = authed_user_id(&ctx, &headers)?;
    let result = routes::cart::handle_get_cart(ctx, &user_id).await?;
    Ok(Json(result).into_response())
}

async fn handle_add_to_cart(
    State(ctx): State<Arc<CommerceContext>>,
    headers: HeaderMap,
    Json(body): Json<routes::cart::AddToCartRequest>,
) -> HandlerResult {
    let user_id = authed_user_id(&ctx, &headers)?;
    let result = routes::cart::handle_add_to_cart(ctx, &user_id, body).await?;
    Ok((StatusCode::CREATED, Json(result)).into_response())
}

async fn handle_update_cart_quantity(
    State(ctx): State<Arc<CommerceContext>>,
    headers: HeaderMap,
    Path(product_id): Path<String>,
    Json(body): Json<routes::cart::UpdateQuantityRequest>,
) -> HandlerResult {
    let user_id = authed_user_id(&ctx, &headers)?;
    let result = routes::cart::handle_update_quantity(ctx, &user_id, &product_id, body).await?;
    Ok(Json(result).into_response())
}

async fn handle_remove_from_cart(
    State(ctx): State<Arc<CommerceContext>>,
    headers: HeaderMap,
    Path(product_id): Path<String>,
) -> HandlerResult {
    let user_id = authed_user_id(&ctx, &headers)?;
    let result = routes::cart::handle_remove_from_cart(ctx, &user_id, &product_id).await?;
    Ok(Json(result).into_response())
}

async fn handle_get_wishlist(
    State(ctx): State<Arc<CommerceContext>>,
    headers: HeaderMap,
) -> HandlerResult {
    let user_id = authed_user_id(&ctx, &headers)?;
    let result = routes::wishlist::handle_get_wishlist(ctx, &user_id).await?;
    Ok(Json(result).into_response())
}

async fn handle_add_to_wishlist(
    State(ctx): State<Arc<CommerceContext>>,
    headers: HeaderMap,
    Json(body): Json<routes::wishlist::AddToWishlistRequest>,
) -> HandlerResult {
    let user_id = authed_user_id(&ctx, &headers)?;
    let result = routes::wishlist::handle_add_to_wishlist(ctx, &user_id, body).await?;
    Ok((StatusCode::CREATED, Json(result)).into_response())
}

async fn handle_remove_from_wishlist(
    State(ctx): State<Arc<CommerceContext>>,
    headers: HeaderMap,
    Path(product_id): Path<String>,
) -> HandlerResult {
    let user_id = authed_user_id(&ctx, &headers)?;
    let result = routes::wishlist::handle_remove_from_wishlist(ctx, &user_id, &product_id).await?;
    Ok(Json(result).into_response())
}

async fn handle_list_addresses(
    State(ctx): State<Arc<CommerceContext>>,
    headers: HeaderMap,
) -> HandlerResult {
    let user_id = authed_user_id(&ctx, &headers)?;
    let result = routes::address::handle_list_addresses(ctx, &user_id).await?;
    Ok(Json(result).into_response())
}

async fn handle_create_address(
    State(ctx): State<Arc<CommerceContext>>,
    headers: HeaderMap,
    Json(body): Json<routes::address::CreateAddressRequest>,
) -> HandlerResult {
    let user_id = authed_user_id(&ctx, &headers)?;
    let result = routes::address::handle_create_address(ctx, &user_id, body).await?;
    Ok((StatusCode::CREATED, Json(result)).into_response())
}

async fn handle_set_default_address(
    State(ctx): State<Arc<CommerceContext>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> HandlerResult {
    let user_id = authed_user_id(&ctx, &headers)?;
    let result = routes::address::handle_set_default_address(ctx, &user_id, &id).await?;
    Ok(Json(result).into_response())
}

async fn handle_all_orders(State(ctx): State<Arc<CommerceContext>>) -> HandlerResult {
    let result = routes::orders::handle_all_orders(ctx).await?;
    Ok(Json(result).into_response())
}

async fn handle_checkout(
    State(ctx): State<Arc<CommerceContext>>,
    headers: HeaderMap,
    Json(body): Json<checkout::CheckoutRequest>,
) -> HandlerResult {
    let user_id = authed_user_id(&ctx, &headers)?;
    let result = checkout::handle_checkout(ctx, &user_id, body).await?;
    Ok((StatusCode::CREATED, Json(result)).into_response())
}

async fn handle_orders_by_user(
    State(ctx): State<Arc<CommerceContext>>,
    headers: HeaderMap,
) -> HandlerResult {
    let user_id = authed_user_id(&ctx, &headers)?;
    let result = routes::orders::handle_orders_by_user(ctx, &user_id).await?;
    Ok(Json(result).into_response())
}

async fn handle_check_cart(
    State(ctx): State<Arc<CommerceContext>>,
    headers: HeaderMap,
) -> HandlerResult {
    let user_id = authed_user_id(&ctx, &headers)?;
    let result = routes::orders::handle_check_cart(ctx, &user_id).await?;
    Ok((status_code(result.status), Json(result)).into_response())
}

async fn handle_verify_payment(
    State(ctx): State<Arc<CommerceContext>>,
    Json(body): Json<payment::VerifyPaymentRequest>,
) -> HandlerResult {
    let result = payment::handle_verify_payment(ctx, body).await?;
    Ok(Json(result).into_response())
}

async fn handle_delivery_status(
    State(ctx): State<Arc<CommerceContext>>,
    Path(order_id): Path<String>,
    Json(body): Json<routes::orders::UpdateDeliveryStatusRequest>,
) -> HandlerResult {
    let result = routes::orders::handle_update_delivery_status(ctx, &order_id, body).await?;
    Ok(Json(result).into_response())
}

async fn handle_shipping_webhook(
    State(ctx): State<Arc<CommerceContext>>,
    Json(body): Json<routes::orders::ShippingWebhookRequest>,
) -> HandlerResult {
    let result = routes::orders::handle_shipping_webhook(ctx, body).await?;
    Ok(Json(result).into_response())
}

async fn handle_weekly_orders(
    State(ctx): State<Arc<CommerceContext>>,
    headers: HeaderMap,
) -> HandlerResult {
    authed_user_id(&ctx, &headers)?;
    let result = analytics::handle_weekly_orders(ctx).await?;
    Ok(Json(result).into_response())
}

async fn handle_sales_by_category(
    State(ctx): State<Arc<CommerceContext>>,
    headers: HeaderMap,
) -> HandlerResult {
    authed_user_id(&ctx, &headers)?;
    let result = analytics::handle_sales_by_category(ctx).await?;
    Ok(Json(result).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Bearer tok-123".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("tok-123".to_string()));

        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Basic abc".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);

        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn status_mapping_covers_taxonomy() {
        assert_eq!(status_code(HttpStatus::Ok), StatusCode::OK);
        assert_eq!(status_code(HttpStatus::BadRequest), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_code(HttpStatus::UnprocessableEntity),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_code(HttpStatus::InternalServerError),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
