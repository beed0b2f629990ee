// Wishlist: a set of product references embedded on the user document.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use bazaar_core::db::models::Product;
use bazaar_core::error::{ApiError, ErrorCode};

use crate::context::CommerceContext;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistResponse {
    pub success: bool,
    pub wishlist: Vec<Product>,
}

pub async fn handle_get_wishlist(
    ctx: Arc<CommerceContext>,
    user_id: &str,
) -> Result<WishlistResponse, ApiError> {
    let user = ctx
        .store
        .find_user(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found(ErrorCode::UserNotFound))?;

    let products = ctx.store.find_products_by_ids(&user.wishlist).await?;
    Ok(WishlistResponse {
        success: true,
        wishlist: products,
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToWishlistRequest {
    pub product_id: String,
}

/// Add a product; already-present products are a no-op (set semantics).
pub async fn handle_add_to_wishlist(
    ctx: Arc<CommerceContext>,
    user_id: &str,
    body: AddToWishlistRequest,
) -> Result<WishlistResponse, ApiError> {
    ctx.store
        .find_product(&body.product_id)
        .await?
        .ok_or_else(|| ApiError::not_found(ErrorCode::ProductNotFound))?;

    let mut user = ctx
        .store
        .find_user(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found(ErrorCode::UserNotFound))?;

    if !user.wishlist.contains(&body.product_id) {
        user.wishlist.push(body.product_id);
        ctx.store
            .update_user(user_id, serde_json::json!({ "wishlist": user.wishlist }))
            .await?;
    }

    handle_get_wishlist(ctx, user_id).await
}

pub async fn handle_remove_from_wishlist(
    ctx: Arc<CommerceContext>,
    user_id: &str,
    product_id: &str,
) -> Result<WishlistResponse, ApiError> {
    let mut user = ctx
        .store
        .find_user(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found(ErrorCode::UserNotFound))?;

    let before = user.wishlist.len();
    user.wishlist.retain(|p| p != product_id);
    if user.wishlist.len() == before {
        return Err(ApiError::not_found(ErrorCode::ProductNotFound));
    }

    ctx.store
        .update_user(user_id, serde_json::json!({ "wishlist": user.wishlist }))
        .await?;

    handle_get_wishlist(ctx, user_id).await
}
