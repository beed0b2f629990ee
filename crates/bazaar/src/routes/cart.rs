// Cart management. The cart lives embedded on the user document as
// `[{product, quantity}]`; handlers rewrite the whole array.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use bazaar_core::db::models::{CartLine, Product, User};
use bazaar_core::error::{ApiError, ErrorCode};

use crate::context::CommerceContext;

/// One cart line joined with its product for display.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    pub product: Product,
    pub quantity: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub success: bool,
    pub cart: Vec<CartLineView>,
}

async fn load_user(ctx: &CommerceContext, user_id: &str) -> Result<User, ApiError> {
    ctx.store
        .find_user(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found(ErrorCode::UserNotFound))
}

async fn save_cart(
    ctx: &CommerceContext,
    user_id: &str,
    cart: &[CartLine],
) -> Result<(), ApiError> {
    ctx.store
        .update_user(user_id, serde_json::json!({ "cart": cart }))
        .await?;
    Ok(())
}

/// Cart lines joined with product data. Lines whose product has been
/// deleted are left out of the view (the checkout policy decides their
/// fate at order time).
pub async fn handle_get_cart(
    ctx: Arc<CommerceContext>,
    user_id: &str,
) -> Result<CartResponse, ApiError> {
    let user = load_user(&ctx, user_id).await?;

    let ids: Vec<String> = user.cart.iter().map(|l| l.product.clone()).collect();
    let products = ctx.store.find_products_by_ids(&ids).await?;

    let cart = user
        .cart
        .iter()
        .filter_map(|line| {
            products
                .iter()
                .find(|p| p.id == line.product)
                .map(|p| CartLineView {
                    product: p.clone(),
                    quantity: line.quantity,
                })
        })
        .collect();

    Ok(CartResponse {
        success: true,
        cart,
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: String,
    pub quantity: u32,
}

/// Add a product to the cart, or bump the quantity of an existing line.
pub async fn handle_add_to_cart(
    ctx: Arc<CommerceContext>,
    user_id: &str,
    body: AddToCartRequest,
) -> Result<CartResponse, ApiError> {
    if body.quantity == 0 {
        return Err(ApiError::bad_request(ErrorCode::InvalidQuantity));
    }

    ctx.store
        .find_product(&body.product_id)
        .await?
        .ok_or_else(|| ApiError::not_found(ErrorCode::ProductNotFound))?;

    let mut user = load_user(&ctx, user_id).await?;
    match user.cart.iter_mut().find(|l| l.product == body.product_id) {
        Some(line) => line.quantity += body.quantity,
        None => user.cart.push(CartLine {
            product: body.product_id,
            quantity: body.quantity,
        }),
    }

    save_cart(&ctx, user_id, &user.cart).await?;
    handle_get_cart(ctx, user_id).await
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: u32,
}

/// Set the quantity of an existing cart line.
pub async fn handle_update_quantity(
    ctx: Arc<CommerceContext>,
    user_id: &str,
    product_id: &str,
    body: UpdateQuantityRequest,
) -> Result<CartResponse, ApiError> {
    if body.quantity == 0 {
        return Err(ApiError::bad_request(ErrorCode::InvalidQuantity));
    }

    let mut user = load_user(&ctx, user_id).await?;
    let line = user
        .cart
        .iter_mut()
        .find(|l| l.product == product_id)
        .ok_or_else(|| ApiError::not_found(ErrorCode::ProductNotFound))?;
    line.quantity = body.quantity;

    save_cart(&ctx, user_id, &user.cart).await?;
    handle_get_cart(ctx, user_id).await
}

/// Remove a cart line.
pub async fn handle_remove_from_cart(
    ctx: Arc<CommerceContext>,
    user_id: &str,
    product_id: &str,
) -> Result<CartResponse, ApiError> {
    let mut user = load_user(&ctx, user_id).await?;
    let before = user.cart.len();
    user.cart.retain(|l| l.product != product_id);
    if user.cart.len() == before {
        return Err(ApiError::not_found(ErrorCode::ProductNotFound));
    }

    save_cart(&ctx, user_id, &user.cart).await?;
    handle_get_cart(ctx, user_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use bazaar_core::db::models::Role;
    use bazaar_core::options::CommerceOptions;
    use bazaar_memory::MemoryAdapter;

    use crate::testing;

    fn ctx() -> Arc<CommerceContext> {
        CommerceContext::new(
            CommerceOptions::new("test-secret"),
            Arc::new(MemoryAdapter::new()),
        )
    }

    async fn seeded() -> Arc<CommerceContext> {
        let ctx = ctx();
        testing::seed_user(&ctx, "u1", Role::User, true).await;
        testing::seed_user(&ctx, "dealer", Role::Admin, true).await;
        testing::seed_product(&ctx, "p1", "dealer", "50.00", 10).await;
        testing::seed_product(&ctx, "p2", "dealer", "20.00", 5).await;
        ctx
    }

    #[tokio::test]
    async fn add_then_bump_quantity() {
        let ctx = seeded().await;
        let res = handle_add_to_cart(
            ctx.clone(),
            "u1",
            AddToCartRequest {
                product_id: "p1".into(),
                quantity: 2,
            },
        )
        .await
        .unwrap();
        assert_eq!(res.cart.len(), 1);
        assert_eq!(res.cart[0].quantity, 2);

        // Adding the same product again accumulates
        let res = handle_add_to_cart(
            ctx,
            "u1",
            AddToCartRequest {
                product_id: "p1".into(),
                quantity: 3,
            },
        )
        .await
        .unwrap();
        assert_eq!(res.cart.len(), 1);
        assert_eq!(res.cart[0].quantity, 5);
    }

    #[tokio::test]
    async fn zero_quantity_rejected() {
        let ctx = seeded().await;
        let err = handle_add_to_cart(
            ctx,
            "u1",
            AddToCartRequest {
                product_id: "p1".into(),
                quantity: 0,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidQuantity);
    }

    #[tokio::test]
    async fn unknown_product_rejected() {
        let ctx = seeded().await;
        let err = handle_add_to_cart(
            ctx,
            "u1",
            AddToCartRequest {
                product_id: "ghost".into(),
                quantity: 1,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductNotFound);
    }

    #[tokio::test]
    async fn update_and_remove() {
        let ctx = seeded().await;
        handle_add_to_cart(
            ctx.clone(),
            "u1",
            AddToCartRequest {
                product_id: "p1".into(),
                quantity: 1,
            },
        )
        .await
        .unwrap();
        handle_add_to_cart(
            ctx.clone(),
            "u1",
            AddToCartRequest {
                product_id: "p2".into(),
                quantity: 1,
            },
        )
        .await
        .unwrap();

        let res = handle_update_quantity(
            ctx.clone(),
            "u1",
            "p1",
            UpdateQuantityRequest { quantity: 4 },
        )
        .await
        .unwrap();
        let line = res.cart.iter().find(|l| l.product.id == "p1").unwrap();
        assert_eq!(line.quantity, 4);

        let res = handle_remove_from_cart(ctx, "u1", "p1").await.unwrap();
        assert_eq!(res.cart.len(), 1);
        assert_eq!(res.cart[0].product.id, "p2");
    }

    #[tokio::test]
    async fn deleted_product_hidden_from_view() {
        let ctx = seeded().await;
        handle_add_to_cart(
            ctx.clone(),
            "u1",
            AddToCartRequest {
                product_id: "p1".into(),
                quantity: 1,
            },
        )
        .await
        .unwrap();
        testing::delete_product(&ctx, "p1").await;

        let res = handle_get_cart(ctx, "u1").await.unwrap();
        assert!(res.cart.is_empty());
    }
}
