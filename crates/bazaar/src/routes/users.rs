// User administration: role-scoped listing, activation toggle, profile.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;

use bazaar_core::db::adapter::WhereClause;
use bazaar_core::db::models::{Role, User};
use bazaar_core::error::{ApiError, ErrorCode};

use crate::context::CommerceContext;
use crate::routes::PublicUser;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersResponse {
    pub success: bool,
    pub message: String,
    pub users: Vec<PublicUser>,
}

/// List users visible to the caller.
///
/// Super Admin sees every account below Super Admin. A dealer sees the
/// distinct buyers who ordered any of their products. Plain users see
/// nothing here.
pub async fn handle_list_users(
    ctx: Arc<CommerceContext>,
    caller_id: &str,
) -> Result<UsersResponse, ApiError> {
    let caller = ctx
        .store
        .find_user(caller_id)
        .await?
        .ok_or_else(|| ApiError::not_found(ErrorCode::UserNotFound))?;

    let users: Vec<User> = match caller.role {
        Role::SuperAdmin => {
            ctx.store
                .find_users(vec![WhereClause::ne("role", "Super Admin")])
                .await?
        }
        Role::Admin | Role::Manager => {
            let product_ids = ctx.store.product_ids_by_agent(&caller.id).await?;
            if product_ids.is_empty() {
                Vec::new()
            } else {
                let orders = ctx.store.orders_by_products(&product_ids).await?;
                let buyer_ids: HashSet<String> =
                    orders.into_iter().map(|o| o.user).collect();
                let mut buyers = Vec::with_capacity(buyer_ids.len());
                for id in buyer_ids {
                    if let Some(user) = ctx.store.find_user(&id).await? {
                        buyers.push(user);
                    }
                }
                buyers
            }
        }
        Role::User => return Err(ApiError::not_found(ErrorCode::UserNotFound)),
    };

    Ok(UsersResponse {
        success: true,
        message: "Users retrieved successfully.".to_string(),
        users: users.iter().map(PublicUser::from).collect(),
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleStatusResponse {
    pub success: bool,
    pub message: String,
    pub is_active: bool,
}

/// Flip a user's `is_active` flag (dealer approval / account disable).
pub async fn handle_toggle_status(
    ctx: Arc<CommerceContext>,
    user_id: &str,
) -> Result<ToggleStatusResponse, ApiError> {
    if user_id.is_empty() {
        return Err(ApiError::bad_request(ErrorCode::MissingRequiredFields));
    }

    let user = ctx
        .store
        .find_user(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found(ErrorCode::UserNotFound))?;

    let toggled = !user.is_active;
    ctx.store
        .update_user(user_id, serde_json::json!({ "isActive": toggled }))
        .await?;

    Ok(ToggleStatusResponse {
        success: true,
        message: "User updated successfully.".to_string(),
        is_active: toggled,
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetailResponse {
    pub success: bool,
    pub message: String,
    pub user: PublicUser,
}

/// The caller's own profile projection.
pub async fn handle_user_detail(
    ctx: Arc<CommerceContext>,
    caller_id: &str,
) -> Result<UserDetailResponse, ApiError> {
    let user = ctx
        .store
        .find_user(caller_id)
        .await?
        .ok_or_else(|| ApiError::not_found(ErrorCode::UserNotFound))?;

    Ok(UserDetailResponse {
        success: true,
        message: "User retrieved successfully.".to_string(),
        user: PublicUser::from(&user),
    })
}
