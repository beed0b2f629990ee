// Route handlers. Each submodule owns its request/response shapes; the
// HTTP crate does the framework glue.

pub mod address;
pub mod cart;
pub mod orders;
pub mod sign_in;
pub mod sign_up;
pub mod users;
pub mod wishlist;

use serde::Serialize;

use bazaar_core::db::models::{Role, User};
use bazaar_core::error::{ApiError, ErrorCode};

use crate::context::CommerceContext;
use crate::crypto::token::{verify_access_token, AccessClaims};

/// Public projection of a user, returned by auth and profile endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub role: Role,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            image: user.image.clone(),
            role: user.role,
        }
    }
}

/// Validate a bearer token and return its claims.
pub fn authenticate(
    ctx: &CommerceContext,
    token: Option<&str>,
) -> Result<AccessClaims, ApiError> {
    let token = token.ok_or_else(|| ApiError::unauthorized(ErrorCode::Unauthorized))?;
    verify_access_token(token, &ctx.options.secret)
        .ok_or_else(|| ApiError::unauthorized(ErrorCode::InvalidToken))
}
