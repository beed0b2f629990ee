// Login with email/password, and Google sign-in via a verified ID token.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use bazaar_core::db::models::{LoginMethod, Role, User};
use bazaar_core::error::{ApiError, ErrorCode, HttpStatus};

use crate::context::CommerceContext;
use crate::crypto::password::verify_password;
use crate::crypto::token::sign_access_token;
use crate::routes::PublicUser;

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub success: bool,
    pub access_token: String,
    pub user_data: PublicUser,
    pub message: String,
}

/// Handle email/password login.
pub async fn handle_sign_in(
    ctx: Arc<CommerceContext>,
    body: SignInRequest,
) -> Result<SignInResponse, ApiError> {
    if body.email.is_empty() || body.password.is_empty() {
        return Err(ApiError::bad_request(ErrorCode::MissingRequiredFields));
    }

    let email = body.email.to_lowercase();
    let user = ctx
        .store
        .find_active_user_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::unauthorized(ErrorCode::InvalidEmailOrPassword))?;

    let hash = user
        .password
        .as_deref()
        .ok_or_else(|| ApiError::unauthorized(ErrorCode::InvalidEmailOrPassword))?;

    if !verify_password(hash, &body.password)? {
        return Err(ApiError::unauthorized(ErrorCode::InvalidEmailOrPassword));
    }

    let access_token = sign_access_token(
        &user.id,
        user.role,
        &ctx.options.secret,
        ctx.options.token_expiry_secs,
    )?;

    Ok(SignInResponse {
        success: true,
        access_token,
        user_data: PublicUser::from(&user),
        message: "Login successful".to_string(),
    })
}

#[derive(Debug, Deserialize)]
pub struct GoogleSignInRequest {
    /// Google ID token obtained client-side.
    pub token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleSignInResponse {
    pub success: bool,
    pub access_token: String,
    pub user_data: PublicUser,
    pub message: String,
    /// 201 when the account was just created, 200 otherwise.
    #[serde(skip)]
    pub status: HttpStatus,
}

/// Handle Google login: verify the ID token, create the account on first
/// sign-in, and issue the same access token as password login.
pub async fn handle_google_sign_in(
    ctx: Arc<CommerceContext>,
    body: GoogleSignInRequest,
) -> Result<GoogleSignInResponse, ApiError> {
    let verifier = ctx
        .google
        .as_ref()
        .ok_or_else(|| ApiError::internal(ErrorCode::GoogleVerificationFailed))?;

    let profile = verifier.verify(&body.token).await.map_err(ApiError::from)?;

    let email = profile.email.to_lowercase();
    let existing = ctx.store.find_user_by_email_or_phone(&email, None).await?;

    let (user, status, message) = match existing {
        Some(user) => (user, HttpStatus::Ok, "Login successful"),
        None => {
            let mut user = User::new(uuid::Uuid::new_v4().to_string(), profile.name, email);
            user.google_id = Some(profile.sub);
            user.login_method = LoginMethod::Google;
            user.image = profile.picture;
            user.role = Role::User;
            let user = ctx.store.create_user(&user).await?;
            (
                user,
                HttpStatus::Created,
                "Account has been created successfully",
            )
        }
    };

    let access_token = sign_access_token(
        &user.id,
        user.role,
        &ctx.options.secret,
        ctx.options.token_expiry_secs,
    )?;

    Ok(GoogleSignInResponse {
        success: true,
        access_token,
        user_data: PublicUser::from(&user),
        message: message.to_string(),
        status,
    })
}
