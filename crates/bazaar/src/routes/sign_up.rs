// Account registration. Plain users activate immediately; dealer signups
// carry plan and payout details and wait for approval.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use bazaar_core::db::models::{BankDetails, LoginMethod, Role, User};
use bazaar_core::error::{ApiError, ErrorCode};
use bazaar_core::plan::PlanTier;

use crate::context::CommerceContext;
use crate::crypto::password::hash_password;

/// Sign-up request body. Dealer fields are required when `role` is a
/// dealer role and ignored otherwise.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub plan: Option<PlanTier>,
    #[serde(default)]
    pub beneficiary_name: Option<String>,
    #[serde(default)]
    pub business_type: Option<String>,
    #[serde(default)]
    pub ifsc_code: Option<String>,
    #[serde(default)]
    pub account_number: Option<String>,
    #[serde(default)]
    pub reentered_account_number: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpResponse {
    pub success: bool,
    pub message: String,
}

/// Handle account creation.
///
/// 1. Validate the common required fields
/// 2. For dealer roles, validate the payout fields
/// 3. Reject duplicate email/phone (422)
/// 4. Hash the password
/// 5. Persist the account (dealers start inactive, with a plan window)
pub async fn handle_sign_up(
    ctx: Arc<CommerceContext>,
    body: SignUpRequest,
) -> Result<SignUpResponse, ApiError> {
    // 1. Common required fields
    if body.name.is_empty()
        || body.email.is_empty()
        || body.phone.is_empty()
        || body.password.is_empty()
    {
        return Err(ApiError::bad_request(ErrorCode::MissingRequiredFields));
    }

    let is_dealer = body.role.is_dealer();

    // 2. Dealer payout fields
    if is_dealer {
        if body.account_number != body.reentered_account_number {
            return Err(ApiError::bad_request(ErrorCode::AccountNumberMismatch));
        }
        let complete = body.plan.is_some()
            && body.company_name.is_some()
            && body.beneficiary_name.is_some()
            && body.business_type.is_some()
            && body.ifsc_code.is_some()
            && body.account_number.is_some();
        if !complete {
            return Err(ApiError::bad_request(ErrorCode::MissingDealerFields));
        }
    }

    // 3. Duplicate account check (email OR phone)
    let email = body.email.to_lowercase();
    if ctx
        .store
        .find_user_by_email_or_phone(&email, Some(&body.phone))
        .await?
        .is_some()
    {
        return Err(ApiError::conflict(ErrorCode::UserAlreadyExists));
    }

    // 4. Hash before creating, so failures leave no orphaned record
    let password_hash = hash_password(&body.password)?;

    // 5. Persist
    let mut user = User::new(uuid::Uuid::new_v4().to_string(), body.name, email);
    user.phone = Some(body.phone);
    user.password = Some(password_hash);
    user.login_method = LoginMethod::Local;
    user.role = body.role;

    if is_dealer {
        user.is_dealer = true;
        user.dealer_name = body.company_name;
        user.plan = body.plan;
        user.plan_valid_until = Some(Utc::now() + Duration::days(ctx.options.plan_duration_days));
        // Bank fields were validated complete above.
        user.bank_details = match (
            body.beneficiary_name,
            body.business_type,
            body.ifsc_code,
            body.account_number,
        ) {
            (Some(beneficiary_name), Some(business_type), Some(ifsc_code), Some(account_number)) => {
                Some(BankDetails {
                    beneficiary_name,
                    business_type,
                    ifsc_code,
                    account_number,
                })
            }
            _ => None,
        };
        // Dealers wait for approval before they can sign in.
        user.is_active = false;
    }

    ctx.store.create_user(&user).await?;

    Ok(SignUpResponse {
        success: true,
        message: "Account has been created successfully".to_string(),
    })
}
