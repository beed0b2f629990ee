// Payment confirmation. Unauthenticated by design: the handler trusts
// the gateway signature alone, recomputed over `order_id|payment_id` and
// compared in constant time.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use bazaar_core::error::{ApiError, ErrorCode};
use bazaar_razorpay::signature::verify_payment_signature;

use crate::context::CommerceContext;

/// Fields posted back by the gateway's client-side checkout flow.
#[derive(Debug, Deserialize)]
pub struct VerifyPaymentRequest {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentResponse {
    pub success: bool,
    pub message: String,
    /// How many order documents were flipped to Paid.
    pub orders_updated: i64,
}

/// Handle `POST /order/payment/verify-payment`.
///
/// On a valid signature, every order sharing the gateway order id is
/// marked Paid and the payment id recorded. The check is stateless, so
/// re-submitting the same triple succeeds again without side effects
/// beyond rewriting the same values.
pub async fn handle_verify_payment(
    ctx: Arc<CommerceContext>,
    body: VerifyPaymentRequest,
) -> Result<VerifyPaymentResponse, ApiError> {
    let secret = ctx
        .payment_secret
        .as_deref()
        .ok_or_else(|| ApiError::internal(ErrorCode::PaymentGatewayFailure))?;

    if !verify_payment_signature(
        secret,
        &body.razorpay_order_id,
        &body.razorpay_payment_id,
        &body.razorpay_signature,
    ) {
        return Err(ApiError::bad_request(ErrorCode::SignatureMismatch));
    }

    let orders_updated = ctx
        .store
        .mark_orders_paid(&body.razorpay_order_id, &body.razorpay_payment_id)
        .await?;

    Ok(VerifyPaymentResponse {
        success: true,
        message: "Payment verified successfully".to_string(),
        orders_updated,
    })
}
