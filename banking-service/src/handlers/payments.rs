use axum::{extract::State, Json};
use mongodb::bson::DateTime;
use service_core::error::AppError;
use uuid::Uuid;

use crate::{
    dtos::payment::{
        PayConfirmRequest, PayConfirmResponse, PaymentReceipt, PaymentRequest,
        PaymentSubmitResponse,
    },
    middleware::AuthUser,
    models::{Payment, PaymentStatus},
    utils::{password, ValidatedJson},
    AppState,
};

/// Submit an international payment: validate, debit the balance, record
/// the transfer.
pub async fn submit_payment(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    ValidatedJson(req): ValidatedJson<PaymentRequest>,
) -> Result<Json<PaymentSubmitResponse>, AppError> {
    let policy = state.config.account_policy;
    if !policy.matches(&req.recipient_account_no) {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "{}",
            policy.rejection_message()
        )));
    }

    // NaN fails this comparison too
    if !(req.amount_transfer > 0.0) {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Transfer amount must be greater than zero."
        )));
    }

    if state.users.find_by_id(&claims.sub).await?.is_none() {
        return Err(AppError::NotFound(anyhow::anyhow!("User not found.")));
    }

    let user_id: Uuid = claims
        .sub
        .parse()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("invalid subject claim: {}", e)))?;

    // Guarded debit: the balance filter fails instead of overdrawing, so a
    // concurrent submission cannot spend the same funds twice.
    let new_balance = state
        .users
        .try_debit(&claims.sub, req.amount_transfer)
        .await?
        .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("Insufficient balance.")))?;

    let payment = Payment {
        id: Uuid::new_v4(),
        recipient_name: req.recipient_name.clone(),
        recipient_bank: req.recipient_bank,
        recipient_account_no: req.recipient_account_no,
        amount_transfer: req.amount_transfer,
        swift_code: req.swift_code,
        currency: req.currency,
        user_id,
        created_at: DateTime::now(),
        status: PaymentStatus::Pending,
        is_verified: false,
    };

    if let Err(insert_err) = state.payments.insert(&payment).await {
        // Refund the debit before surfacing the failure
        tracing::error!(error = %insert_err, user_id = %claims.sub, "payment insert failed, refunding debit");
        if let Err(credit_err) = state.users.credit(&claims.sub, req.amount_transfer).await {
            tracing::error!(error = %credit_err, user_id = %claims.sub, "compensating credit failed");
        }
        return Err(AppError::Database(insert_err));
    }

    tracing::info!(
        transaction_id = %payment.id,
        user_id = %claims.sub,
        amount = req.amount_transfer,
        "payment submitted"
    );

    Ok(Json(PaymentSubmitResponse {
        message: "Payment submitted successfully.".to_string(),
        payment: PaymentReceipt {
            transaction_id: payment.id,
            recipient_name: req.recipient_name,
            amount_transfer: req.amount_transfer,
            new_balance,
            status: "success".to_string(),
        },
    }))
}

/// Re-authenticate the caller before finalizing a payment client-side.
/// Side-effect free.
pub async fn confirm_password(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    ValidatedJson(req): ValidatedJson<PayConfirmRequest>,
) -> Result<Json<PayConfirmResponse>, AppError> {
    let user = state
        .users
        .find_by_id(&claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("User not found.")))?;

    if !password::verify_password(&req.password, &user.password_hash)? {
        return Err(AppError::Forbidden(anyhow::anyhow!("Invalid password.")));
    }

    Ok(Json(PayConfirmResponse { valid: true }))
}
