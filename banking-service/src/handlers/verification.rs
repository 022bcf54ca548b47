//! Admin-only transaction verification workflow.
//!
//! Each endpoint resolves the transaction first and fails 404 before any
//! further work. Field checks run against the stored transaction, not the
//! request body. Submission does not require that any field check ran.

use axum::{
    extract::{Path, State},
    Json,
};
use service_core::error::AppError;

use crate::{
    dtos::payment::PaymentView,
    dtos::verification::{TransactionListResponse, VerifiedBankResponse},
    dtos::MessageResponse,
    models::PaymentStatus,
    AppState,
};

fn transaction_not_found() -> AppError {
    AppError::NotFound(anyhow::anyhow!("Transaction not found"))
}

/// Every payment record, for the employee dashboard.
pub async fn list_transactions(
    State(state): State<AppState>,
) -> Result<Json<TransactionListResponse>, AppError> {
    let transactions = state.payments.list_all().await?;

    Ok(Json(TransactionListResponse {
        transactions: transactions.into_iter().map(PaymentView::from).collect(),
    }))
}

/// Blanket verification flag on a transaction.
pub async fn mark_verified(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    if !state.payments.set_verified(&transaction_id).await? {
        return Err(transaction_not_found());
    }

    Ok(Json(MessageResponse::new(
        "Transaction verified successfully",
    )))
}

/// Check the stored SWIFT code against the external registry and match the
/// reported bank against the stored recipient bank.
pub async fn verify_swift_code(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> Result<Json<VerifiedBankResponse>, AppError> {
    let transaction = state
        .payments
        .find_by_id(&transaction_id)
        .await?
        .ok_or_else(transaction_not_found)?;

    let lookup = state.bank_data.check_swift(&transaction.swift_code).await;

    let matched = lookup.valid
        && lookup
            .bank_name
            .as_deref()
            .is_some_and(|name| name.eq_ignore_ascii_case(&transaction.recipient_bank));

    if !matched {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "SWIFT Code and Bank Name do not match"
        )));
    }

    state.payments.set_verified(&transaction_id).await?;

    Ok(Json(VerifiedBankResponse {
        message: "SWIFT Code and Bank Name verified successfully".to_string(),
        bank_name: lookup.bank_name.unwrap_or_default(),
    }))
}

/// Resolve the bank holding the stored account number and match it against
/// the stored recipient bank.
pub async fn verify_recipient_account(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> Result<Json<VerifiedBankResponse>, AppError> {
    let transaction = state
        .payments
        .find_by_id(&transaction_id)
        .await?
        .ok_or_else(transaction_not_found)?;

    let lookup = state
        .bank_data
        .check_account(&transaction.recipient_account_no)
        .await;

    match lookup.bank_name {
        Some(name) if lookup.valid && name.eq_ignore_ascii_case(&transaction.recipient_bank) => {
            Ok(Json(VerifiedBankResponse {
                message: "Account Number and Bank Name verified successfully".to_string(),
                bank_name: name,
            }))
        }
        _ => Err(AppError::BadRequest(anyhow::anyhow!(
            "Account Number and Bank Name do not match"
        ))),
    }
}

pub async fn verify_recipient_name(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let transaction = state
        .payments
        .find_by_id(&transaction_id)
        .await?
        .ok_or_else(transaction_not_found)?;

    if transaction.recipient_name.is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Recipient name cannot be empty"
        )));
    }

    if transaction.recipient_name.chars().any(|c| c.is_ascii_digit()) {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Recipient name cannot contain numbers"
        )));
    }

    Ok(Json(MessageResponse::new(
        "Recipient Name is valid and verified successfully",
    )))
}

pub async fn verify_recipient_bank(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let transaction = state
        .payments
        .find_by_id(&transaction_id)
        .await?
        .ok_or_else(transaction_not_found)?;

    if transaction.recipient_bank.is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Recipient bank cannot be empty"
        )));
    }

    state.payments.set_verified(&transaction_id).await?;

    Ok(Json(MessageResponse::new(
        "Recipient Bank is valid and verified successfully",
    )))
}

pub async fn verify_amount(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let transaction = state
        .payments
        .find_by_id(&transaction_id)
        .await?
        .ok_or_else(transaction_not_found)?;

    if !transaction.amount_transfer.is_finite() || transaction.amount_transfer <= 0.0 {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Amount must be a number greater than 0"
        )));
    }

    Ok(Json(MessageResponse::new("Amount verified successfully")))
}

/// Finalize a transaction.
pub async fn submit_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    if !state
        .payments
        .set_status(&transaction_id, PaymentStatus::Successful)
        .await?
    {
        return Err(transaction_not_found());
    }

    tracing::info!(transaction_id = %transaction_id, "transaction submitted");

    Ok(Json(MessageResponse::new(
        "Transaction submitted successfully",
    )))
}

/// Reject a transaction and refund the owner. The guarded status
/// transition means a repeated reject can never credit twice.
pub async fn reject_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let Some(transaction) = state.payments.try_reject(&transaction_id).await? else {
        return match state.payments.find_by_id(&transaction_id).await? {
            Some(_) => Err(AppError::BadRequest(anyhow::anyhow!(
                "Transaction already rejected"
            ))),
            None => Err(transaction_not_found()),
        };
    };

    let credited = state
        .users
        .credit(
            &transaction.user_id.to_string(),
            transaction.amount_transfer,
        )
        .await?;

    if !credited {
        return Err(AppError::NotFound(anyhow::anyhow!("User not found")));
    }

    tracing::info!(
        transaction_id = %transaction_id,
        amount = transaction.amount_transfer,
        "transaction rejected and balance restored"
    );

    Ok(Json(MessageResponse::new(
        "Transaction rejected and balance updated",
    )))
}
