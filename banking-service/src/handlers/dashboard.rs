use axum::{extract::State, Json};
use service_core::error::AppError;

use crate::{
    dtos::account::{DashboardResponse, DepositRequest, DepositResponse},
    dtos::payment::PaymentView,
    middleware::AuthUser,
    AppState,
};

/// Account overview: profile fields, balance and payment receipts.
pub async fn get_dashboard(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<DashboardResponse>, AppError> {
    let user = state
        .users
        .find_by_id(&claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("User not found")))?;

    let payments = state.payments.find_by_user(&claims.sub).await?;

    Ok(Json(DashboardResponse {
        name: user.first_name,
        account_number: user.account_number,
        balance: user.balance,
        payments: payments.into_iter().map(PaymentView::from).collect(),
    }))
}

/// Add funds to the caller's balance.
pub async fn deposit(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(req): Json<DepositRequest>,
) -> Result<Json<DepositResponse>, AppError> {
    let amount = req
        .amount
        .filter(|amount| *amount > 0.0)
        .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("Invalid deposit amount.")))?;

    let balance = state
        .users
        .deposit(&claims.sub, amount)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("User not found.")))?;

    tracing::info!(user_id = %claims.sub, amount, balance, "deposit applied");

    Ok(Json(DepositResponse { balance }))
}
