use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{Payment, PaymentStatus};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    #[validate(length(min = 1, message = "Recipient name is required"))]
    pub recipient_name: String,

    #[validate(length(min = 1, message = "Recipient bank is required"))]
    pub recipient_bank: String,

    #[validate(length(min = 1, message = "Recipient account number is required"))]
    pub recipient_account_no: String,

    pub amount_transfer: f64,

    #[validate(length(min = 1, message = "SWIFT code is required"))]
    pub swift_code: String,

    #[validate(length(min = 1, message = "Currency is required"))]
    pub currency: String,
}

/// Receipt summarizing a completed submission.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    pub transaction_id: Uuid,
    pub recipient_name: String,
    pub amount_transfer: f64,
    pub new_balance: f64,
    pub status: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSubmitResponse {
    pub message: String,
    pub payment: PaymentReceipt,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PayConfirmRequest {
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct PayConfirmResponse {
    pub valid: bool,
}

/// Payment document shaped for API responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentView {
    pub transaction_id: Uuid,
    pub recipient_name: String,
    pub recipient_bank: String,
    pub recipient_account_no: String,
    pub amount_transfer: f64,
    pub swift_code: String,
    pub currency: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub status: PaymentStatus,
    pub is_verified: bool,
}

impl From<Payment> for PaymentView {
    fn from(p: Payment) -> Self {
        Self {
            transaction_id: p.id,
            recipient_name: p.recipient_name,
            recipient_bank: p.recipient_bank,
            recipient_account_no: p.recipient_account_no,
            amount_transfer: p.amount_transfer,
            swift_code: p.swift_code,
            currency: p.currency,
            user_id: p.user_id,
            created_at: p.created_at.to_chrono(),
            status: p.status,
            is_verified: p.is_verified,
        }
    }
}
