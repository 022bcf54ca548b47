//! Payment model - international transfer records.

use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub recipient_name: String,
    pub recipient_bank: String,
    pub recipient_account_no: String,
    pub amount_transfer: f64,
    pub swift_code: String,
    pub currency: String,
    pub user_id: Uuid,
    pub created_at: DateTime,
    pub status: PaymentStatus,
    pub is_verified: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Successful,
    Rejected,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Successful => "Successful",
            PaymentStatus::Rejected => "Rejected",
        }
    }
}
