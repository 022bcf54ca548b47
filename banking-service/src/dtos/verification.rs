use serde::Serialize;

use super::payment::PaymentView;

#[derive(Debug, Serialize)]
pub struct TransactionListResponse {
    pub transactions: Vec<PaymentView>,
}

/// Returned by the SWIFT and account-number checks, which echo the bank name
/// reported by the external lookup.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedBankResponse {
    pub message: String,
    pub bank_name: String,
}
