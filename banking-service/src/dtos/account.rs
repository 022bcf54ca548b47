use serde::{Deserialize, Serialize};

use super::payment::PaymentView;

#[derive(Debug, Deserialize)]
pub struct DepositRequest {
    pub amount: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct DepositResponse {
    pub balance: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub name: String,
    pub account_number: String,
    pub balance: f64,
    pub payments: Vec<PaymentView>,
}
