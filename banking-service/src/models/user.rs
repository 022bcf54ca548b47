//! User model - bank account holders.

use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User document. `balance` is only ever mutated through the repository's
/// atomic operations (deposit, payment debit, rejection credit).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub account_number: String,
    pub id_number: String,
    pub balance: f64,
    /// Reference into the `roles` collection. Absent means no elevated
    /// permissions.
    pub role_id: Option<Uuid>,
    pub created_at: DateTime,
}
