use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const ADMIN_ROLE: &str = "admin";
pub const USER_ROLE: &str = "user";

/// Role document. Permission sets are not stored here; they come from the
/// injected `RolePolicy` built at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
}

impl Role {
    pub fn new(name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
        }
    }
}
