use std::collections::HashMap;

use crate::models::role::{ADMIN_ROLE, USER_ROLE};

/// Immutable role-to-permission mapping, built once at startup and shared
/// through application state.
#[derive(Debug, Clone)]
pub struct RolePolicy {
    grants: HashMap<String, Vec<String>>,
}

impl RolePolicy {
    pub fn builtin() -> Self {
        let mut grants = HashMap::new();
        grants.insert(
            ADMIN_ROLE.to_string(),
            vec![
                "read".to_string(),
                "write".to_string(),
                "delete".to_string(),
                "admin-access".to_string(),
            ],
        );
        grants.insert(
            USER_ROLE.to_string(),
            vec!["read".to_string(), "write".to_string()],
        );
        Self { grants }
    }

    /// Permissions for a role name; unknown roles get none.
    pub fn permissions_for(&self, role: &str) -> Vec<String> {
        self.grants.get(role).cloned().unwrap_or_default()
    }
}
