//! Startup bootstrap: roles and the initial admin user.

use anyhow::Result;
use mongodb::bson::DateTime;
use secrecy::ExposeSecret;
use uuid::Uuid;

use crate::config::Config;
use crate::models::role::{ADMIN_ROLE, USER_ROLE};
use crate::models::{Role, User};
use crate::services::UserRepository;
use crate::utils::password::hash_password;

/// Create the `admin` and `user` roles and the initial admin user when
/// absent. Idempotent: safe to run on every startup.
pub async fn initialize_roles(users: &UserRepository, config: &Config) -> Result<()> {
    for name in [ADMIN_ROLE, USER_ROLE] {
        if users.find_role_by_name(name).await?.is_none() {
            let role = Role::new(name);
            users.insert_role(&role).await?;
            tracing::info!(role = name, "role created");
        }
    }

    initialize_admin_user(users, config).await
}

async fn initialize_admin_user(users: &UserRepository, config: &Config) -> Result<()> {
    let Some(password) = config.admin_password.as_ref() else {
        tracing::warn!("BANKING_ADMIN_PASSWORD not set, skipping admin user bootstrap");
        return Ok(());
    };

    if users.find_by_username("admin").await?.is_some() {
        tracing::debug!("admin user already exists");
        return Ok(());
    }

    let admin_role = users
        .find_role_by_name(ADMIN_ROLE)
        .await?
        .ok_or_else(|| anyhow::anyhow!("admin role missing after bootstrap"))?;

    let user = User {
        id: Uuid::new_v4(),
        first_name: "Admin".to_string(),
        last_name: "User".to_string(),
        email: "admin@bank.com".to_string(),
        username: "admin".to_string(),
        password_hash: hash_password(password.expose_secret())?,
        account_number: "000001".to_string(),
        id_number: "0000000001".to_string(),
        balance: 0.0,
        role_id: Some(admin_role.id),
        created_at: DateTime::now(),
    };

    users.insert(&user).await?;
    tracing::info!("admin user added");

    Ok(())
}
