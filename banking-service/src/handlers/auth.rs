use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use mongodb::bson::DateTime;
use service_core::error::AppError;
use uuid::Uuid;

use crate::{
    dtos::auth::{LoginRequest, LoginResponse, SignupRequest, SignupResponse},
    models::{role::USER_ROLE, User},
    utils::{password, ValidatedJson},
    AppState,
};

/// Register a new user with a zero balance and the default role.
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    if state.users.find_by_email(&req.email).await?.is_some() {
        return Err(AppError::Conflict(anyhow::anyhow!(
            "Email is already taken."
        )));
    }

    if state.users.find_by_username(&req.username).await?.is_some() {
        return Err(AppError::Conflict(anyhow::anyhow!(
            "Username already taken."
        )));
    }

    let default_role = state.users.find_role_by_name(USER_ROLE).await?;

    let user = User {
        id: Uuid::new_v4(),
        first_name: req.first_name,
        last_name: req.last_name,
        email: req.email,
        username: req.username,
        password_hash: password::hash_password(&req.password)?,
        account_number: req.account_number,
        id_number: req.id_number,
        balance: 0.0,
        role_id: default_role.map(|r| r.id),
        created_at: DateTime::now(),
    };

    state.users.insert(&user).await?;

    tracing::info!(username = %user.username, user_id = %user.id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "User registered successfully!".to_string(),
            user_id: user.id,
        }),
    ))
}

/// Authenticate and issue a bearer token carrying the caller's role and
/// permission set.
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    // Unknown username and wrong password are indistinguishable to callers
    let invalid =
        || AppError::AuthError(anyhow::anyhow!("Authentication failed: Invalid credentials."));

    let user = state
        .users
        .find_by_username(&req.username)
        .await?
        .ok_or_else(invalid)?;

    if !password::verify_password(&req.password, &user.password_hash)? {
        return Err(invalid());
    }

    let role = match user.role_id {
        Some(role_id) => state
            .users
            .find_role(&role_id.to_string())
            .await?
            .map(|r| r.name)
            .unwrap_or_else(|| USER_ROLE.to_string()),
        None => USER_ROLE.to_string(),
    };

    let permissions = state.policy.permissions_for(&role);
    let token = state.jwt.issue(&user, &role, permissions.clone())?;

    tracing::debug!(username = %user.username, role = %role, "login successful");

    Ok((
        StatusCode::OK,
        Json(LoginResponse {
            message: "Authentication successful".to_string(),
            token,
            username: user.username,
            account_number: user.account_number,
            role,
            permissions,
        }),
    ))
}
