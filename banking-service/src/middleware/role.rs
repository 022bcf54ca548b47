use axum::{extract::Request, middleware::Next, response::Response};
use service_core::error::AppError;

use crate::models::role::ADMIN_ROLE;
use crate::services::TokenClaims;

/// Role gate for admin-only routes; layers after `auth_middleware`.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let claims = req.extensions().get::<TokenClaims>().ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!("auth claims missing from request extensions"))
    })?;

    if claims.role != ADMIN_ROLE {
        return Err(AppError::Forbidden(anyhow::anyhow!("Access denied")));
    }

    Ok(next.run(req).await)
}
