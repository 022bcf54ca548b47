use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::errors::ErrorKind;
use service_core::error::AppError;

use crate::{services::TokenClaims, AppState};

/// Bearer-token gate for every authenticated route. A missing header is a
/// 403; a bad or expired token is a 401.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    let Some(token) = token else {
        return Err(AppError::Forbidden(anyhow::anyhow!("Missing token")));
    };

    let claims = state.jwt.verify(token).map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AppError::AuthError(anyhow::anyhow!("Token expired")),
        _ => AppError::AuthError(anyhow::anyhow!("Token invalid or expired")),
    })?;

    // Handlers read the claims back through the AuthUser extractor
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Extractor exposing the verified claim set to handlers.
pub struct AuthUser(pub TokenClaims);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = parts.extensions.get::<TokenClaims>().ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!("auth claims missing from request extensions"))
        })?;

        Ok(AuthUser(claims.clone()))
    }
}
