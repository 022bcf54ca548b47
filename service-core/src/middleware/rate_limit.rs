use crate::error::AppError;
use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::{num::NonZeroU32, sync::Arc, time::Duration};

/// Shared in-memory limiter wrapping an endpoint group.
pub type RequestRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Build a limiter allowing `attempts` requests per `window_seconds` window.
pub fn create_rate_limiter(attempts: u32, window_seconds: u64) -> RequestRateLimiter {
    let quota = Quota::with_period(Duration::from_secs(window_seconds / attempts as u64))
        .unwrap()
        .allow_burst(NonZeroU32::new(attempts).unwrap());

    Arc::new(RateLimiter::direct(quota))
}

pub async fn rate_limit_middleware(
    limiter: RequestRateLimiter,
    request: Request,
    next: Next,
) -> Response {
    match limiter.check() {
        Ok(_) => next.run(request).await,
        Err(_) => AppError::TooManyRequests("Too many requests. Please try again later.".into())
            .into_response(),
    }
}
