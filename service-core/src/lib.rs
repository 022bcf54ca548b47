//! service-core: Shared infrastructure for the banking services.
pub mod error;
pub mod middleware;
