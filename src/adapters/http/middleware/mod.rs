//! HTTP middleware for axum.
//!
//! This module contains middleware layers for cross-cutting concerns:
//!
//! - `rate_limit` - Per-endpoint admission control via the rate governor

pub mod rate_limit;

pub use rate_limit::{rate_limit_middleware, RatePolicy};
