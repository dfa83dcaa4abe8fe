//! Rate limiting middleware for axum.
//!
//! This module provides middleware that throttles an endpoint using the
//! `RateGovernor` port. Each governed route carries its own `RatePolicy`
//! naming the endpoint tag, the limit, and the window.
//!
//! Rate limit status is returned in standard HTTP headers:
//! - `X-RateLimit-Limit`: Maximum requests allowed in the window
//! - `X-RateLimit-Remaining`: Requests remaining in the current window
//! - `X-RateLimit-Reset`: Seconds until the window resets
//! - `Retry-After`: Seconds to wait (only on 429 response)
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, routing::post, middleware};
//! use std::sync::Arc;
//!
//! let governor: Arc<dyn RateGovernor> = Arc::new(SlidingWindowGovernor::new());
//! let policy = RatePolicy::new(governor, "chat", 20, Duration::from_secs(60));
//!
//! let app = Router::new()
//!     .route("/api/chat", post(handler))
//!     .route_layer(middleware::from_fn_with_state(policy, rate_limit_middleware));
//! ```

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::ports::{AdmitDecision, GovernorKey, RateGovernor};

/// Standard rate limit header names.
pub mod headers {
    use super::HeaderName;

    /// Maximum requests allowed in the window.
    pub static X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
    /// Requests remaining in the current window.
    pub static X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
    /// Seconds until the window resets.
    pub static X_RATELIMIT_RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");
}

/// Per-route throttling policy, used as middleware state.
#[derive(Clone)]
pub struct RatePolicy {
    governor: Arc<dyn RateGovernor>,
    endpoint: &'static str,
    limit: u32,
    window: Duration,
}

impl RatePolicy {
    /// Creates a policy throttling `endpoint` to `limit` requests per `window`.
    pub fn new(
        governor: Arc<dyn RateGovernor>,
        endpoint: &'static str,
        limit: u32,
        window: Duration,
    ) -> Self {
        Self {
            governor,
            endpoint,
            limit,
            window,
        }
    }
}

/// Rate limiting middleware keyed on the client identity.
///
/// This middleware:
/// 1. Resolves the client identity from forwarded headers or `ConnectInfo`
/// 2. Asks the governor for an admission decision
/// 3. Returns 429 Too Many Requests with `Retry-After` when rejected
/// 4. Adds rate limit headers to admitted responses
pub async fn rate_limit_middleware(
    State(policy): State<RatePolicy>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    request: Request,
    next: Next,
) -> Response {
    let identity = extract_client_identity(&request, connect_info.as_ref())
        .unwrap_or_else(|| "unknown".to_string());

    let key = GovernorKey::new(identity, policy.endpoint);
    let status = match policy
        .governor
        .admit(&key, policy.limit, policy.window)
        .await
    {
        AdmitDecision::Rejected(rejection) => {
            tracing::warn!(key = %key, retry_after_secs = rejection.retry_after_secs(), "rate limit exceeded");
            return rate_limit_response(rejection.limit, 0, rejection.retry_after_secs());
        }
        AdmitDecision::Admitted(status) => status,
    };

    let mut response = next.run(request).await;
    add_rate_limit_headers(
        &mut response,
        status.limit,
        status.remaining,
        status.resets_in.as_secs(),
    );

    response
}

/// Extract the client identity from a request, checking forwarded headers first.
///
/// Order of precedence:
/// 1. X-Forwarded-For header (first IP in list)
/// 2. X-Real-IP header
/// 3. ConnectInfo socket address
fn extract_client_identity<B>(
    request: &axum::http::Request<B>,
    connect_info: Option<&ConnectInfo<SocketAddr>>,
) -> Option<String> {
    // Check X-Forwarded-For first (for reverse proxy setups)
    if let Some(forwarded) = request
        .headers()
        .get("X-Forwarded-For")
        .and_then(|h| h.to_str().ok())
    {
        // Take the first IP (client IP, before any proxies)
        if let Some(first_ip) = forwarded.split(',').next() {
            return Some(first_ip.trim().to_string());
        }
    }

    // Check X-Real-IP
    if let Some(real_ip) = request
        .headers()
        .get("X-Real-IP")
        .and_then(|h| h.to_str().ok())
    {
        return Some(real_ip.to_string());
    }

    // Fall back to ConnectInfo
    connect_info.map(|ci| ci.0.ip().to_string())
}

/// Create a 429 Too Many Requests response.
fn rate_limit_response(limit: u32, remaining: u32, retry_after_secs: u64) -> Response {
    let mut response = (
        StatusCode::TOO_MANY_REQUESTS,
        Json(serde_json::json!({
            "error": {
                "code": "RATE_LIMIT_EXCEEDED",
                "message": format!("Rate limit exceeded. Try again in {retry_after_secs} seconds."),
                "details": { "retryAfterSecs": retry_after_secs }
            }
        })),
    )
        .into_response();

    // Add rate limit headers
    let headers = response.headers_mut();
    headers.insert(
        headers::X_RATELIMIT_LIMIT.clone(),
        HeaderValue::from_str(&limit.to_string()).unwrap(),
    );
    headers.insert(
        headers::X_RATELIMIT_REMAINING.clone(),
        HeaderValue::from_str(&remaining.to_string()).unwrap(),
    );
    headers.insert(
        "Retry-After",
        HeaderValue::from_str(&retry_after_secs.to_string()).unwrap(),
    );

    response
}

/// Add rate limit headers to a response.
fn add_rate_limit_headers(response: &mut Response, limit: u32, remaining: u32, resets_in: u64) {
    let headers = response.headers_mut();
    headers.insert(
        headers::X_RATELIMIT_LIMIT.clone(),
        HeaderValue::from_str(&limit.to_string()).unwrap(),
    );
    headers.insert(
        headers::X_RATELIMIT_REMAINING.clone(),
        HeaderValue::from_str(&remaining.to_string()).unwrap(),
    );
    headers.insert(
        headers::X_RATELIMIT_RESET.clone(),
        HeaderValue::from_str(&resets_in.to_string()).unwrap(),
    );
}
