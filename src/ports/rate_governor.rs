//! Rate governor port for per-caller request throttling.
//!
//! This port defines the interface for admission control on the public
//! endpoints. Implementations use a sliding-window log per (identity,
//! endpoint) pair; the in-memory adapter is the default, and the interface
//! leaves room for a shared backend.
//!
//! Admission never fails: a governor that cannot answer is a programming
//! error, not a runtime condition, so `admit` returns a decision rather
//! than a `Result`.

use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

/// Port for request admission decisions.
///
/// Implementations must be thread-safe and support concurrent access.
#[async_trait]
pub trait RateGovernor: Send + Sync {
    /// Decides whether one request from `key` is admitted right now.
    ///
    /// An admitted request is counted against the window immediately; a
    /// rejected one is not.
    async fn admit(&self, key: &GovernorKey, limit: u32, window: Duration) -> AdmitDecision;
}

/// Key identifying who is being throttled on which endpoint.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct GovernorKey {
    /// Caller identity (typically the client IP).
    identity: String,
    /// Endpoint tag (e.g., "chat", "generate_report").
    endpoint: String,
}

impl GovernorKey {
    /// Creates a key for one caller on one endpoint.
    pub fn new(identity: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            endpoint: endpoint.into(),
        }
    }

    /// Returns the caller identity.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Returns the endpoint tag.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl fmt::Display for GovernorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.endpoint, self.identity)
    }
}

/// Result of an admission check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdmitDecision {
    /// Request is admitted; includes current quota status.
    Admitted(AdmitStatus),
    /// Request is rejected; includes retry info.
    Rejected(AdmitRejection),
}

impl AdmitDecision {
    /// Returns true if the request was admitted.
    pub fn is_admitted(&self) -> bool {
        matches!(self, AdmitDecision::Admitted(_))
    }

    /// Returns true if the request was rejected.
    pub fn is_rejected(&self) -> bool {
        matches!(self, AdmitDecision::Rejected(_))
    }
}

/// Quota status accompanying an admitted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmitStatus {
    /// Maximum requests allowed in the window.
    pub limit: u32,
    /// Remaining requests in the current window (after this one).
    pub remaining: u32,
    /// Time until the oldest counted request leaves the window.
    pub resets_in: Duration,
}

/// Details of a rejected request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmitRejection {
    /// Maximum requests allowed in the window.
    pub limit: u32,
    /// Time until one slot frees up.
    pub retry_after: Duration,
}

impl AdmitRejection {
    /// Returns the retry hint rounded up to whole seconds, for the
    /// `Retry-After` header. At least 1 second.
    pub fn retry_after_secs(&self) -> u64 {
        let secs = self.retry_after.as_secs();
        if self.retry_after.subsec_nanos() > 0 {
            secs + 1
        } else {
            secs.max(1)
        }
    }
}
