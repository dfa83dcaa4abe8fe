//! Application-level error taxonomy.
//!
//! Handlers fold domain and port errors into one `GameError`; the HTTP
//! boundary maps each variant onto a status code and wire error code.
//! Persistence failures normally never reach this type (saves are
//! detached and logged) except for the initial save, which must succeed
//! before a session id is handed out.

use crate::domain::conversation::EngineError;
use crate::domain::foundation::DomainError;
use crate::domain::report::SynthesisError;
use crate::domain::session::SessionError;

/// Errors a game operation can surface to the boundary.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// A request field failed validation.
    #[error("{0}")]
    Validation(String),

    /// Caller exceeded the request budget for an endpoint.
    #[error("rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimitExceeded { retry_after_secs: u32 },

    /// Action not allowed in the session's current phase.
    #[error("action '{action}' is not allowed in phase '{from}'")]
    InvalidPhaseTransition { from: String, action: String },

    /// Every configured provider failed for one completion.
    #[error("all AI providers failed after {} attempt(s)", attempts.len())]
    ProviderExhausted { attempts: Vec<String> },

    /// The report payload failed schema validation even after repair.
    #[error("report synthesis failed: {reason}")]
    ReportSynthesisFailed { reason: String },

    /// A session store failure that had to surface.
    #[error("persistence failure: {0}")]
    Persistence(String),

    /// Unknown session, or a report that does not exist yet.
    #[error("{0}")]
    NotFound(String),
}

impl GameError {
    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        GameError::Validation(message.into())
    }

    /// Creates a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        GameError::NotFound(message.into())
    }

    /// Whether the same request could succeed if repeated later.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GameError::RateLimitExceeded { .. }
                | GameError::ProviderExhausted { .. }
                | GameError::ReportSynthesisFailed { .. }
                | GameError::Persistence(_)
        )
    }
}

impl From<SessionError> for GameError {
    fn from(err: SessionError) -> Self {
        match err {
            // Wire messages are fixed strings; session ids go to logs, not bodies.
            SessionError::NotFound(_) => GameError::not_found("Session not found"),
            SessionError::ReportNotReady(_) => GameError::not_found("Report not yet generated"),
            SessionError::InvalidPhaseTransition { phase, action } => {
                GameError::InvalidPhaseTransition {
                    from: phase.to_string(),
                    action: action.to_string(),
                }
            }
            SessionError::AlreadyCompleted => {
                GameError::validation("Session is already completed")
            }
            SessionError::ValidationFailed { field, message } => {
                GameError::Validation(format!("Validation failed for '{}': {}", field, message))
            }
            SessionError::Infrastructure(message) => GameError::Persistence(message),
        }
    }
}

impl From<EngineError> for GameError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::ProviderExhausted { attempts } => GameError::ProviderExhausted {
                attempts: attempts.iter().map(|attempt| attempt.to_string()).collect(),
            },
        }
    }
}

impl From<SynthesisError> for GameError {
    fn from(err: SynthesisError) -> Self {
        match err {
            SynthesisError::SchemaInvalid { violations } => GameError::ReportSynthesisFailed {
                reason: violations.to_string(),
            },
            SynthesisError::Providers(engine) => engine.into(),
        }
    }
}

impl From<DomainError> for GameError {
    fn from(err: DomainError) -> Self {
        GameError::Persistence(err.to_string())
    }
}
