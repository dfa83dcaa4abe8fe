//! Session-specific error types.

use crate::domain::foundation::{ErrorCode, SessionId, ValidationError};
use crate::domain::session::GamePhase;

/// Session-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Session was not found.
    NotFound(SessionId),
    /// Report requested before synthesis completed.
    ReportNotReady(SessionId),
    /// Action not allowed in the session's current phase.
    InvalidPhaseTransition {
        phase: GamePhase,
        action: &'static str,
    },
    /// Session already produced its report and accepts no further actions.
    AlreadyCompleted,
    /// Validation failed.
    ValidationFailed { field: String, message: String },
    /// Infrastructure error.
    Infrastructure(String),
}

impl SessionError {
    pub fn not_found(id: SessionId) -> Self {
        SessionError::NotFound(id)
    }
    pub fn report_not_ready(id: SessionId) -> Self {
        SessionError::ReportNotReady(id)
    }
    pub fn invalid_phase_transition(phase: GamePhase, action: &'static str) -> Self {
        SessionError::InvalidPhaseTransition { phase, action }
    }
    pub fn already_completed() -> Self {
        SessionError::AlreadyCompleted
    }
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        SessionError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }
    pub fn infrastructure(message: impl Into<String>) -> Self {
        SessionError::Infrastructure(message.into())
    }
    pub fn code(&self) -> ErrorCode {
        match self {
            SessionError::NotFound(_) => ErrorCode::SessionNotFound,
            SessionError::ReportNotReady(_) => ErrorCode::ReportNotReady,
            SessionError::InvalidPhaseTransition { .. } => ErrorCode::InvalidPhaseTransition,
            SessionError::AlreadyCompleted => ErrorCode::SessionCompleted,
            SessionError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            SessionError::Infrastructure(_) => ErrorCode::PersistenceError,
        }
    }
    pub fn message(&self) -> String {
        match self {
            SessionError::NotFound(id) => format!("Session not found: {}", id),
            SessionError::ReportNotReady(id) => {
                format!("Report not yet generated for session: {}", id)
            }
            SessionError::InvalidPhaseTransition { phase, action } => {
                format!("Action '{}' is not allowed in phase '{}'", action, phase)
            }
            SessionError::AlreadyCompleted => "Session is already completed".to_string(),
            SessionError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            SessionError::Infrastructure(msg) => format!("Persistence error: {}", msg),
        }
    }
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for SessionError {}

impl From<ValidationError> for SessionError {
    fn from(err: ValidationError) -> Self {
        let field = match &err {
            ValidationError::EmptyField { field } => field.clone(),
            ValidationError::OutOfRange { field, .. } => field.clone(),
            ValidationError::InvalidFormat { field, .. } => field.clone(),
        };
        SessionError::ValidationFailed {
            field,
            message: err.to_string(),
        }
    }
}
