//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

use std::sync::Arc;

use crate::domain::session::GameSession;
use crate::ports::SessionStore;

pub mod chat_turn;
pub mod generate_report;
pub mod get_report;
pub mod start_session;

pub use chat_turn::{ChatTurnCommand, ChatTurnHandler, ChatTurnResult, MAX_MESSAGE_CHARS};
pub use generate_report::{GenerateReportCommand, GenerateReportHandler, GenerateReportResult};
pub use get_report::{GetReportHandler, GetReportQuery, GetReportResult};
pub use start_session::{StartSessionCommand, StartSessionHandler, StartSessionResult};

/// Persists a session snapshot on a detached task.
///
/// Write failures are logged, never surfaced; the in-memory aggregate
/// already advanced and the response must not block on storage.
pub(crate) fn spawn_save(store: Arc<dyn SessionStore>, session: GameSession) {
    tokio::spawn(async move {
        if let Err(err) = store.save(&session).await {
            tracing::warn!(
                session_id = %session.id(),
                error = %err,
                "failed to persist session snapshot"
            );
        }
    });
}
