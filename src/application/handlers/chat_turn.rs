//! ChatTurnHandler - one conversation turn with provider fallback.
//!
//! Turns come in two shapes. Session-bound turns load the aggregate,
//! converse over its recorded history and append the exchange; the
//! updated snapshot is persisted on a detached task. Session-less turns
//! (the kiosk's lightweight chat widget) converse over caller-supplied
//! history and touch no state.

use std::sync::Arc;

use crate::application::error::GameError;
use crate::domain::conversation::ConversationEngine;
use crate::domain::foundation::{GameMode, Language, Niche, SessionId};
use crate::domain::session::{ConversationMessage, SessionError};
use crate::ports::SessionStore;

use super::spawn_save;

/// Longest accepted user message, in characters.
pub const MAX_MESSAGE_CHARS: usize = 5_000;

/// Command for one chat turn.
#[derive(Debug, Clone)]
pub struct ChatTurnCommand {
    /// Present for session-bound turns; absent for session-less ones.
    pub session_id: Option<SessionId>,
    pub message: String,
    /// Caller-supplied history, used only when no session id is given.
    pub history: Vec<ConversationMessage>,
    pub mode: GameMode,
    pub niche: Niche,
    pub language: Language,
}

/// Result of one chat turn.
#[derive(Debug, Clone)]
pub struct ChatTurnResult {
    /// Assistant reply with any readiness marker stripped.
    pub message: String,
    /// Name of the provider that answered.
    pub provider: String,
    /// True when the assistant judged the conversation complete.
    pub ready_for_report: bool,
}

/// Handler for chat turns.
pub struct ChatTurnHandler {
    engine: Arc<ConversationEngine>,
    store: Arc<dyn SessionStore>,
}

impl ChatTurnHandler {
    pub fn new(engine: Arc<ConversationEngine>, store: Arc<dyn SessionStore>) -> Self {
        Self { engine, store }
    }

    pub async fn handle(&self, cmd: ChatTurnCommand) -> Result<ChatTurnResult, GameError> {
        // 1. Boundary validation (wire contract: 1..=5000 characters).
        if cmd.message.trim().is_empty() {
            return Err(GameError::validation("Message must not be empty"));
        }
        if cmd.message.chars().count() > MAX_MESSAGE_CHARS {
            return Err(GameError::validation(format!(
                "Message must not exceed {} characters",
                MAX_MESSAGE_CHARS
            )));
        }

        match cmd.session_id {
            Some(id) => self.session_turn(id, &cmd).await,
            None => self.stateless_turn(&cmd).await,
        }
    }

    async fn session_turn(
        &self,
        id: SessionId,
        cmd: &ChatTurnCommand,
    ) -> Result<ChatTurnResult, GameError> {
        // 2. Load the session and refuse doomed turns before any provider call.
        let mut session = self
            .store
            .find_by_id(&id)
            .await?
            .ok_or_else(|| GameError::not_found("Session not found"))?;

        if session.is_completed() {
            return Err(SessionError::already_completed().into());
        }
        if !session.phase().accepts_turns() {
            return Err(
                SessionError::invalid_phase_transition(session.phase(), "record_turn").into(),
            );
        }

        // 3. Session attributes win over request defaults.
        let mode = session.mode().unwrap_or(cmd.mode);
        let niche = session.niche().unwrap_or(cmd.niche);
        let language = session.language();

        // 4. Converse over the recorded history.
        let reply = self
            .engine
            .converse(session.conversation(), &cmd.message, mode, niche, language, None)
            .await?;

        // 5. Append the paired turn and persist on a detached task.
        session.record_turn(&cmd.message, &reply.text)?;
        spawn_save(Arc::clone(&self.store), session);

        Ok(ChatTurnResult {
            message: reply.text,
            provider: reply.provider,
            ready_for_report: reply.ready_for_report,
        })
    }

    async fn stateless_turn(&self, cmd: &ChatTurnCommand) -> Result<ChatTurnResult, GameError> {
        let reply = self
            .engine
            .converse(
                &cmd.history,
                &cmd.message,
                cmd.mode,
                cmd.niche,
                cmd.language,
                None,
            )
            .await?;

        Ok(ChatTurnResult {
            message: reply.text,
            provider: reply.provider,
            ready_for_report: reply.ready_for_report,
        })
    }
}
