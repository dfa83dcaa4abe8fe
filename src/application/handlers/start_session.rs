//! StartSessionHandler - creates a session and walks it to the conversation phase.
//!
//! The kiosk collects mode, niche and company details in a single request,
//! so the handler drives the aggregate through the data-collection phases
//! one transition at a time. The initial save is awaited: the returned
//! session id must be resolvable by the very next request.

use std::sync::Arc;

use crate::application::error::GameError;
use crate::domain::foundation::{GameMode, Language, Niche, SessionId};
use crate::domain::session::GameSession;
use crate::ports::SessionStore;

/// Command to start a game session.
#[derive(Debug, Clone)]
pub struct StartSessionCommand {
    pub mode: GameMode,
    pub niche: Niche,
    pub language: Language,
    pub company_name: String,
    pub site_url: Option<String>,
}

/// Result of a successful start.
#[derive(Debug, Clone)]
pub struct StartSessionResult {
    pub session: GameSession,
}

/// Handler for starting sessions.
pub struct StartSessionHandler {
    store: Arc<dyn SessionStore>,
}

impl StartSessionHandler {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: StartSessionCommand,
    ) -> Result<StartSessionResult, GameError> {
        // 1. Walk a fresh session through the data-collection phases.
        let mut session = GameSession::new(SessionId::new(), cmd.language);
        session.begin()?;
        session.choose_mode(cmd.mode)?;
        session.choose_niche(cmd.niche)?;
        session.provide_company_info(&cmd.company_name, cmd.site_url.as_deref())?;

        // 2. First save is awaited, not detached.
        self.store.save(&session).await?;

        tracing::info!(
            session_id = %session.id(),
            mode = %cmd.mode,
            niche = %cmd.niche,
            "game session started"
        );

        Ok(StartSessionResult { session })
    }
}
