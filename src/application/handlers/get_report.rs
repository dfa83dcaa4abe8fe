//! GetReportHandler - read side for finished reports.
//!
//! A report is only visible once the session reached `report_ready`.
//! Everything earlier answers "Report not yet generated" so the kiosk
//! frontend can keep polling with one code path.

use std::sync::Arc;

use crate::application::error::GameError;
use crate::domain::foundation::{GameMode, Language, Niche, SessionId, Timestamp};
use crate::domain::report::Report;
use crate::ports::SessionStore;

/// Query for a session's finished report.
#[derive(Debug, Clone, Copy)]
pub struct GetReportQuery {
    pub session_id: SessionId,
}

/// A finished report with its session metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct GetReportResult {
    pub report: Report,
    pub mode: GameMode,
    pub niche: Niche,
    pub language: Language,
    pub completed_at: Timestamp,
}

/// Handler for report reads.
pub struct GetReportHandler {
    store: Arc<dyn SessionStore>,
}

impl GetReportHandler {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, query: GetReportQuery) -> Result<GetReportResult, GameError> {
        // 1. Load the session.
        let session = self
            .store
            .find_by_id(&query.session_id)
            .await?
            .ok_or_else(|| GameError::not_found("Session not found"))?;

        // 2. Only a completed session exposes its report.
        let (report, completed_at) = match (session.report(), session.completed_at()) {
            (Some(report), Some(completed_at)) => (report.clone(), *completed_at),
            _ => return Err(GameError::not_found("Report not yet generated")),
        };

        // 3. A completed session always carries its mode and niche.
        let mode = session
            .mode()
            .ok_or_else(|| GameError::Persistence("stored session is missing its mode".to_string()))?;
        let niche = session
            .niche()
            .ok_or_else(|| GameError::Persistence("stored session is missing its niche".to_string()))?;

        Ok(GetReportResult {
            report,
            mode,
            niche,
            language: session.language(),
            completed_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemorySessionStore;
    use crate::domain::session::GameSession;

    fn ready_session() -> GameSession {
        let mut session = GameSession::new(SessionId::new(), Language::Fr);
        session.begin().unwrap();
        session.choose_mode(GameMode::Audit).unwrap();
        session.choose_niche(Niche::Restauration).unwrap();
        session.provide_company_info("Chez Luc", None).unwrap();
        session.record_turn("Bonjour", "Bienvenue !").unwrap();
        session.request_report().unwrap();
        session.attach_report(sample_report()).unwrap();
        session
    }

    fn sample_report() -> Report {
        Report::parse(
            r#"{
                "mode": "audit",
                "language": "fr",
                "sector": "restauration",
                "summary": "Présence en ligne à renforcer.",
                "sections": [
                    {"title": "Visibilité", "bullets": ["Créer une fiche Google Business Profile"]}
                ],
                "cta": "Lancez votre transformation digitale dès aujourd'hui."
            }"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn ready_report_is_returned_with_session_metadata() {
        let store = Arc::new(InMemorySessionStore::new());
        let session = ready_session();
        let id = *session.id();
        store.save(&session).await.unwrap();

        let result = GetReportHandler::new(store)
            .handle(GetReportQuery { session_id: id })
            .await
            .unwrap();

        assert_eq!(result.report, sample_report());
        assert_eq!(result.mode, GameMode::Audit);
        assert_eq!(result.niche, Niche::Restauration);
        assert_eq!(result.language, Language::Fr);
        assert_eq!(Some(&result.completed_at), session.completed_at());
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let store = Arc::new(InMemorySessionStore::new());

        let result = GetReportHandler::new(store)
            .handle(GetReportQuery {
                session_id: SessionId::new(),
            })
            .await;

        assert!(
            matches!(&result, Err(GameError::NotFound(message)) if message == "Session not found")
        );
    }

    #[tokio::test]
    async fn unfinished_session_reports_pending() {
        let store = Arc::new(InMemorySessionStore::new());
        let mut session = GameSession::new(SessionId::new(), Language::En);
        session.begin().unwrap();
        session.choose_mode(GameMode::Startup).unwrap();
        session.choose_niche(Niche::Ecommerce).unwrap();
        session.provide_company_info("Acme", None).unwrap();
        session.record_turn("Hello", "Welcome!").unwrap();
        let id = *session.id();
        store.save(&session).await.unwrap();

        let result = GetReportHandler::new(store)
            .handle(GetReportQuery { session_id: id })
            .await;

        assert!(
            matches!(&result, Err(GameError::NotFound(message)) if message == "Report not yet generated")
        );
    }

    #[tokio::test]
    async fn generating_session_still_reports_pending() {
        let store = Arc::new(InMemorySessionStore::new());
        let mut session = GameSession::new(SessionId::new(), Language::Fr);
        session.begin().unwrap();
        session.choose_mode(GameMode::Audit).unwrap();
        session.choose_niche(Niche::Construction).unwrap();
        session.provide_company_info("Atelier Bois", None).unwrap();
        session.record_turn("Bonjour", "Bienvenue !").unwrap();
        session.request_report().unwrap();
        let id = *session.id();
        store.save(&session).await.unwrap();

        let result = GetReportHandler::new(store)
            .handle(GetReportQuery { session_id: id })
            .await;

        assert!(
            matches!(&result, Err(GameError::NotFound(message)) if message == "Report not yet generated")
        );
    }

    #[tokio::test]
    async fn reads_are_idempotent() {
        let store = Arc::new(InMemorySessionStore::new());
        let session = ready_session();
        let id = *session.id();
        store.save(&session).await.unwrap();

        let handler = GetReportHandler::new(store);
        let first = handler.handle(GetReportQuery { session_id: id }).await.unwrap();
        let second = handler.handle(GetReportQuery { session_id: id }).await.unwrap();

        assert_eq!(first, second);
    }
}
