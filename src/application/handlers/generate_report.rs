//! GenerateReportHandler - turns a conversation into a validated report.
//!
//! Session-bound requests advance the aggregate to `generating_report`
//! before synthesis and to `report_ready` after it; a synthesis failure
//! leaves the session in `generating_report` so the same request can be
//! retried. Session-less requests synthesize straight from the supplied
//! history.
//!
//! The audit summary resolution order: caller-supplied summary, then a
//! best-effort site extraction for audit sessions with a known URL.
//! Extraction failures are logged and never block the report.

use std::sync::Arc;

use crate::application::error::GameError;
use crate::domain::foundation::{GameMode, Language, Niche, SessionId};
use crate::domain::report::{Report, ReportSynthesizer};
use crate::domain::session::ConversationMessage;
use crate::ports::{ContentExtractor, SessionStore};

use super::spawn_save;

/// Command to generate a report.
#[derive(Debug, Clone)]
pub struct GenerateReportCommand {
    /// Present to bind the report to a stored session.
    pub session_id: Option<SessionId>,
    pub mode: GameMode,
    pub niche: Niche,
    pub language: Language,
    /// Caller-supplied history, used only when no session id is given.
    pub history: Vec<ConversationMessage>,
    /// Pre-extracted site summary from the kiosk frontend.
    pub audit_summary: Option<String>,
}

/// Result of a successful synthesis.
#[derive(Debug, Clone)]
pub struct GenerateReportResult {
    pub report: Report,
}

/// Handler for report generation.
pub struct GenerateReportHandler {
    synthesizer: Arc<ReportSynthesizer>,
    store: Arc<dyn SessionStore>,
    extractor: Arc<dyn ContentExtractor>,
}

impl GenerateReportHandler {
    pub fn new(
        synthesizer: Arc<ReportSynthesizer>,
        store: Arc<dyn SessionStore>,
        extractor: Arc<dyn ContentExtractor>,
    ) -> Self {
        Self {
            synthesizer,
            store,
            extractor,
        }
    }

    pub async fn handle(
        &self,
        cmd: GenerateReportCommand,
    ) -> Result<GenerateReportResult, GameError> {
        match cmd.session_id {
            Some(id) => self.session_report(id, cmd).await,
            None => self.direct_report(cmd).await,
        }
    }

    async fn session_report(
        &self,
        id: SessionId,
        cmd: GenerateReportCommand,
    ) -> Result<GenerateReportResult, GameError> {
        // 1. Load and advance to generating_report (re-entrant for retries).
        let mut session = self
            .store
            .find_by_id(&id)
            .await?
            .ok_or_else(|| GameError::not_found("Session not found"))?;
        session.request_report()?;
        spawn_save(Arc::clone(&self.store), session.clone());

        // 2. Session attributes win over request defaults.
        let mode = session.mode().unwrap_or(cmd.mode);
        let niche = session.niche().unwrap_or(cmd.niche);
        let language = session.language();

        // 3. Resolve the audit summary, extraction as fallback.
        let audit_summary = self
            .resolve_summary(cmd.audit_summary, mode, session.site_url())
            .await;

        // 4. Synthesize; a failure leaves the session retryable.
        let report = self
            .synthesizer
            .synthesize(
                session.conversation(),
                mode,
                niche,
                language,
                audit_summary.as_deref(),
            )
            .await?;

        // 5. Attach and persist the completed session.
        session.attach_report(report.clone())?;
        spawn_save(Arc::clone(&self.store), session);

        tracing::info!(session_id = %id, "report synthesized");

        Ok(GenerateReportResult { report })
    }

    async fn direct_report(
        &self,
        cmd: GenerateReportCommand,
    ) -> Result<GenerateReportResult, GameError> {
        // No stored site URL without a session, so no extraction fallback.
        let audit_summary = cmd.audit_summary.filter(|summary| !summary.trim().is_empty());

        let report = self
            .synthesizer
            .synthesize(
                &cmd.history,
                cmd.mode,
                cmd.niche,
                cmd.language,
                audit_summary.as_deref(),
            )
            .await?;

        Ok(GenerateReportResult { report })
    }

    async fn resolve_summary(
        &self,
        provided: Option<String>,
        mode: GameMode,
        site_url: Option<&str>,
    ) -> Option<String> {
        if let Some(summary) = provided {
            if !summary.trim().is_empty() {
                return Some(summary);
            }
        }
        if mode != GameMode::Audit {
            return None;
        }
        let url = site_url?;

        match self.extractor.extract(url).await {
            Ok(summary) => summary,
            Err(err) => {
                tracing::warn!(url = %url, error = %err, "site content extraction failed");
                None
            }
        }
    }
}
