//! GameSession aggregate - the session orchestration state machine.
//!
//! A game session walks a visitor through the kiosk flow: pick a mode, pick
//! a business vertical, enter company details, hold a short assistant
//! conversation, then receive a structured report.
//!
//! # Design
//!
//! All mutation goes through action methods that enforce the phase machine.
//! Each action either advances the session exactly one phase (or leaves the
//! phase alone, for `record_turn`) or fails without touching any state. The
//! aggregate never performs I/O; provider calls and persistence happen in
//! the application layer.
//!
//! # Invariants
//!
//! - `phase` only ever moves forward along the lifecycle chain
//! - `mode`, `niche`, and `company_name` are set exactly once, by the
//!   action that advances past their phase
//! - `conversation` grows in user/assistant pairs sharing one timestamp
//! - `report` is attached exactly once; `ReportReady` accepts no further
//!   actions
//! - a failed action leaves the aggregate unchanged

use crate::domain::foundation::{
    GameMode, Language, Niche, SessionId, StateMachine, Timestamp, ValidationError,
};
use crate::domain::report::Report;
use crate::domain::session::{ConversationMessage, GamePhase, SessionError};
use serde::{Deserialize, Serialize};

/// The session aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    /// Unique identifier for this session.
    id: SessionId,

    /// Current lifecycle phase.
    phase: GamePhase,

    /// Conversation and report language.
    language: Language,

    /// Chosen game mode. Set by `choose_mode`.
    mode: Option<GameMode>,

    /// Chosen business vertical. Set by `choose_niche`.
    niche: Option<Niche>,

    /// Company name. Set by `provide_company_info`.
    company_name: Option<String>,

    /// Optional company site URL. Set by `provide_company_info`.
    site_url: Option<String>,

    /// Recorded user/assistant exchanges.
    conversation: Vec<ConversationMessage>,

    /// The synthesized report, once attached.
    report: Option<Report>,

    /// When the session was created.
    created_at: Timestamp,

    /// When the report was attached.
    completed_at: Option<Timestamp>,
}

impl GameSession {
    /// Creates a new session in the `Idle` phase.
    pub fn new(id: SessionId, language: Language) -> Self {
        Self {
            id,
            phase: GamePhase::Idle,
            language,
            mode: None,
            niche: None,
            company_name: None,
            site_url: None,
            conversation: Vec::new(),
            report: None,
            created_at: Timestamp::now(),
            completed_at: None,
        }
    }

    /// Reconstitutes a session from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: SessionId,
        phase: GamePhase,
        language: Language,
        mode: Option<GameMode>,
        niche: Option<Niche>,
        company_name: Option<String>,
        site_url: Option<String>,
        conversation: Vec<ConversationMessage>,
        report: Option<Report>,
        created_at: Timestamp,
        completed_at: Option<Timestamp>,
    ) -> Self {
        Self {
            id,
            phase,
            language,
            mode,
            niche,
            company_name,
            site_url,
            conversation,
            report,
            created_at,
            completed_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the session ID.
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Returns the current phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Returns the session language.
    pub fn language(&self) -> Language {
        self.language
    }

    /// Returns the chosen mode, if selection has happened.
    pub fn mode(&self) -> Option<GameMode> {
        self.mode
    }

    /// Returns the chosen vertical, if selection has happened.
    pub fn niche(&self) -> Option<Niche> {
        self.niche
    }

    /// Returns the company name, if provided.
    pub fn company_name(&self) -> Option<&str> {
        self.company_name.as_deref()
    }

    /// Returns the company site URL, if provided.
    pub fn site_url(&self) -> Option<&str> {
        self.site_url.as_deref()
    }

    /// Returns the recorded conversation in order.
    pub fn conversation(&self) -> &[ConversationMessage] {
        &self.conversation
    }

    /// Returns the attached report, if synthesis has completed.
    pub fn report(&self) -> Option<&Report> {
        self.report.as_ref()
    }

    /// Returns when the session was created.
    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Returns when the report was attached.
    pub fn completed_at(&self) -> Option<&Timestamp> {
        self.completed_at.as_ref()
    }

    /// Returns true once the report is attached.
    pub fn is_completed(&self) -> bool {
        self.phase.is_completed()
    }

    /// Returns the number of completed user turns.
    pub fn turn_count(&self) -> usize {
        self.conversation.iter().filter(|m| m.is_user()).count()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Actions
    // ─────────────────────────────────────────────────────────────────────────

    /// Starts the game: `Idle` to `ModeSelect`.
    ///
    /// # Errors
    ///
    /// - `InvalidPhaseTransition` if the session already started
    pub fn begin(&mut self) -> Result<(), SessionError> {
        self.advance(GamePhase::ModeSelect, "begin")
    }

    /// Records the chosen mode: `ModeSelect` to `NicheSelect`.
    ///
    /// # Errors
    ///
    /// - `InvalidPhaseTransition` if the session is not selecting a mode
    pub fn choose_mode(&mut self, mode: GameMode) -> Result<(), SessionError> {
        self.advance(GamePhase::NicheSelect, "choose_mode")?;
        self.mode = Some(mode);
        Ok(())
    }

    /// Records the chosen vertical: `NicheSelect` to `CompanyInfo`.
    ///
    /// # Errors
    ///
    /// - `InvalidPhaseTransition` if the session is not selecting a vertical
    pub fn choose_niche(&mut self, niche: Niche) -> Result<(), SessionError> {
        self.advance(GamePhase::CompanyInfo, "choose_niche")?;
        self.niche = Some(niche);
        Ok(())
    }

    /// Records company details: `CompanyInfo` to `Conversation`.
    ///
    /// The name is trimmed; a blank site URL is stored as absent.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the company name is empty
    /// - `InvalidPhaseTransition` if the session is not collecting company info
    pub fn provide_company_info(
        &mut self,
        company_name: &str,
        site_url: Option<&str>,
    ) -> Result<(), SessionError> {
        let name = company_name.trim();
        if name.is_empty() {
            return Err(ValidationError::empty_field("companyName").into());
        }

        self.advance(GamePhase::Conversation, "provide_company_info")?;
        self.company_name = Some(name.to_string());
        self.site_url = site_url
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from);
        Ok(())
    }

    /// Appends one completed exchange. Phase stays `Conversation`.
    ///
    /// Both messages are validated before either is stored, and both carry
    /// the same timestamp.
    ///
    /// # Errors
    ///
    /// - `AlreadyCompleted` if the report is already attached
    /// - `InvalidPhaseTransition` if the conversation has not started
    /// - `ValidationFailed` if either message is empty
    pub fn record_turn(
        &mut self,
        user_content: &str,
        assistant_content: &str,
    ) -> Result<(), SessionError> {
        if self.phase.is_completed() {
            return Err(SessionError::already_completed());
        }
        if !self.phase.accepts_turns() {
            return Err(SessionError::invalid_phase_transition(self.phase, "record_turn"));
        }

        let at = Timestamp::now();
        let user = ConversationMessage::user(user_content, at)?;
        let reply = ConversationMessage::assistant(assistant_content, at)?;
        self.conversation.push(user);
        self.conversation.push(reply);
        Ok(())
    }

    /// Requests report synthesis: `Conversation` to `GeneratingReport`.
    ///
    /// Calling again while already in `GeneratingReport` is a no-op, so a
    /// failed synthesis attempt can be retried.
    ///
    /// # Errors
    ///
    /// - `AlreadyCompleted` if the report is already attached
    /// - `InvalidPhaseTransition` if the conversation has not started
    pub fn request_report(&mut self) -> Result<(), SessionError> {
        match self.phase {
            GamePhase::GeneratingReport => Ok(()),
            GamePhase::ReportReady => Err(SessionError::already_completed()),
            _ => self.advance(GamePhase::GeneratingReport, "request_report"),
        }
    }

    /// Attaches the synthesized report: `GeneratingReport` to `ReportReady`.
    ///
    /// Sets `completed_at`. The session is terminal afterwards.
    ///
    /// # Errors
    ///
    /// - `AlreadyCompleted` if a report is already attached
    /// - `InvalidPhaseTransition` if synthesis was never requested
    pub fn attach_report(&mut self, report: Report) -> Result<(), SessionError> {
        self.advance(GamePhase::ReportReady, "attach_report")?;
        self.report = Some(report);
        self.completed_at = Some(Timestamp::now());
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Moves to `target` if the phase machine allows it. On failure nothing
    /// changes.
    fn advance(&mut self, target: GamePhase, action: &'static str) -> Result<(), SessionError> {
        if self.phase.is_completed() {
            return Err(SessionError::already_completed());
        }
        if !self.phase.can_transition_to(&target) {
            return Err(SessionError::invalid_phase_transition(self.phase, action));
        }
        self.phase = target;
        Ok(())
    }
}
