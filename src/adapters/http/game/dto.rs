//! HTTP DTOs for the game endpoints.
//!
//! These types pin the wire contract the kiosk frontend was built
//! against: camelCase field names, role strings `user`/`assistant`,
//! and the `{"error": {...}}` envelope on failures.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{GameMode, Language, Niche, Timestamp, ValidationError};
use crate::domain::report::Report;
use crate::domain::session::ConversationMessage;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to start a new game session.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionRequest {
    pub mode: GameMode,
    pub niche: Niche,
    pub language: Language,
    pub company_name: String,
    #[serde(default)]
    pub site_url: Option<String>,
}

/// Request for one conversation turn.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatMessageDto>,
    pub mode: GameMode,
    pub niche: Niche,
    pub language: Language,
}

/// Request to synthesize a report.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateReportRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    pub mode: GameMode,
    pub niche: Niche,
    pub language: Language,
    #[serde(default)]
    pub history: Vec<ChatMessageDto>,
    #[serde(default)]
    pub audit_html_summary: Option<String>,
}

/// Query parameters for the report read endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportFormatQuery {
    #[serde(default)]
    pub format: Option<String>,
}

/// One message of the caller-supplied history.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatMessageDto {
    pub role: ChatRole,
    pub content: String,
}

/// Wire roles accepted in a history payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatMessageDto {
    /// Converts to a domain message stamped with the current time.
    ///
    /// The wire history carries no timestamps; ordering is positional.
    pub fn into_domain(self) -> Result<ConversationMessage, ValidationError> {
        let now = Timestamp::now();
        match self.role {
            ChatRole::User => ConversationMessage::user(self.content, now),
            ChatRole::Assistant => ConversationMessage::assistant(self.content, now),
        }
    }
}

/// Converts a wire history into domain messages.
///
/// Fails on the first blank message rather than silently dropping it.
pub fn history_to_domain(
    history: Vec<ChatMessageDto>,
) -> Result<Vec<ConversationMessage>, ValidationError> {
    history
        .into_iter()
        .map(ChatMessageDto::into_domain)
        .collect()
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Response for a started session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionResponse {
    pub session_id: String,
}

/// Response for one conversation turn.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub message: String,
    pub provider: String,
    pub ready_for_report: bool,
}

/// Response for a synthesized report.
///
/// `Report`'s own serde shape is the wire schema the models are
/// prompted to produce, so it is embedded as-is.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateReportResponse {
    pub report: Report,
}

/// Response for a stored report read.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetReportResponse {
    pub report: Report,
    pub mode: GameMode,
    pub niche: Niche,
    pub language: Language,
    pub completed_at: String,
}

// ════════════════════════════════════════════════════════════════════════════
// Error envelope
// ════════════════════════════════════════════════════════════════════════════

/// Standard error envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

/// Error payload inside the envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorEnvelope {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.error.details = Some(details);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::session::MessageRole;

    #[test]
    fn start_session_request_deserializes_camel_case() {
        let json = r#"{
            "mode": "audit",
            "niche": "restauration",
            "language": "fr",
            "companyName": "Chez Luc",
            "siteUrl": "https://chez-luc.fr"
        }"#;
        let req: StartSessionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.mode, GameMode::Audit);
        assert_eq!(req.niche, Niche::Restauration);
        assert_eq!(req.company_name, "Chez Luc");
        assert_eq!(req.site_url, Some("https://chez-luc.fr".to_string()));
    }

    #[test]
    fn start_session_request_site_url_is_optional() {
        let json = r#"{
            "mode": "startup",
            "niche": "ecommerce",
            "language": "en",
            "companyName": "Acme"
        }"#;
        let req: StartSessionRequest = serde_json::from_str(json).unwrap();
        assert!(req.site_url.is_none());
    }

    #[test]
    fn chat_request_defaults_history_to_empty() {
        let json = r#"{
            "message": "Bonjour",
            "mode": "audit",
            "niche": "restauration",
            "language": "fr"
        }"#;
        let req: ChatRequest = serde_json::from_str(json).unwrap();
        assert!(req.session_id.is_none());
        assert!(req.history.is_empty());
    }

    #[test]
    fn chat_history_roles_deserialize_lowercase() {
        let json = r#"{
            "message": "Et ensuite ?",
            "history": [
                {"role": "user", "content": "Bonjour"},
                {"role": "assistant", "content": "Bienvenue !"}
            ],
            "mode": "audit",
            "niche": "restauration",
            "language": "fr"
        }"#;
        let req: ChatRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.history[0].role, ChatRole::User);
        assert_eq!(req.history[1].role, ChatRole::Assistant);
    }

    #[test]
    fn history_converts_to_domain_messages() {
        let history = vec![
            ChatMessageDto {
                role: ChatRole::User,
                content: "Bonjour".to_string(),
            },
            ChatMessageDto {
                role: ChatRole::Assistant,
                content: "Bienvenue !".to_string(),
            },
        ];

        let messages = history_to_domain(history).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role(), MessageRole::User);
        assert_eq!(messages[1].content(), "Bienvenue !");
    }

    #[test]
    fn blank_history_message_fails_conversion() {
        let history = vec![ChatMessageDto {
            role: ChatRole::User,
            content: "   ".to_string(),
        }];

        assert!(history_to_domain(history).is_err());
    }

    #[test]
    fn generate_report_request_accepts_audit_summary() {
        let json = r#"{
            "mode": "audit",
            "niche": "restauration",
            "language": "fr",
            "history": [{"role": "user", "content": "Bonjour"}],
            "auditHtmlSummary": "Carte en PDF."
        }"#;
        let req: GenerateReportRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.audit_html_summary, Some("Carte en PDF.".to_string()));
    }

    #[test]
    fn chat_response_serializes_camel_case() {
        let response = ChatResponse {
            message: "Bienvenue !".to_string(),
            provider: "openai".to_string(),
            ready_for_report: false,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["readyForReport"], false);
        assert_eq!(json["provider"], "openai");
    }

    #[test]
    fn error_envelope_serializes_nested() {
        let envelope = ErrorEnvelope::new("NOT_FOUND", "Session not found");
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["error"]["code"], "NOT_FOUND");
        assert_eq!(json["error"]["message"], "Session not found");
        assert!(json["error"].get("details").is_none());
    }

    #[test]
    fn error_envelope_details_are_included_when_set() {
        let envelope = ErrorEnvelope::new("RATE_LIMIT_EXCEEDED", "Rate limit exceeded")
            .with_details(serde_json::json!({"retryAfterSecs": 12}));
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["error"]["details"]["retryAfterSecs"], 12);
    }
}
