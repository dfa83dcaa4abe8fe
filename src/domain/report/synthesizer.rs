//! Report synthesizer.
//!
//! Turns a finished conversation into a schema-valid structured report.
//! The completion is requested in JSON mode, stripped of markdown fences
//! and validated field by field. An invalid payload earns exactly one
//! repair cycle that feeds the validation errors back to the model; a
//! second invalid payload is a terminal failure.
//!
//! # Invariants
//!
//! - The caller receives either a fully valid [`Report`] or an error,
//!   never a partially populated report
//! - At most two completions are requested per synthesis

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::conversation::{prompt, ConversationEngine, EngineError};
use crate::domain::foundation::{GameMode, Language, Niche};
use crate::domain::session::ConversationMessage;
use crate::ports::{CompletionRequest, MessageRole};

use super::report::{Report, SchemaViolations};

/// Synthesizes structured reports through the provider fallback engine.
pub struct ReportSynthesizer {
    engine: Arc<ConversationEngine>,
}

impl ReportSynthesizer {
    /// Creates a synthesizer over the shared conversation engine.
    pub fn new(engine: Arc<ConversationEngine>) -> Self {
        Self { engine }
    }

    /// Generates a schema-valid report from a finished conversation.
    ///
    /// `audit_summary` is optional context; its absence never blocks
    /// synthesis.
    pub async fn synthesize(
        &self,
        conversation: &[ConversationMessage],
        mode: GameMode,
        niche: Niche,
        language: Language,
        audit_summary: Option<&str>,
    ) -> Result<Report, SynthesisError> {
        let report_prompt =
            prompt::report_prompt(conversation, mode, niche, language, audit_summary);

        let request = CompletionRequest::new()
            .with_message(MessageRole::User, report_prompt.clone())
            .with_json_mode(true);

        let (response, info) = self.engine.complete(request).await?;

        let violations = match Report::parse(&strip_code_fences(&response.content)) {
            Ok(report) => {
                debug!(provider = %info.name, "report synthesized on first attempt");
                return Ok(report);
            }
            Err(violations) => violations,
        };

        warn!(
            provider = %info.name,
            violations = violations.len(),
            "report failed schema validation, issuing repair attempt"
        );

        let repair_request = CompletionRequest::new()
            .with_message(MessageRole::User, report_prompt)
            .with_message(MessageRole::Assistant, response.content)
            .with_message(MessageRole::User, repair_instruction(&violations, language))
            .with_json_mode(true);

        let (repaired, info) = self.engine.complete(repair_request).await?;

        match Report::parse(&strip_code_fences(&repaired.content)) {
            Ok(report) => {
                debug!(provider = %info.name, "report synthesized after repair");
                Ok(report)
            }
            Err(violations) => {
                warn!(
                    provider = %info.name,
                    violations = violations.len(),
                    "repaired report is still schema-invalid"
                );
                Err(SynthesisError::SchemaInvalid { violations })
            }
        }
    }
}

/// Report synthesis errors.
#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    /// The model produced a schema-invalid payload twice.
    #[error("report failed schema validation after repair: {violations}")]
    SchemaInvalid {
        /// Violations from the repaired attempt.
        violations: SchemaViolations,
    },

    /// The provider chain was exhausted while generating the report.
    #[error(transparent)]
    Providers(#[from] EngineError),
}

/// Removes markdown code fences models wrap JSON payloads in.
fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// Builds the corrective follow-up listing what was wrong.
fn repair_instruction(violations: &SchemaViolations, language: Language) -> String {
    let listed = violations
        .messages()
        .iter()
        .map(|v| format!("- {}", v))
        .collect::<Vec<_>>()
        .join("\n");

    match language {
        Language::Fr => format!(
            "Ta réponse précédente ne respecte pas le format demandé. \
             Erreurs de validation :\n{listed}\n\n\
             Réponds à nouveau, UNIQUEMENT avec un JSON valide au format demandé, \
             sans texte avant ni après."
        ),
        Language::En => format!(
            "Your previous response does not match the requested format. \
             Validation errors:\n{listed}\n\n\
             Respond again, ONLY with valid JSON in the requested format, \
             no text before or after."
        ),
    }
}
