//! Conversation engine with ordered provider fallback.
//!
//! Walks the configured AI provider chain in order, giving each provider
//! one bounded attempt per request. The first non-empty completion wins.
//! When every provider has failed, the engine reports the full attempt
//! trail so callers can surface what went wrong.
//!
//! # Design
//!
//! - Providers are injected in fallback order; the engine never reorders them
//! - One attempt per provider per request, no in-chain retries
//! - Each call is bounded by the engine's timeout; a late reply is discarded
//! - Blank completions count as failures so the chain keeps moving

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, warn};

use crate::domain::foundation::{GameMode, Language, Niche};
use crate::domain::session::{ConversationMessage, MessageRole as SessionRole};
use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, Message, MessageRole, ProviderInfo,
};

use super::prompt;

/// Temperature for conversational turns. Report synthesis uses provider
/// defaults instead.
const CONVERSATION_TEMPERATURE: f32 = 0.7;

/// Engine that produces assistant replies by falling back across providers.
pub struct ConversationEngine {
    providers: Vec<Arc<dyn AIProvider>>,
    call_timeout: Duration,
}

impl ConversationEngine {
    /// Creates an engine over an ordered provider chain.
    ///
    /// The chain should be non-empty; an empty chain exhausts immediately
    /// on every request.
    pub fn new(providers: Vec<Arc<dyn AIProvider>>, call_timeout: Duration) -> Self {
        Self {
            providers,
            call_timeout,
        }
    }

    /// Names of the configured providers, in fallback order.
    pub fn provider_names(&self) -> Vec<String> {
        self.providers
            .iter()
            .map(|p| p.provider_info().name)
            .collect()
    }

    /// Produces one assistant reply for the conversation so far.
    ///
    /// `history` holds the prior turns; `user_message` is the new input and
    /// is appended after the history. The reply text has the readiness
    /// marker stripped; its presence is reported separately.
    pub async fn converse(
        &self,
        history: &[ConversationMessage],
        user_message: &str,
        mode: GameMode,
        niche: Niche,
        language: Language,
        audit_summary: Option<&str>,
    ) -> Result<EngineReply, EngineError> {
        let system = prompt::system_prompt(mode, niche, language, audit_summary);

        let request = CompletionRequest::new()
            .with_system_prompt(system)
            .with_messages(history.iter().map(port_message))
            .with_message(MessageRole::User, user_message)
            .with_temperature(CONVERSATION_TEMPERATURE);

        let (response, info) = self.complete(request).await?;
        let (text, ready_for_report) = prompt::strip_ready_flag(&response.content);

        Ok(EngineReply {
            text,
            provider: info.name,
            ready_for_report,
        })
    }

    /// Runs one completion through the provider chain.
    ///
    /// Returns the first successful response together with the provider
    /// that produced it. Timeouts and blank completions are recorded as
    /// failed attempts like any provider error.
    pub async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<(CompletionResponse, ProviderInfo), EngineError> {
        let mut attempts = Vec::new();

        for provider in &self.providers {
            let info = provider.provider_info();

            let outcome = match timeout(self.call_timeout, provider.complete(request.clone())).await
            {
                Ok(result) => result,
                Err(_) => Err(AIError::timeout(self.call_timeout.as_secs() as u32)),
            };

            match outcome {
                Ok(response) if response.content.trim().is_empty() => {
                    warn!(
                        provider = %info.name,
                        "AI provider returned an empty completion, trying next"
                    );
                    attempts.push(ProviderAttempt::new(&info.name, AIError::EmptyCompletion));
                }
                Ok(response) => {
                    debug!(
                        provider = %info.name,
                        model = %response.model,
                        "AI completion succeeded"
                    );
                    return Ok((response, info));
                }
                Err(err) => {
                    warn!(
                        provider = %info.name,
                        error = %err,
                        "AI provider failed, trying next"
                    );
                    attempts.push(ProviderAttempt::new(&info.name, err));
                }
            }
        }

        Err(EngineError::ProviderExhausted { attempts })
    }
}

/// One assistant reply, with the provider that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineReply {
    /// Reply text with the readiness marker removed.
    pub text: String,
    /// Name of the provider that answered.
    pub provider: String,
    /// Whether the assistant signalled the conversation is report-ready.
    pub ready_for_report: bool,
}

/// Record of one failed provider attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderAttempt {
    /// Provider name.
    pub provider: String,
    /// Rendered provider error.
    pub error: String,
}

impl ProviderAttempt {
    fn new(provider: &str, error: AIError) -> Self {
        Self {
            provider: provider.to_string(),
            error: error.to_string(),
        }
    }
}

impl std::fmt::Display for ProviderAttempt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.provider, self.error)
    }
}

/// Conversation engine errors.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Every provider in the chain failed for this request.
    #[error("all AI providers failed after {} attempt(s)", attempts.len())]
    ProviderExhausted {
        /// Per-provider failure trail, in chain order.
        attempts: Vec<ProviderAttempt>,
    },
}

/// Maps a stored conversation message to the provider wire format.
fn port_message(message: &ConversationMessage) -> Message {
    match message.role() {
        SessionRole::User => Message::user(message.content()),
        SessionRole::Assistant => Message::assistant(message.content()),
    }
}
