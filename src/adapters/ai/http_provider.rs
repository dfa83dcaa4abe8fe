//! HTTP provider - one adapter for every supported LLM vendor.
//!
//! The vendors fall into three wire dialects: OpenAI-style chat
//! completions (OpenAI, Perplexity, Grok), Gemini generateContent, and
//! the Ollama chat API. [`ProviderKind`] selects the dialect, endpoint,
//! auth scheme and default model; request and response payloads are sum
//! types over the three shapes.
//!
//! # Configuration
//!
//! ```ignore
//! let config = HttpProviderConfig::new(ProviderKind::OpenAi)
//!     .with_api_key(api_key)
//!     .with_model("gpt-4o");
//!
//! let provider = HttpProvider::new(config, client);
//! ```
//!
//! Retries are deliberately absent here; the conversation engine's
//! provider fallback is the only retry policy.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, MessageRole,
    ProviderInfo,
};

/// Fallback when a 429 response carries no usable Retry-After header.
const DEFAULT_RETRY_AFTER_SECS: u32 = 30;

/// Supported LLM vendors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    OpenAi,
    Perplexity,
    Gemini,
    Grok,
    Ollama,
}

impl ProviderKind {
    /// Default fallback order for the provider chain.
    pub const CHAIN_ORDER: [ProviderKind; 5] = [
        ProviderKind::OpenAi,
        ProviderKind::Perplexity,
        ProviderKind::Gemini,
        ProviderKind::Grok,
        ProviderKind::Ollama,
    ];

    /// Canonical provider name.
    pub fn name(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Perplexity => "perplexity",
            ProviderKind::Gemini => "gemini",
            ProviderKind::Grok => "grok",
            ProviderKind::Ollama => "ollama",
        }
    }

    /// Looks a kind up by its canonical name.
    pub fn from_name(name: &str) -> Option<ProviderKind> {
        match name.to_ascii_lowercase().as_str() {
            "openai" => Some(ProviderKind::OpenAi),
            "perplexity" => Some(ProviderKind::Perplexity),
            "gemini" => Some(ProviderKind::Gemini),
            "grok" => Some(ProviderKind::Grok),
            "ollama" => Some(ProviderKind::Ollama),
            _ => None,
        }
    }

    /// Model used when none is configured.
    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "gpt-4o",
            ProviderKind::Perplexity => "sonar-reasoning-pro",
            ProviderKind::Gemini => "gemini-2.0-flash",
            ProviderKind::Grok => "grok-beta",
            ProviderKind::Ollama => "llama3",
        }
    }

    /// API root used when none is configured.
    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "https://api.openai.com/v1",
            ProviderKind::Perplexity => "https://api.perplexity.ai",
            ProviderKind::Gemini => "https://generativelanguage.googleapis.com/v1beta",
            ProviderKind::Grok => "https://api.x.ai/v1",
            ProviderKind::Ollama => "http://localhost:11434",
        }
    }

    /// Whether the vendor needs an API key at all.
    pub fn requires_api_key(&self) -> bool {
        !matches!(self, ProviderKind::Ollama)
    }

    /// Whether the chat dialect accepts `response_format: json_object`.
    fn supports_json_response_format(&self) -> bool {
        matches!(self, ProviderKind::OpenAi | ProviderKind::Grok)
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration for one HTTP provider.
#[derive(Debug, Clone)]
pub struct HttpProviderConfig {
    kind: ProviderKind,
    /// API key for authentication (unused by Ollama).
    api_key: Option<Secret<String>>,
    /// Model identifier sent to the vendor.
    pub model: String,
    /// API root URL.
    pub base_url: String,
    /// Timeout the shared HTTP client was built with.
    pub timeout: Duration,
}

impl HttpProviderConfig {
    /// Creates a configuration with the vendor's defaults.
    pub fn new(kind: ProviderKind) -> Self {
        Self {
            kind,
            api_key: None,
            model: kind.default_model().to_string(),
            base_url: kind.default_base_url().to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(Secret::new(api_key.into()));
        self
    }

    /// Sets the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the API root URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Records the request timeout (used for error reporting).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the vendor kind.
    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    /// Exposes the API key (for making requests).
    fn api_key(&self) -> Option<&str> {
        self.api_key.as_ref().map(|key| key.expose_secret().as_str())
    }
}

/// LLM provider speaking one of the supported HTTP dialects.
pub struct HttpProvider {
    config: HttpProviderConfig,
    client: Client,
}

impl HttpProvider {
    /// Creates a provider over a shared HTTP client.
    ///
    /// The client should be built with the timeout the config reports.
    pub fn new(config: HttpProviderConfig, client: Client) -> Self {
        Self { config, client }
    }

    /// Builds the completion endpoint URL for this vendor.
    fn endpoint_url(&self) -> String {
        match self.config.kind {
            ProviderKind::OpenAi | ProviderKind::Perplexity | ProviderKind::Grok => {
                format!("{}/chat/completions", self.config.base_url)
            }
            ProviderKind::Gemini => format!(
                "{}/models/{}:generateContent",
                self.config.base_url, self.config.model
            ),
            ProviderKind::Ollama => format!("{}/api/chat", self.config.base_url),
        }
    }

    /// Converts our request to the vendor's wire format.
    fn build_body(&self, request: &CompletionRequest) -> WireBody {
        match self.config.kind {
            ProviderKind::Gemini => WireBody::Generate(self.generate_body(request)),
            ProviderKind::Ollama => WireBody::OllamaChat(self.ollama_body(request)),
            _ => WireBody::Chat(self.chat_body(request)),
        }
    }

    fn chat_body(&self, request: &CompletionRequest) -> ChatBody {
        let response_format = (request.json_mode
            && self.config.kind.supports_json_response_format())
        .then_some(ResponseFormat {
            format_type: "json_object",
        });

        ChatBody {
            model: self.config.model.clone(),
            messages: chat_messages(request),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            response_format,
        }
    }

    fn generate_body(&self, request: &CompletionRequest) -> GenerateBody {
        let contents = request
            .messages
            .iter()
            .map(|message| GeminiContent {
                // Gemini has no system role inside contents.
                role: match message.role {
                    MessageRole::Assistant => "model",
                    _ => "user",
                },
                parts: vec![GeminiPart {
                    text: message.content.clone(),
                }],
            })
            .collect();

        let system_instruction = request.system_prompt.as_ref().map(|prompt| {
            GeminiSystemInstruction {
                parts: vec![GeminiPart {
                    text: prompt.clone(),
                }],
            }
        });

        let generation_config = (request.temperature.is_some()
            || request.max_tokens.is_some()
            || request.json_mode)
        .then_some(GenerationConfig {
            temperature: request.temperature,
            max_output_tokens: request.max_tokens,
            response_mime_type: request.json_mode.then_some("application/json"),
        });

        GenerateBody {
            contents,
            system_instruction,
            generation_config,
        }
    }

    fn ollama_body(&self, request: &CompletionRequest) -> OllamaBody {
        OllamaBody {
            model: self.config.model.clone(),
            messages: chat_messages(request),
            stream: false,
            format: request.json_mode.then_some("json"),
            options: request
                .temperature
                .map(|temperature| OllamaOptions { temperature }),
        }
    }

    fn require_key(&self) -> Result<&str, AIError> {
        self.config.api_key().ok_or_else(|| {
            AIError::invalid_request(format!(
                "{} provider has no API key configured",
                self.config.kind.name()
            ))
        })
    }

    fn map_transport_error(&self, err: reqwest::Error) -> AIError {
        if err.is_timeout() {
            AIError::timeout(self.config.timeout.as_secs() as u32)
        } else if err.is_connect() {
            AIError::network(format!("connection failed: {}", err))
        } else {
            AIError::network(err.to_string())
        }
    }

    /// Parses the API response status and handles errors.
    async fn handle_status(&self, response: Response) -> Result<Response, AIError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let retry_after = parse_retry_after(response.headers());
        let body = response.text().await.unwrap_or_default();

        match status.as_u16() {
            401 | 403 => Err(AIError::AuthenticationFailed),
            429 => Err(AIError::rate_limited(retry_after)),
            400..=499 => Err(AIError::invalid_request(format!("{}: {}", status, body))),
            500..=599 => Err(AIError::unavailable(format!(
                "server error {}: {}",
                status, body
            ))),
            _ => Err(AIError::network(format!(
                "unexpected status {}: {}",
                status, body
            ))),
        }
    }
}

#[async_trait]
impl AIProvider for HttpProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let body = self.build_body(&request);

        let builder = self.client.post(self.endpoint_url());
        let builder = match self.config.kind {
            ProviderKind::Ollama => builder,
            ProviderKind::Gemini => builder.header("x-goog-api-key", self.require_key()?),
            _ => builder.header("Authorization", format!("Bearer {}", self.require_key()?)),
        };

        let response = builder
            .timeout(self.config.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;
        let response = self.handle_status(response).await?;

        let wire: WireResponse = response
            .json()
            .await
            .map_err(|e| AIError::parse(format!("failed to decode provider response: {}", e)))?;
        let reply = wire.into_reply()?;

        Ok(CompletionResponse {
            content: reply.content,
            model: reply.model.unwrap_or_else(|| self.config.model.clone()),
            finish_reason: reply.finish_reason,
        })
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new(self.config.kind.name(), &self.config.model)
    }
}

/// Maps port roles onto the chat dialect, system prompt first.
fn chat_messages(request: &CompletionRequest) -> Vec<WireMessage> {
    let mut messages = Vec::with_capacity(request.messages.len() + 1);

    if let Some(ref prompt) = request.system_prompt {
        messages.push(WireMessage {
            role: "system",
            content: prompt.clone(),
        });
    }

    for message in &request.messages {
        messages.push(WireMessage {
            role: match message.role {
                MessageRole::System => "system",
                MessageRole::User => "user",
                MessageRole::Assistant => "assistant",
            },
            content: message.content.clone(),
        });
    }

    messages
}

fn parse_retry_after(headers: &HeaderMap) -> u32 {
    headers
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}

// ----- Wire Types -----

/// Request payload, one variant per dialect.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum WireBody {
    Chat(ChatBody),
    Generate(GenerateBody),
    OllamaChat(OllamaBody),
}

#[derive(Debug, Serialize)]
struct ChatBody {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateBody {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiSystemInstruction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    role: &'static str,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiSystemInstruction {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct OllamaBody {
    model: String,
    messages: Vec<WireMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OllamaOptions>,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
}

/// Response payload; variants are structurally disjoint, so untagged
/// decoding picks the right one.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireResponse {
    Chat(ChatResponse),
    Generate(GenerateResponse),
    OllamaChat(OllamaResponse),
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    model: Option<String>,
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Vec<GenerateCandidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateCandidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    model: Option<String>,
    message: OllamaReplyMessage,
    done_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OllamaReplyMessage {
    content: String,
}

#[derive(Debug)]
struct WireReply {
    content: String,
    model: Option<String>,
    finish_reason: FinishReason,
}

impl WireResponse {
    fn into_reply(self) -> Result<WireReply, AIError> {
        match self {
            WireResponse::Chat(chat) => {
                let choice = chat
                    .choices
                    .into_iter()
                    .next()
                    .ok_or_else(|| AIError::parse("no choices in response"))?;
                let finish_reason = match choice.finish_reason.as_deref() {
                    Some("length") => FinishReason::Length,
                    Some("content_filter") => FinishReason::ContentFilter,
                    _ => FinishReason::Stop,
                };
                Ok(WireReply {
                    content: choice.message.content.unwrap_or_default(),
                    model: chat.model,
                    finish_reason,
                })
            }
            WireResponse::Generate(generate) => {
                let candidate = generate
                    .candidates
                    .into_iter()
                    .next()
                    .ok_or_else(|| AIError::parse("no candidates in response"))?;
                let content = candidate
                    .content
                    .map(|content| {
                        content
                            .parts
                            .into_iter()
                            .map(|part| part.text)
                            .collect::<Vec<_>>()
                            .join("")
                    })
                    .unwrap_or_default();
                let finish_reason = match candidate.finish_reason.as_deref() {
                    Some("MAX_TOKENS") => FinishReason::Length,
                    Some("SAFETY") | Some("PROHIBITED_CONTENT") => FinishReason::ContentFilter,
                    _ => FinishReason::Stop,
                };
                Ok(WireReply {
                    content,
                    model: None,
                    finish_reason,
                })
            }
            WireResponse::OllamaChat(ollama) => {
                let finish_reason = match ollama.done_reason.as_deref() {
                    Some("length") => FinishReason::Length,
                    _ => FinishReason::Stop,
                };
                Ok(WireReply {
                    content: ollama.message.content,
                    model: ollama.model,
                    finish_reason,
                })
            }
        }
    }
}
