//! AI provider configuration
//!
//! Each provider is optional; the fallback chain is built from whichever
//! ones are configured. Ollama needs no API key and joins the chain when
//! a base URL is set.

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Wire names of the supported providers, in default chain order.
const PROVIDER_NAMES: [&str; 5] = ["openai", "perplexity", "gemini", "grok", "ollama"];

/// AI provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// OpenAI API key
    pub openai_api_key: Option<String>,

    /// OpenAI model override
    pub openai_model: Option<String>,

    /// Perplexity API key
    pub perplexity_api_key: Option<String>,

    /// Perplexity model override
    pub perplexity_model: Option<String>,

    /// Gemini API key
    pub gemini_api_key: Option<String>,

    /// Gemini model override
    pub gemini_model: Option<String>,

    /// Grok (x.ai) API key
    pub grok_api_key: Option<String>,

    /// Grok model override
    pub grok_model: Option<String>,

    /// Ollama base URL; setting it enables the local fallback
    pub ollama_base_url: Option<String>,

    /// Ollama model override
    pub ollama_model: Option<String>,

    /// Provider to try first, ahead of the default chain order
    pub default_provider: Option<String>,

    /// Per-call timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl AiConfig {
    /// Get the per-call timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if OpenAI is configured
    pub fn has_openai(&self) -> bool {
        self.openai_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Check if Perplexity is configured
    pub fn has_perplexity(&self) -> bool {
        self.perplexity_api_key
            .as_ref()
            .is_some_and(|k| !k.is_empty())
    }

    /// Check if Gemini is configured
    pub fn has_gemini(&self) -> bool {
        self.gemini_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Check if Grok is configured
    pub fn has_grok(&self) -> bool {
        self.grok_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Check if Ollama is configured
    pub fn has_ollama(&self) -> bool {
        self.ollama_base_url.as_ref().is_some_and(|u| !u.is_empty())
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        // At least one provider must be usable
        if !self.has_openai()
            && !self.has_perplexity()
            && !self.has_gemini()
            && !self.has_grok()
            && !self.has_ollama()
        {
            return Err(ValidationError::NoAiProviderConfigured);
        }

        if let Some(name) = &self.default_provider {
            if !PROVIDER_NAMES.contains(&name.to_ascii_lowercase().as_str()) {
                return Err(ValidationError::UnknownProvider(name.clone()));
            }
        }

        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }

        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_model: None,
            perplexity_api_key: None,
            perplexity_model: None,
            gemini_api_key: None,
            gemini_model: None,
            grok_api_key: None,
            grok_model: None,
            ollama_base_url: None,
            ollama_model: None,
            default_provider: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}
