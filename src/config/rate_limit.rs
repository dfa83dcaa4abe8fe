//! Rate limiting configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Rate limiting configuration for the chat endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Requests admitted per window per client
    #[serde(default = "default_chat_limit")]
    pub chat_limit: u32,

    /// Window length in seconds
    #[serde(default = "default_chat_window")]
    pub chat_window_secs: u64,
}

impl RateLimitConfig {
    /// Get the window as Duration
    pub fn chat_window(&self) -> Duration {
        Duration::from_secs(self.chat_window_secs)
    }

    /// Validate rate limit configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.chat_limit == 0 || self.chat_window_secs == 0 {
            return Err(ValidationError::InvalidRateLimit);
        }
        Ok(())
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            chat_limit: default_chat_limit(),
            chat_window_secs: default_chat_window(),
        }
    }
}

fn default_chat_limit() -> u32 {
    20
}

fn default_chat_window() -> u64 {
    60
}
