//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid host address")]
    InvalidHost,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("No AI provider configured")]
    NoAiProviderConfigured,

    #[error("Unknown AI provider: {0}")]
    UnknownProvider(String),

    #[error("Invalid rate limit settings")]
    InvalidRateLimit,
}
