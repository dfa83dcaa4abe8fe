//! AI Provider Adapters.
//!
//! Implementations of the AIProvider port for the supported LLM vendors.
//!
//! ## Available Adapters
//!
//! - `HttpProvider` - OpenAI, Perplexity, Gemini, Grok and Ollama over HTTP
//! - `MockAIProvider` - Configurable mock for testing
//!
//! [`build_provider_chain`] assembles the ordered fallback chain the
//! conversation engine walks, hoisting a preferred vendor to the front
//! when one is configured.

use reqwest::Client;
use std::sync::Arc;

use crate::ports::AIProvider;

mod http_provider;
mod mock_provider;

pub use http_provider::{HttpProvider, HttpProviderConfig, ProviderKind};
pub use mock_provider::{MockAIProvider, MockError, MockResponse};

/// Builds the ordered provider chain from per-vendor configurations.
///
/// Order is preserved as given except that `preferred`, when present in
/// the list, moves to the front. Vendors without a configuration entry
/// simply never appear.
pub fn build_provider_chain(
    mut configs: Vec<HttpProviderConfig>,
    preferred: Option<ProviderKind>,
    client: &Client,
) -> Vec<Arc<dyn AIProvider>> {
    if let Some(kind) = preferred {
        if let Some(position) = configs.iter().position(|config| config.kind() == kind) {
            let config = configs.remove(position);
            configs.insert(0, config);
        }
    }

    configs
        .into_iter()
        .map(|config| Arc::new(HttpProvider::new(config, client.clone())) as Arc<dyn AIProvider>)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configs() -> Vec<HttpProviderConfig> {
        vec![
            HttpProviderConfig::new(ProviderKind::OpenAi).with_api_key("k1"),
            HttpProviderConfig::new(ProviderKind::Gemini).with_api_key("k2"),
            HttpProviderConfig::new(ProviderKind::Ollama),
        ]
    }

    fn names(chain: &[Arc<dyn AIProvider>]) -> Vec<String> {
        chain.iter().map(|p| p.provider_info().name).collect()
    }

    #[test]
    fn chain_preserves_the_given_order() {
        let chain = build_provider_chain(configs(), None, &Client::new());
        assert_eq!(names(&chain), vec!["openai", "gemini", "ollama"]);
    }

    #[test]
    fn preferred_vendor_moves_to_the_front() {
        let chain = build_provider_chain(configs(), Some(ProviderKind::Gemini), &Client::new());
        assert_eq!(names(&chain), vec!["gemini", "openai", "ollama"]);
    }

    #[test]
    fn unconfigured_preference_changes_nothing() {
        let chain = build_provider_chain(configs(), Some(ProviderKind::Grok), &Client::new());
        assert_eq!(names(&chain), vec!["openai", "gemini", "ollama"]);
    }

    #[test]
    fn empty_configuration_yields_an_empty_chain() {
        let chain = build_provider_chain(Vec::new(), None, &Client::new());
        assert!(chain.is_empty());
    }
}
