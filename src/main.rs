//! Binary entrypoint: wires configuration, the provider chain, and the
//! HTTP server together.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use audit_quest::adapters::ai::{build_provider_chain, HttpProviderConfig, ProviderKind};
use audit_quest::adapters::http::{app_router, GameHandlers, RatePolicy};
use audit_quest::adapters::{
    InMemorySessionStore, MarkdownRenderer, NoopExtractor, SlidingWindowGovernor,
};
use audit_quest::application::handlers::{
    ChatTurnHandler, GenerateReportHandler, GetReportHandler, StartSessionHandler,
};
use audit_quest::config::{AiConfig, AppConfig};
use audit_quest::domain::conversation::ConversationEngine;
use audit_quest::domain::report::ReportSynthesizer;
use audit_quest::ports::{ContentExtractor, RateGovernor, ReportRenderer, SessionStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_tracing(&config);

    // One HTTP client for every provider; per-call timeouts are set per request.
    let client = reqwest::Client::builder()
        .connect_timeout(std::time::Duration::from_secs(10))
        .build()?;

    let providers = build_provider_chain(
        provider_configs(&config.ai),
        config
            .ai
            .default_provider
            .as_deref()
            .and_then(ProviderKind::from_name),
        &client,
    );
    tracing::info!(
        providers = providers.len(),
        chain = %providers
            .iter()
            .map(|p| p.provider_info().name)
            .collect::<Vec<_>>()
            .join(" -> "),
        "provider chain assembled"
    );

    let engine = Arc::new(ConversationEngine::new(providers, config.ai.timeout()));
    let synthesizer = Arc::new(ReportSynthesizer::new(Arc::clone(&engine)));

    let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
    let extractor: Arc<dyn ContentExtractor> = Arc::new(NoopExtractor);
    let renderer: Arc<dyn ReportRenderer> = Arc::new(MarkdownRenderer);
    let governor: Arc<dyn RateGovernor> = Arc::new(SlidingWindowGovernor::new());

    let handlers = GameHandlers::new(
        Arc::new(StartSessionHandler::new(Arc::clone(&store))),
        Arc::new(ChatTurnHandler::new(
            Arc::clone(&engine),
            Arc::clone(&store),
        )),
        Arc::new(GenerateReportHandler::new(
            synthesizer,
            Arc::clone(&store),
            extractor,
        )),
        Arc::new(GetReportHandler::new(store)),
        renderer,
    );

    let chat_policy = RatePolicy::new(
        governor,
        "chat",
        config.rate_limit.chat_limit,
        config.rate_limit.chat_window(),
    );

    let app = app_router(handlers, chat_policy);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, version = env!("CARGO_PKG_VERSION"), "audit game backend listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// Builds one provider config per configured vendor, in chain order.
fn provider_configs(ai: &AiConfig) -> Vec<HttpProviderConfig> {
    let mut configs = Vec::new();

    let keyed = [
        (ProviderKind::OpenAi, &ai.openai_api_key, &ai.openai_model),
        (
            ProviderKind::Perplexity,
            &ai.perplexity_api_key,
            &ai.perplexity_model,
        ),
        (ProviderKind::Gemini, &ai.gemini_api_key, &ai.gemini_model),
        (ProviderKind::Grok, &ai.grok_api_key, &ai.grok_model),
    ];
    for (kind, api_key, model) in keyed {
        if let Some(key) = api_key.as_deref().filter(|k| !k.is_empty()) {
            let mut config = HttpProviderConfig::new(kind)
                .with_api_key(key)
                .with_timeout(ai.timeout());
            if let Some(model) = model {
                config = config.with_model(model.clone());
            }
            configs.push(config);
        }
    }

    if let Some(base_url) = ai.ollama_base_url.as_deref().filter(|u| !u.is_empty()) {
        let mut config = HttpProviderConfig::new(ProviderKind::Ollama)
            .with_base_url(base_url)
            .with_timeout(ai.timeout());
        if let Some(model) = &ai.ollama_model {
            config = config.with_model(model.clone());
        }
        configs.push(config);
    }

    configs
}
