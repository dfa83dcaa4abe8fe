//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## AI Ports
//!
//! - `AIProvider` - LLM completion providers (OpenAI, Perplexity, ...)
//!
//! ## Throttling Ports
//!
//! - `RateGovernor` - Per-caller admission control for public endpoints
//!
//! ## Persistence Ports
//!
//! - `SessionStore` - GameSession snapshots (fire-and-forget writes)
//!
//! ## Enrichment Ports
//!
//! - `ContentExtractor` - Site summaries for the audit prompt
//! - `ReportRenderer` - Alternative report output formats

mod ai_provider;
mod content_extractor;
mod rate_governor;
mod report_renderer;
mod session_store;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderInfo,
};
pub use content_extractor::{ContentExtractor, ExtractionError};
pub use rate_governor::{AdmitDecision, AdmitRejection, AdmitStatus, GovernorKey, RateGovernor};
pub use report_renderer::ReportRenderer;
pub use session_store::SessionStore;
