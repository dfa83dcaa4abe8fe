//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - HTTP clients for the LLM provider APIs, plus the test mock
//! - `extraction` - Site content extraction stubs
//! - `http` - REST API for the kiosk frontend
//! - `persistence` - Session storage (in-memory)
//! - `rate_governor` - Sliding-window admission control
//! - `rendering` - Report rendering (markdown)

pub mod ai;
pub mod extraction;
pub mod http;
pub mod persistence;
pub mod rate_governor;
pub mod rendering;

pub use ai::{HttpProvider, HttpProviderConfig, MockAIProvider, MockError, ProviderKind};
pub use extraction::{FixedExtractor, NoopExtractor};
pub use persistence::InMemorySessionStore;
pub use rate_governor::SlidingWindowGovernor;
pub use rendering::MarkdownRenderer;
