//! Conversation domain module.
//!
//! Produces the assistant side of the audit game dialogue: prompt
//! assembly per mode, niche and language, and the provider fallback
//! engine that turns a conversation into the next reply.

mod engine;
pub mod prompt;

pub use engine::{ConversationEngine, EngineError, EngineReply, ProviderAttempt};
pub use prompt::READY_FOR_REPORT_FLAG;
