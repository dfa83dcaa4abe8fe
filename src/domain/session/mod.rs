//! Session domain module.
//!
//! Handles the game session lifecycle: the phase machine from idle to the
//! final report, the recorded conversation, and the session error taxonomy.

mod aggregate;
mod errors;
mod message;
mod phase;

pub use aggregate::GameSession;
pub use errors::SessionError;
pub use message::{ConversationMessage, MessageRole};
pub use phase::GamePhase;
