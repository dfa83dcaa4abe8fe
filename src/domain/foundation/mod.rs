//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, enums, and error types
//! that form the vocabulary of the audit game domain.

mod errors;
mod game_mode;
mod ids;
mod language;
mod niche;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use game_mode::GameMode;
pub use ids::SessionId;
pub use language::Language;
pub use niche::Niche;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
