//! Application layer - commands, queries, and handlers.
//!
//! This layer orchestrates domain operations and coordinates between
//! ports. Command handlers mutate sessions; the report query handler
//! is the single read path.

pub mod error;
pub mod handlers;

pub use error::GameError;

pub use handlers::{
    // Session lifecycle
    StartSessionCommand, StartSessionHandler, StartSessionResult,
    // Conversation
    ChatTurnCommand, ChatTurnHandler, ChatTurnResult,
    // Reports
    GenerateReportCommand, GenerateReportHandler, GenerateReportResult,
    GetReportHandler, GetReportQuery, GetReportResult,
};
