//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, enums, errors)
//! - `session` - Audit game session lifecycle and phase state machine
//! - `conversation` - Prompt assembly and the provider fallback engine
//! - `report` - Structured report document and synthesis

pub mod conversation;
pub mod foundation;
pub mod report;
pub mod session;
