//! Report domain module.
//!
//! The structured report document, its schema validation, and the
//! synthesizer that produces one from a finished conversation.

mod report;
mod synthesizer;

pub use report::{Report, ReportSection, SchemaViolations};
pub use synthesizer::{ReportSynthesizer, SynthesisError};
