//! Report Rendering Adapters.
//!
//! Implementations of the ReportRenderer port.

mod markdown;

pub use markdown::MarkdownRenderer;
