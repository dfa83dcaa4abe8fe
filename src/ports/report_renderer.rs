//! Report rendering port.
//!
//! Turns a validated report into a display format other than the JSON the
//! kiosk UI consumes. The report read endpoint uses it for its
//! `format=markdown` variant.

use crate::domain::report::Report;

/// Port for rendering reports. Pure transformation, no I/O.
pub trait ReportRenderer: Send + Sync {
    /// Renders the report.
    fn render(&self, report: &Report) -> String;

    /// MIME type of the rendered output.
    fn content_type(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn report_renderer_is_object_safe() {
        fn _accepts_dyn(_renderer: &dyn ReportRenderer) {}
    }
}
