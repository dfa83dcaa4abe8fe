//! Markdown report renderer.
//!
//! Renders a validated report as a Markdown document for the
//! `format=markdown` variant of the report read endpoint. Pure
//! formatting; heading labels follow the report's language.

use crate::domain::foundation::Language;
use crate::domain::report::Report;
use crate::ports::ReportRenderer;

/// Renders reports as Markdown.
#[derive(Debug, Clone, Default)]
pub struct MarkdownRenderer;

impl ReportRenderer for MarkdownRenderer {
    fn render(&self, report: &Report) -> String {
        let mut document = String::new();

        match report.language() {
            Language::Fr => {
                document.push_str("# Rapport\n\n");
                // French typography puts a space before the colon.
                document.push_str(&format!("**Secteur** : {}\n\n", report.sector()));
            }
            Language::En => {
                document.push_str("# Report\n\n");
                document.push_str(&format!("**Sector**: {}\n\n", report.sector()));
            }
        }

        document.push_str(report.summary());
        document.push('\n');

        for section in report.sections() {
            document.push_str(&format!("\n## {}\n\n", section.title()));
            for bullet in section.bullets() {
                document.push_str(&format!("- {}\n", bullet));
            }
        }

        document.push_str(&format!("\n**{}**\n", report.cta()));
        document
    }

    fn content_type(&self) -> &'static str {
        "text/markdown; charset=utf-8"
    }
}
