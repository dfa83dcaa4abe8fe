//! Content extraction port.
//!
//! Supplies a condensed text summary of the visitor's site for the audit
//! prompt. The kiosk frontend usually sends its own summary with the
//! generate-report request; this port covers the server-side fallback when
//! it does not. Extraction is enrichment only: failures never block a
//! report.

use async_trait::async_trait;

/// Port for fetching and condensing site content.
#[async_trait]
pub trait ContentExtractor: Send + Sync {
    /// Fetches `url` and returns a short plain-text summary of the page,
    /// or `None` when the extractor has nothing to offer.
    ///
    /// # Errors
    ///
    /// - `Fetch` when the page could not be retrieved
    /// - `Unsupported` when the content type cannot be summarized
    async fn extract(&self, url: &str) -> Result<Option<String>, ExtractionError>;
}

/// Content extraction errors.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// The page could not be retrieved.
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// The content type cannot be summarized.
    #[error("unsupported content: {0}")]
    Unsupported(String),
}
