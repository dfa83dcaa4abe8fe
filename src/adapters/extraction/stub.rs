//! Stub content extraction adapters.
//!
//! The kiosk frontend normally ships its own site summary with the
//! generate-report request, so the server-side extractor is a fallback
//! seam. `NoopExtractor` is the production default; `FixedExtractor`
//! lets tests and demos inject a canned summary.

use async_trait::async_trait;

use crate::ports::{ContentExtractor, ExtractionError};

/// Extractor that never has anything to offer.
#[derive(Debug, Clone, Default)]
pub struct NoopExtractor;

#[async_trait]
impl ContentExtractor for NoopExtractor {
    async fn extract(&self, _url: &str) -> Result<Option<String>, ExtractionError> {
        Ok(None)
    }
}

/// Extractor that returns the same summary for every URL.
#[derive(Debug, Clone)]
pub struct FixedExtractor {
    summary: String,
}

impl FixedExtractor {
    /// Creates an extractor that always yields `summary`.
    pub fn returning(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
        }
    }
}

#[async_trait]
impl ContentExtractor for FixedExtractor {
    async fn extract(&self, _url: &str) -> Result<Option<String>, ExtractionError> {
        Ok(Some(self.summary.clone()))
    }
}
