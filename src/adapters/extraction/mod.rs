//! Content Extraction Adapters.
//!
//! Implementations of the ContentExtractor port.

mod stub;

pub use stub::{FixedExtractor, NoopExtractor};
