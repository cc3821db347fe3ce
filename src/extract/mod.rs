//! Extractors: produce a raw batch from a configured source
//!
//! Extraction never raises to the scheduler. Each implementation
//! wraps a fallible `try_extract` and degrades any failure to an
//! empty batch with one error log line, so a missing file or an
//! unreachable API means "nothing to load this run", not a crash.

mod api;
mod file;

pub use api::ApiExtractor;
pub use file::FileExtractor;

use crate::config::{SourceConfig, SourceKind};
use crate::error::Result;
use crate::record::RawBatch;
use async_trait::async_trait;

/// A source that can produce a raw batch of sales rows
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Human-readable source description for log lines
    fn source(&self) -> String;

    /// Produce a raw batch. Infallible by contract: failures are
    /// logged and degrade to an empty batch.
    async fn extract(&self) -> RawBatch;
}

/// Create the extractor selected by configuration
pub fn create_extractor(config: &SourceConfig) -> Result<Box<dyn Extractor>> {
    match config.kind {
        SourceKind::File => Ok(Box::new(FileExtractor::new(config.path.clone()))),
        SourceKind::Api => Ok(Box::new(ApiExtractor::new(
            config.url.clone(),
            config.timeout_secs,
        )?)),
    }
}
