//! One extract → transform → load run

use crate::error::Result;
use crate::extract::Extractor;
use crate::load::{LoadResult, Loader};
use crate::transform::transform;
use chrono::{DateTime, Utc};
use tracing::info;

/// Counts from one pipeline run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    pub extracted: usize,
    pub transformed: usize,
    pub inserted: usize,
}

/// The ETL pipeline: a configured source feeding the sales store
pub struct Pipeline {
    extractor: Box<dyn Extractor>,
    loader: Loader,
}

impl Pipeline {
    pub fn new(extractor: Box<dyn Extractor>, loader: Loader) -> Self {
        Self { extractor, loader }
    }

    /// Run the pipeline once. Extraction and transformation recover
    /// from their failures internally; only a store read or write
    /// failure surfaces as `Err`, and then no partial write has
    /// corrupted existing rows.
    pub async fn run(&self, now: DateTime<Utc>) -> Result<RunReport> {
        info!("Starting ETL process");

        let batch = self.extractor.extract().await;
        let extracted = batch.len();

        let records = transform(&batch, now);
        let transformed = records.len();

        let LoadResult { inserted } = self.loader.load(&records).await?;

        info!(
            "ETL process completed: {} extracted, {} transformed, {} inserted",
            extracted, transformed, inserted
        );

        Ok(RunReport {
            extracted,
            transformed,
            inserted,
        })
    }
}
