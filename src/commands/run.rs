//! Run and once command implementations

use crate::config::Config;
use crate::error::Result;
use crate::extract::create_extractor;
use crate::load::Loader;
use crate::pipeline::{Pipeline, RunReport};
use crate::schedule::{Scheduler, SystemClock};
use crate::store::SalesDb;
use chrono::Utc;
use tracing::info;

/// Wire the configured source and store into a pipeline
async fn build_pipeline(config: &Config) -> Result<Pipeline> {
    let db = SalesDb::new(&config.store.db_file).await?;
    let extractor = create_extractor(&config.source)?;
    Ok(Pipeline::new(extractor, Loader::new(db)))
}

/// Run the pipeline exactly once and exit
pub async fn cmd_once(config: &Config) -> Result<RunReport> {
    let pipeline = build_pipeline(config).await?;
    pipeline.run(Utc::now()).await
}

/// Run the scheduling loop forever
pub async fn cmd_run(config: &Config) -> Result<()> {
    let pipeline = build_pipeline(config).await?;
    let scheduler = Scheduler::new(SystemClock, &config.schedule);

    info!(
        "Running {} source pipeline every {} minute(s)",
        config.source.kind, config.schedule.interval_minutes
    );

    scheduler.run(|| pipeline.run(Utc::now())).await;
    Ok(())
}
