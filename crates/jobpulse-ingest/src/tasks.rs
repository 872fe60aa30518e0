use std::sync::Arc;

use async_trait::async_trait;
use jobpulse_core::config::ScheduleConfig;
use jobpulse_scheduler::{Cadence, SchedulerEngine, TickTask};

use crate::pipeline::IngestPipeline;

pub const CRAWL_CADENCE: &str = "crawl";
pub const PERSIST_CADENCE: &str = "persist";

/// Scheduled single-page fetch into the staging buffer.
pub struct CrawlTick(pub Arc<IngestPipeline>);

#[async_trait]
impl TickTask for CrawlTick {
    async fn run(&self) {
        self.0.crawl_tick().await;
    }
}

/// Scheduled existence-checked sweep of the staging buffer.
pub struct PersistTick(pub Arc<IngestPipeline>);

#[async_trait]
impl TickTask for PersistTick {
    async fn run(&self) {
        self.0.persist_tick();
    }
}

/// Register the crawl and persist cadences on `engine`.
pub fn register_cadences(
    engine: &mut SchedulerEngine,
    pipeline: Arc<IngestPipeline>,
    schedule: &ScheduleConfig,
) {
    engine
        .add(
            Cadence::new(CRAWL_CADENCE, schedule.crawl_interval()),
            Arc::new(CrawlTick(Arc::clone(&pipeline))),
        )
        .add(
            Cadence::new(PERSIST_CADENCE, schedule.persist_interval()),
            Arc::new(PersistTick(pipeline)),
        );
}
