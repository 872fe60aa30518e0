use std::sync::Arc;

use jobpulse_core::config::IngestConfig;
use jobpulse_store::ListingStore;
use tracing::info;

use crate::buffer::StagingBuffer;
use crate::crawl::{crawl_all, CrawlReport};
use crate::fetch::PageSource;
use crate::sweep::{sweep, SweepMode, SweepReport};

/// Owns everything the ingestion jobs share: the upstream source, the store,
/// the staging buffer and the ingest settings.
pub struct IngestPipeline {
    source: Arc<dyn PageSource>,
    store: Arc<dyn ListingStore>,
    buffer: Arc<StagingBuffer>,
    settings: IngestConfig,
}

impl IngestPipeline {
    pub fn new(
        source: Arc<dyn PageSource>,
        store: Arc<dyn ListingStore>,
        settings: IngestConfig,
    ) -> Self {
        Self {
            source,
            store,
            buffer: Arc::new(StagingBuffer::new()),
            settings,
        }
    }

    pub fn buffer(&self) -> Arc<StagingBuffer> {
        Arc::clone(&self.buffer)
    }

    /// Full crawl followed by an unconditional sweep of everything crawled.
    ///
    /// Runs once at startup, before the cadences and the read API.
    pub async fn bootstrap(&self) -> (CrawlReport, SweepReport) {
        info!(
            base_url = %self.settings.base_url,
            page_limit = ?self.settings.page_limit(),
            "bootstrap crawl starting"
        );
        let crawl = crawl_all(
            self.source.as_ref(),
            &self.buffer,
            self.settings.page_limit(),
        )
        .await;
        let swept = sweep(
            &self.buffer,
            self.store.as_ref(),
            self.buffer.len(),
            SweepMode::Unconditional,
        );
        info!(
            crawled = crawl.appended,
            persisted = swept.persisted,
            "bootstrap complete"
        );
        (crawl, swept)
    }

    /// Re-fetch the configured page into the buffer. Returns listings appended.
    pub async fn crawl_tick(&self) -> usize {
        let page = self.settings.refresh_page;
        let listings = self.source.fetch(page).await;
        let appended = self.buffer.append_all(listings);
        info!(page, appended, buffered = self.buffer.len(), "crawl tick done");
        appended
    }

    /// Persist up to `refresh_count` buffered listings not already stored.
    pub fn persist_tick(&self) -> SweepReport {
        sweep(
            &self.buffer,
            self.store.as_ref(),
            self.settings.refresh_count,
            SweepMode::SkipExisting,
        )
    }
}
