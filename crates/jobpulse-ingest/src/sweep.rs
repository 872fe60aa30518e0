use std::collections::HashSet;

use jobpulse_store::ListingStore;
use tracing::{debug, error, info};

use crate::buffer::StagingBuffer;

/// How a sweep decides which drained listings to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepMode {
    /// Write everything. Used once, for the bootstrap sweep.
    Unconditional,
    /// Write only listings whose URL is not already stored.
    SkipExisting,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Listings taken from the buffer for this sweep.
    pub drained: usize,
    pub persisted: usize,
    /// Dropped because their URL was already stored.
    pub skipped_existing: usize,
    /// Write attempts that returned an error.
    pub failed: usize,
    /// Older listings emptied out of the buffer beyond `max_count`.
    pub discarded: usize,
}

/// Move up to `max_count` of the newest buffered listings into `store`.
///
/// The existing-URL snapshot is read once, before draining, so two new
/// listings with the same URL in one batch are both written. The buffer is
/// empty afterwards whatever happened; nothing is retried. If the snapshot
/// cannot be read the drained batch is dropped and counted as failed.
pub fn sweep(
    buffer: &StagingBuffer,
    store: &dyn ListingStore,
    max_count: usize,
    mode: SweepMode,
) -> SweepReport {
    if buffer.is_empty() {
        info!(?mode, "staging buffer is empty, nothing to persist");
        return SweepReport::default();
    }

    let known: Option<HashSet<String>> = match mode {
        SweepMode::Unconditional => Some(HashSet::new()),
        SweepMode::SkipExisting => match store.existing_urls() {
            Ok(urls) => Some(urls),
            Err(e) => {
                error!(error = %e, "could not read existing urls, dropping batch");
                None
            }
        },
    };

    let drained = buffer.drain_newest(max_count);
    let mut report = SweepReport {
        drained: drained.batch.len(),
        discarded: drained.discarded,
        ..SweepReport::default()
    };

    let Some(known) = known else {
        report.failed = report.drained;
        info!(
            ?mode,
            failed = report.failed,
            discarded = report.discarded,
            "sweep aborted, staging buffer cleared"
        );
        return report;
    };

    for listing in &drained.batch {
        if mode == SweepMode::SkipExisting && known.contains(&listing.url) {
            report.skipped_existing += 1;
            continue;
        }
        match store.insert(listing) {
            Ok(id) => {
                report.persisted += 1;
                debug!(id, url = %listing.url, "vacancy added");
            }
            Err(e) => {
                report.failed += 1;
                error!(url = %listing.url, error = %e, "failed to persist vacancy");
            }
        }
    }

    info!(
        ?mode,
        drained = report.drained,
        persisted = report.persisted,
        skipped_existing = report.skipped_existing,
        failed = report.failed,
        discarded = report.discarded,
        "sweep finished, staging buffer cleared"
    );
    report
}
