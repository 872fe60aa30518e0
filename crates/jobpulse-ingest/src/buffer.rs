use std::sync::{Mutex, MutexGuard};

use jobpulse_core::Listing;

/// Result of [`StagingBuffer::drain_newest`].
#[derive(Debug, Default)]
pub struct Drained {
    /// Up to `max` listings, most recently appended first.
    pub batch: Vec<Listing>,
    /// Older listings that were emptied out of the buffer without being returned.
    pub discarded: usize,
}

/// Fetched-but-unpersisted listings, in fetch order.
///
/// Shared between the crawl and persist cadences behind an `Arc`. Every
/// operation completes inside a single lock scope, so an append lands either
/// wholly before or wholly after a drain.
#[derive(Debug, Default)]
pub struct StagingBuffer {
    items: Mutex<Vec<Listing>>,
}

impl StagingBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, listing: Listing) {
        self.lock().push(listing);
    }

    /// Append a whole page at once. Returns how many listings were added.
    pub fn append_all(&self, listings: Vec<Listing>) -> usize {
        let n = listings.len();
        if n > 0 {
            self.lock().extend(listings);
        }
        n
    }

    /// Take up to `max` listings from the newest end and empty the buffer.
    ///
    /// Reading and clearing happen under the same lock, so nothing appended
    /// concurrently can be lost between the two.
    pub fn drain_newest(&self, max: usize) -> Drained {
        let all = std::mem::take(&mut *self.lock());
        let discarded = all.len().saturating_sub(max);
        let batch = all.into_iter().rev().take(max).collect();
        Drained { batch, discarded }
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Listing>> {
        self.items.lock().unwrap_or_else(|e| e.into_inner())
    }
}
