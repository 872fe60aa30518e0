use std::collections::HashSet;

use jobpulse_core::{CityCount, Listing, ListingPage, TitleCount};

use crate::error::Result;

/// Persistence contract the ingestion pipeline and the read API rely on.
///
/// Implementations handle their own internal synchronisation; callers share
/// a single instance behind an `Arc`.
pub trait ListingStore: Send + Sync {
    /// Persist one listing and return the row id assigned to it.
    fn insert(&self, listing: &Listing) -> Result<i64>;

    /// Every URL currently stored. Used as the dedup snapshot of a sweep.
    fn existing_urls(&self) -> Result<HashSet<String>>;

    /// Page `page_index` (0-based) of `page_size` listings, highest id first.
    fn paginated(&self, page_index: u32, page_size: u32) -> Result<ListingPage>;

    /// Listing count per location, largest first.
    fn city_counts(&self) -> Result<Vec<CityCount>>;

    /// Titles appearing more than once, most frequent first, at most `limit`.
    fn popular_titles(&self, limit: usize) -> Result<Vec<TitleCount>>;
}
