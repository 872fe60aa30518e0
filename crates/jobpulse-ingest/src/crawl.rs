use tracing::{info, warn};

use crate::buffer::StagingBuffer;
use crate::fetch::PageSource;

/// Why a crawl ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlStop {
    /// A page came back with no listings.
    Exhausted,
    /// A page failed to fetch. Handled exactly like exhaustion.
    FetchFailed,
    /// The configured page ceiling was passed.
    PageLimit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlReport {
    /// Requests made, including the one that ended the crawl.
    pub pages_requested: u32,
    /// Listings appended to the buffer.
    pub appended: usize,
    pub stop: CrawlStop,
}

/// Walk pages 1, 2, … appending every listing to `buffer`.
///
/// Stops at the first page that contributes nothing (empty or failed) or,
/// when `page_limit` is `Some(k)`, after page `k`. One page is in flight at
/// a time.
pub async fn crawl_all(
    source: &dyn PageSource,
    buffer: &StagingBuffer,
    page_limit: Option<u32>,
) -> CrawlReport {
    let mut page: u32 = 1;
    let mut pages_requested = 0;
    let mut appended = 0;

    let stop = loop {
        if page_limit.is_some_and(|limit| page > limit) {
            break CrawlStop::PageLimit;
        }

        pages_requested += 1;
        match source.fetch_page(page).await {
            Ok(listings) if listings.is_empty() => break CrawlStop::Exhausted,
            Ok(listings) => {
                appended += buffer.append_all(listings);
                page += 1;
            }
            Err(e) => {
                warn!(page, error = %e, "crawl stopped by fetch failure");
                break CrawlStop::FetchFailed;
            }
        }
    };

    info!(pages_requested, appended, ?stop, "crawl finished");
    CrawlReport {
        pages_requested,
        appended,
        stop,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use async_trait::async_trait;
    use jobpulse_core::Listing;
    use std::sync::Mutex;

    fn listing(url: &str) -> Listing {
        Listing {
            slug: String::new(),
            company_name: String::new(),
            title: "Dev".to_string(),
            description: "d".to_string(),
            remote: false,
            url: url.to_string(),
            tags: Vec::new(),
            job_types: Vec::new(),
            location: "NY".to_string(),
            created_at: 0,
        }
    }

    /// Serves pre-baked pages; anything past the script is empty.
    /// A `None` page simulates a fetch failure.
    struct ScriptedSource {
        pages: Vec<Option<Vec<Listing>>>,
        requested: Mutex<Vec<u32>>,
    }

    impl ScriptedSource {
        fn new(pages: Vec<Option<Vec<Listing>>>) -> Self {
            Self {
                pages,
                requested: Mutex::new(Vec::new()),
            }
        }

        fn requested(&self) -> Vec<u32> {
            self.requested.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageSource for ScriptedSource {
        async fn fetch_page(&self, page: u32) -> Result<Vec<Listing>, FetchError> {
            self.requested.lock().unwrap().push(page);
            match self.pages.get(page as usize - 1) {
                Some(Some(listings)) => Ok(listings.clone()),
                Some(None) => Err(FetchError::Status { status: 503 }),
                None => Ok(Vec::new()),
            }
        }
    }

    fn page(prefix: &str, n: usize) -> Option<Vec<Listing>> {
        Some((0..n).map(|i| listing(&format!("{prefix}{i}"))).collect())
    }

    #[tokio::test]
    async fn appends_pages_in_order_until_first_empty_page() {
        let source = ScriptedSource::new(vec![
            page("a", 2),
            page("b", 3),
            Some(Vec::new()),
            page("c", 1),
        ]);
        let buffer = StagingBuffer::new();

        let report = crawl_all(&source, &buffer, None).await;

        assert_eq!(report.stop, CrawlStop::Exhausted);
        assert_eq!(report.appended, 5);
        assert_eq!(source.requested(), vec![1, 2, 3]);

        // drain returns newest first, so reverse to get fetch order back
        let mut batch = buffer.drain_newest(usize::MAX).batch;
        batch.reverse();
        let urls: Vec<_> = batch.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(urls, vec!["a0", "a1", "b0", "b1", "b2"]);
    }

    #[tokio::test]
    async fn page_limit_caps_the_crawl() {
        let pages = (0..10).map(|i| page(&format!("p{i}-"), 2)).collect();
        let source = ScriptedSource::new(pages);
        let buffer = StagingBuffer::new();

        let report = crawl_all(&source, &buffer, Some(3)).await;

        assert_eq!(report.stop, CrawlStop::PageLimit);
        assert_eq!(source.requested(), vec![1, 2, 3]);
        assert_eq!(report.pages_requested, 3);
        assert_eq!(buffer.len(), 6);
    }

    #[tokio::test]
    async fn empty_first_page_ends_immediately() {
        let source = ScriptedSource::new(vec![Some(Vec::new())]);
        let buffer = StagingBuffer::new();

        let report = crawl_all(&source, &buffer, Some(5)).await;

        assert_eq!(report.stop, CrawlStop::Exhausted);
        assert_eq!(report.appended, 0);
        assert_eq!(source.requested(), vec![1]);
        assert!(buffer.is_empty());
    }

    #[tokio::test]
    async fn fetch_failure_ends_crawl_but_keeps_earlier_pages() {
        let source = ScriptedSource::new(vec![page("a", 2), None, page("c", 2)]);
        let buffer = StagingBuffer::new();

        let report = crawl_all(&source, &buffer, None).await;

        assert_eq!(report.stop, CrawlStop::FetchFailed);
        assert_eq!(source.requested(), vec![1, 2]);
        assert_eq!(buffer.len(), 2);
    }
}
