use std::time::Duration;

use async_trait::async_trait;
use jobpulse_core::config::IngestConfig;
use jobpulse_core::Listing;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::FetchError;

/// A paginated source of listings.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch one 1-based page, keeping failures distinguishable from an
    /// empty page.
    async fn fetch_page(&self, page: u32) -> Result<Vec<Listing>, FetchError>;

    /// Fetch one page, reporting any failure as an empty page.
    ///
    /// The error is logged here and goes no further.
    async fn fetch(&self, page: u32) -> Vec<Listing> {
        match self.fetch_page(page).await {
            Ok(listings) => listings,
            Err(e) => {
                warn!(page, error = %e, "page fetch failed, treating page as empty");
                Vec::new()
            }
        }
    }
}

/// Response envelope of the job board: `{ "data": [ ... ], ... }`.
#[derive(Deserialize)]
struct Envelope {
    data: Vec<serde_json::Value>,
}

/// HTTP client for the job board API.
pub struct FetchClient {
    client: reqwest::Client,
    base_url: String,
}

impl FetchClient {
    /// Every request made through this client is bounded by `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn from_config(config: &IngestConfig) -> Result<Self, FetchError> {
        Self::new(config.base_url.clone(), config.request_timeout())
    }

    fn page_url(&self, page: u32) -> String {
        let sep = if self.base_url.contains('?') { '&' } else { '?' };
        format!("{}{}page={}", self.base_url, sep, page)
    }
}

#[async_trait]
impl PageSource for FetchClient {
    async fn fetch_page(&self, page: u32) -> Result<Vec<Listing>, FetchError> {
        if page == 0 {
            return Err(FetchError::InvalidPage { page });
        }

        let url = self.page_url(page);
        debug!(%url, "fetching listing page");

        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body = resp.text().await?;
        let envelope: Envelope =
            serde_json::from_str(&body).map_err(|e| FetchError::Malformed(e.to_string()))?;

        let listings = parse_elements(page, envelope.data);
        debug!(page, count = listings.len(), "listing page parsed");
        Ok(listings)
    }
}

/// Map every element independently; a bad element is logged and dropped
/// without affecting the rest of the page.
fn parse_elements(page: u32, elements: Vec<serde_json::Value>) -> Vec<Listing> {
    elements
        .into_iter()
        .enumerate()
        .filter_map(|(idx, element)| match serde_json::from_value::<Listing>(element) {
            Ok(listing) if listing.url.trim().is_empty() => {
                warn!(page, idx, "skipping listing without url");
                None
            }
            Ok(listing) => Some(listing),
            Err(e) => {
                warn!(page, idx, error = %e, "skipping unparseable listing");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn page_url_appends_query() {
        let client = FetchClient::new("https://jobs.test/api", Duration::from_secs(1)).unwrap();
        assert_eq!(client.page_url(3), "https://jobs.test/api?page=3");

        let client =
            FetchClient::new("https://jobs.test/api?lang=en", Duration::from_secs(1)).unwrap();
        assert_eq!(client.page_url(1), "https://jobs.test/api?lang=en&page=1");
    }

    #[test]
    fn bad_elements_do_not_sink_the_page() {
        let elements = vec![
            json!({"description": "d", "url": "https://x/1", "location": "Berlin"}),
            json!({"description": "no url", "location": "Berlin"}),
            json!({"description": "d", "url": "  ", "location": "Berlin"}),
            json!("not an object"),
            json!({
                "description": "d",
                "url": "https://x/2",
                "location": "Hamburg",
                "remote": true
            }),
        ];
        let listings = parse_elements(1, elements);
        let urls: Vec<_> = listings.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(urls, vec!["https://x/1", "https://x/2"]);
    }

    #[tokio::test]
    async fn page_zero_is_rejected_without_a_request() {
        // unroutable address: a request would fail with a transport error instead
        let client = FetchClient::new("http://127.0.0.1:9/api", Duration::from_secs(1)).unwrap();
        assert!(matches!(
            client.fetch_page(0).await,
            Err(FetchError::InvalidPage { page: 0 })
        ));
        assert!(client.fetch(0).await.is_empty());
    }
}
