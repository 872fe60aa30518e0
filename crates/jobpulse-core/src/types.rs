use serde::{Deserialize, Serialize};

/// One job posting as published by the job board.
///
/// Field names follow the upstream JSON keys so an element of the `data`
/// array deserializes directly. `url` is the only identity that matters:
/// two listings with the same URL are the same posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub remote: bool,
    pub url: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub job_types: Vec<String>,
    pub location: String,
    /// Unix epoch seconds.
    #[serde(default)]
    pub created_at: i64,
}

/// A listing that has been written to the store and received its row id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredListing {
    pub id: i64,
    #[serde(flatten)]
    pub listing: Listing,
}

/// One page of stored listings, newest id first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingPage {
    pub content: Vec<StoredListing>,
    /// 1-based page number.
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl ListingPage {
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Number of stored listings sharing a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityCount {
    pub location: String,
    pub count: u64,
}

/// Number of stored listings sharing a title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleCount {
    pub title: String,
    pub count: u64,
}
