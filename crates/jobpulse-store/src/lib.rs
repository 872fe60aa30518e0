//! `jobpulse-store`: SQLite persistence for job listings.
//!
//! The ingestion pipeline only sees the [`ListingStore`] trait: insert a
//! listing, snapshot the set of known URLs, and the three read aggregates
//! served by the gateway. [`SqliteListingStore`] is the production
//! implementation.

pub mod db;
pub mod error;
pub mod repository;
pub mod store;

pub use error::{Result, StoreError};
pub use repository::SqliteListingStore;
pub use store::ListingStore;
