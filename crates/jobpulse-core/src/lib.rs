//! Shared building blocks for jobpulse: configuration, the listing model and
//! the top-level error type.

pub mod config;
pub mod error;
pub mod types;

pub use config::JobpulseConfig;
pub use error::{JobpulseError, Result};
pub use types::{CityCount, Listing, ListingPage, StoredListing, TitleCount};
