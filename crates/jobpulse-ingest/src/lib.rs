//! `jobpulse-ingest`: the listing ingestion pipeline.
//!
//! ```text
//! crawl tick ──► PageSource::fetch ──► StagingBuffer ◄── persist tick
//!                                                          │
//!                                          sweep ──► ListingStore
//! ```
//!
//! The two ticks never talk to each other; the buffer's `append_all` and
//! `drain_newest` are the only synchronisation points between them.

pub mod buffer;
pub mod crawl;
pub mod error;
pub mod fetch;
pub mod pipeline;
pub mod sweep;
pub mod tasks;

pub use buffer::{Drained, StagingBuffer};
pub use crawl::{crawl_all, CrawlReport, CrawlStop};
pub use error::FetchError;
pub use fetch::{FetchClient, PageSource};
pub use pipeline::IngestPipeline;
pub use sweep::{sweep, SweepMode, SweepReport};
pub use tasks::{register_cadences, CrawlTick, PersistTick};
