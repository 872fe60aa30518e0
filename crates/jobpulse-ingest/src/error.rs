use thiserror::Error;

/// Why a page could not be fetched.
///
/// Callers of [`PageSource::fetch`](crate::fetch::PageSource::fetch) never
/// see these: the page is reported as empty. They exist so logs and crawl
/// reports can tell a failure apart from a genuinely exhausted listing.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Pages are 1-based.
    #[error("invalid page number: {page}")]
    InvalidPage { page: u32 },

    /// Connect failure, timeout, or body read error.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status}")]
    Status { status: u16 },

    /// Body is not JSON or has no `data` array.
    #[error("malformed response: {0}")]
    Malformed(String),
}
