use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

impl From<StoreError> for jobpulse_core::JobpulseError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Database(e) => jobpulse_core::JobpulseError::Database(e.to_string()),
            StoreError::Serialization(e) => jobpulse_core::JobpulseError::Serialization(e),
        }
    }
}
