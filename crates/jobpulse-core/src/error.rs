use thiserror::Error;

#[derive(Debug, Error)]
pub enum JobpulseError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl JobpulseError {
    /// Short error code string, used in logs and JSON error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            JobpulseError::Config(_) => "CONFIG_ERROR",
            JobpulseError::Database(_) => "DATABASE_ERROR",
            JobpulseError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, JobpulseError>;
