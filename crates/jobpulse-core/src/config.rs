use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{JobpulseError, Result};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_CONFIG_PATH: &str = "jobpulse.toml";
pub const DEFAULT_BASE_URL: &str = "https://www.arbeitnow.com/api/job-board-api";
/// Upper bound for a single upstream request; a hung API must not stall a cadence.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;
/// Number of titles returned by the popular-titles endpoint.
pub const TOP_TITLES_LIMIT: usize = 10;

/// Top-level config (jobpulse.toml + JOBPULSE_* env overrides).
///
/// Loaded once at startup and never mutated afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobpulseConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Upstream crawling and sweep sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Job board endpoint; pages are requested as `<base_url>?page=N`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Page ceiling for the bootstrap crawl. Only honoured when `limit_pages` is set.
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    #[serde(default = "bool_true")]
    pub limit_pages: bool,
    /// Listings persisted per persist tick.
    #[serde(default = "default_refresh_count")]
    pub refresh_count: usize,
    /// Page re-fetched on every crawl tick.
    #[serde(default = "default_refresh_page")]
    pub refresh_page: u32,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            max_pages: default_max_pages(),
            limit_pages: true,
            refresh_count: default_refresh_count(),
            refresh_page: default_refresh_page(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl IngestConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// The crawl ceiling, or `None` when page limiting is off.
    pub fn page_limit(&self) -> Option<u32> {
        self.limit_pages.then_some(self.max_pages)
    }
}

/// Cadences of the two periodic jobs. They are independent of each other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_crawl_interval_secs")]
    pub crawl_interval_secs: u64,
    #[serde(default = "default_persist_interval_secs")]
    pub persist_interval_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            crawl_interval_secs: default_crawl_interval_secs(),
            persist_interval_secs: default_persist_interval_secs(),
        }
    }
}

impl ScheduleConfig {
    pub fn crawl_interval(&self) -> Duration {
        Duration::from_secs(self.crawl_interval_secs)
    }

    pub fn persist_interval(&self) -> Duration {
        Duration::from_secs(self.persist_interval_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Listings per page on GET /vacancies.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

fn bool_true() -> bool {
    true
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}
fn default_db_path() -> String {
    "jobpulse.db".to_string()
}
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_max_pages() -> u32 {
    10
}
fn default_refresh_count() -> usize {
    100
}
fn default_refresh_page() -> u32 {
    1
}
fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}
fn default_crawl_interval_secs() -> u64 {
    300
}
fn default_persist_interval_secs() -> u64 {
    600
}
fn default_page_size() -> u32 {
    20
}

impl JobpulseConfig {
    /// Load config from a TOML file with JOBPULSE_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. ./jobpulse.toml
    ///
    /// A missing file is not an error: defaults and env vars still apply.
    /// Nested keys are separated by a double underscore, e.g.
    /// `JOBPULSE_INGEST__MAX_PAGES=3`.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let path = config_path.unwrap_or(DEFAULT_CONFIG_PATH);

        Self::from_figment(
            Figment::from(Serialized::defaults(JobpulseConfig::default()))
                .merge(Toml::file(path))
                .merge(Env::prefixed("JOBPULSE_").split("__")),
        )
    }

    /// Extract and validate a config from an already-assembled figment.
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: JobpulseConfig = figment
            .extract()
            .map_err(|e| JobpulseError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make a cadence spin or a crawl never start.
    pub fn validate(&self) -> Result<()> {
        if self.ingest.base_url.trim().is_empty() {
            return Err(invalid("ingest.base_url must not be empty"));
        }
        if self.ingest.limit_pages && self.ingest.max_pages == 0 {
            return Err(invalid("ingest.max_pages must be >= 1 when limit_pages is on"));
        }
        if self.ingest.refresh_page == 0 {
            return Err(invalid("ingest.refresh_page is 1-based"));
        }
        if self.ingest.request_timeout_secs == 0 {
            return Err(invalid("ingest.request_timeout_secs must be > 0"));
        }
        if self.schedule.crawl_interval_secs == 0 || self.schedule.persist_interval_secs == 0 {
            return Err(invalid("schedule intervals must be > 0"));
        }
        if self.api.page_size == 0 {
            return Err(invalid("api.page_size must be > 0"));
        }
        Ok(())
    }
}

fn invalid(reason: &str) -> JobpulseError {
    JobpulseError::Config(reason.to_string())
}
