use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A named fixed-rate schedule.
#[derive(Debug, Clone)]
pub struct Cadence {
    /// Human-readable label, used in logs and health output.
    pub name: String,
    /// Period between two tick starts.
    pub every: Duration,
}

impl Cadence {
    pub fn new(name: impl Into<String>, every: Duration) -> Self {
        Self {
            name: name.into(),
            every,
        }
    }
}

/// Where a cadence is in its idle → running → idle loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TickStatus {
    Idle,
    Running,
}

/// Observable state of one cadence.
#[derive(Debug, Clone, Serialize)]
pub struct CadenceState {
    pub name: String,
    pub every_secs: u64,
    pub status: TickStatus,
    /// Completed ticks since startup.
    pub run_count: u64,
    pub last_started: Option<DateTime<Utc>>,
    pub last_finished: Option<DateTime<Utc>>,
    pub last_duration_ms: Option<u64>,
}

impl CadenceState {
    pub fn new(cadence: &Cadence) -> Self {
        Self {
            name: cadence.name.clone(),
            every_secs: cadence.every.as_secs(),
            status: TickStatus::Idle,
            run_count: 0,
            last_started: None,
            last_finished: None,
            last_duration_ms: None,
        }
    }
}
