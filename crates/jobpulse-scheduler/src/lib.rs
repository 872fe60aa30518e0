//! `jobpulse-scheduler`: fixed-rate cadences on Tokio.
//!
//! # Overview
//!
//! Each registered [`Cadence`] gets its own Tokio task that fires its
//! [`TickTask`] every `every` seconds. Cadences never wait on each other, and
//! a single cadence never runs two ticks at once: a tick is awaited inline, and
//! ticks that fall due while it is still running are skipped.
//!
//! | State     | Meaning                                   |
//! |-----------|-------------------------------------------|
//! | `idle`    | Waiting for the next interval tick        |
//! | `running` | The task's `run` future is being awaited  |
//!
//! A [`SchedulerHandle`] exposes a read-only snapshot of every cadence for
//! health reporting.

pub mod engine;
pub mod types;

pub use engine::{SchedulerEngine, SchedulerHandle, TickTask};
pub use types::{Cadence, CadenceState, TickStatus};
