use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::types::{Cadence, CadenceState, TickStatus};

/// Work fired on every tick of a cadence.
///
/// `run` must not fail: implementations log their own errors. A tick that
/// panics only takes down its own cadence task.
#[async_trait]
pub trait TickTask: Send + Sync {
    async fn run(&self);
}

/// Read-only view of cadence state while the engine runs.
///
/// Cheap to clone; every clone observes the same states.
#[derive(Clone, Default)]
pub struct SchedulerHandle {
    states: Arc<Mutex<Vec<CadenceState>>>,
}

impl SchedulerHandle {
    /// Snapshot of every registered cadence, in registration order.
    pub fn snapshot(&self) -> Vec<CadenceState> {
        self.lock().clone()
    }

    fn register(&self, cadence: &Cadence) -> usize {
        let mut states = self.lock();
        states.push(CadenceState::new(cadence));
        states.len() - 1
    }

    fn mark_running(&self, slot: usize) {
        if let Some(state) = self.lock().get_mut(slot) {
            state.status = TickStatus::Running;
            state.last_started = Some(Utc::now());
        }
    }

    fn mark_idle(&self, slot: usize, elapsed_ms: u64) {
        if let Some(state) = self.lock().get_mut(slot) {
            state.status = TickStatus::Idle;
            state.run_count += 1;
            state.last_finished = Some(Utc::now());
            state.last_duration_ms = Some(elapsed_ms);
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<CadenceState>> {
        self.states.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Drives a set of independent fixed-rate cadences.
pub struct SchedulerEngine {
    cadences: Vec<(Cadence, usize, Arc<dyn TickTask>)>,
    handle: SchedulerHandle,
}

impl Default for SchedulerEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SchedulerEngine {
    pub fn new() -> Self {
        Self {
            cadences: Vec::new(),
            handle: SchedulerHandle::default(),
        }
    }

    /// Register `task` to fire every `cadence.every`.
    pub fn add(&mut self, cadence: Cadence, task: Arc<dyn TickTask>) -> &mut Self {
        let slot = self.handle.register(&cadence);
        info!(cadence = %cadence.name, every_secs = cadence.every.as_secs(), "cadence registered");
        self.cadences.push((cadence, slot, task));
        self
    }

    pub fn handle(&self) -> SchedulerHandle {
        self.handle.clone()
    }

    /// Run every cadence until `shutdown` broadcasts `true` (or its sender drops).
    ///
    /// Each cadence lives on its own Tokio task; the first tick of each fires
    /// one full period after the call, not immediately.
    pub async fn run(self, shutdown: watch::Receiver<bool>) {
        info!(cadences = self.cadences.len(), "scheduler engine started");

        let mut tasks = Vec::with_capacity(self.cadences.len());
        for (cadence, slot, task) in self.cadences {
            let handle = self.handle.clone();
            let shutdown = shutdown.clone();
            tasks.push(tokio::spawn(run_cadence(cadence, slot, task, handle, shutdown)));
        }

        for task in tasks {
            if let Err(e) = task.await {
                warn!("cadence task aborted: {e}");
            }
        }
        info!("scheduler engine stopped");
    }
}

/// The idle → running → idle loop of one cadence.
async fn run_cadence(
    cadence: Cadence,
    slot: usize,
    task: Arc<dyn TickTask>,
    handle: SchedulerHandle,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut interval = tokio::time::interval_at(Instant::now() + cadence.every, cadence.every);
    // Ticks that fall due while a run is in progress are dropped, not queued.
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            // a pending shutdown wins over a tick that is also due
            biased;
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    info!(cadence = %cadence.name, "cadence shutting down");
                    break;
                }
            }
            _ = interval.tick() => {
                debug!(cadence = %cadence.name, "tick");
                handle.mark_running(slot);
                let started = Instant::now();
                task.run().await;
                let elapsed_ms = started.elapsed().as_millis() as u64;
                handle.mark_idle(slot, elapsed_ms);
                debug!(cadence = %cadence.name, elapsed_ms, "tick done");
            }
        }
    }
}
