//! Deferred engine startup.
//!
//! # States
//! ```text
//! Idle → Scheduled → Fired → Succeeded
//!                          → Failed
//!      → Scheduled → Cancelled      (unmounted before the deadline)
//! ```
//!
//! # Design Decisions
//! - One timer per mount; the deadline is anchored at mount time
//! - Unmount and timer expiry race on an `armed` flag; the loser does nothing
//! - Once fired, `start()` runs to completion even if the mount is dropped
//! - Every failure (resolve error, rejection, panic) is logged and swallowed

use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;
use serde::Serialize;
use tokio::sync::{watch, Notify};
use tokio::time::Instant;
use uuid::Uuid;

use crate::config::StartupConfig;
use crate::engine::{EngineResolver, EngineStartFailure};
use crate::observability::metrics;

/// Lifecycle state of a single mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerState {
    Idle,
    Scheduled,
    Fired,
    Succeeded,
    Failed,
    Cancelled,
}

impl TriggerState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TriggerState::Succeeded | TriggerState::Failed | TriggerState::Cancelled
        )
    }
}

/// Snapshot of a trigger's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TriggerStats {
    /// Timers that are armed and have not yet fired.
    pub pending: usize,
    pub fired: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub cancelled: u64,
}

#[derive(Debug, Default)]
struct Counters {
    pending: AtomicUsize,
    fired: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
    cancelled: AtomicU64,
}

/// State shared between a [`Mount`] and its timer task.
struct Slot {
    armed: AtomicBool,
    unmounted: Notify,
    state: watch::Sender<TriggerState>,
}

/// Schedules a one-shot, best-effort engine start.
///
/// Cheap to clone; clones share the resolver and counters.
#[derive(Clone)]
pub struct StartupTrigger {
    delay: Duration,
    resolver: Arc<dyn EngineResolver>,
    counters: Arc<Counters>,
}

impl StartupTrigger {
    pub fn new(resolver: Arc<dyn EngineResolver>, delay: Duration) -> Self {
        Self {
            delay,
            resolver,
            counters: Arc::new(Counters::default()),
        }
    }

    pub fn from_config(config: &StartupConfig, resolver: Arc<dyn EngineResolver>) -> Self {
        Self::new(resolver, Duration::from_millis(config.delay_ms))
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn stats(&self) -> TriggerStats {
        let c = &self.counters;
        TriggerStats {
            pending: c.pending.load(Ordering::SeqCst),
            fired: c.fired.load(Ordering::SeqCst),
            succeeded: c.succeeded.load(Ordering::SeqCst),
            failed: c.failed.load(Ordering::SeqCst),
            cancelled: c.cancelled.load(Ordering::SeqCst),
        }
    }

    /// Arm a timer that starts the engine once the delay has elapsed.
    ///
    /// Must be called from within a Tokio runtime. Dropping the returned
    /// [`Mount`] before the deadline cancels the start.
    pub fn mount(&self) -> Mount {
        let id = Uuid::new_v4();
        let deadline = Instant::now() + self.delay;
        let (state, _) = watch::channel(TriggerState::Scheduled);
        let slot = Arc::new(Slot {
            armed: AtomicBool::new(true),
            unmounted: Notify::new(),
            state,
        });

        self.counters.pending.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(
            mount_id = %id,
            delay_ms = self.delay.as_millis() as u64,
            "Engine start scheduled"
        );

        tokio::spawn(fire_at(
            id,
            deadline,
            slot.clone(),
            self.resolver.clone(),
            self.counters.clone(),
        ));

        Mount {
            id,
            slot,
            counters: self.counters.clone(),
        }
    }
}

/// One activation of the startup trigger. Dropping it unmounts.
pub struct Mount {
    id: Uuid,
    slot: Arc<Slot>,
    counters: Arc<Counters>,
}

impl Mount {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> TriggerState {
        *self.slot.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<TriggerState> {
        self.slot.state.subscribe()
    }

    /// Wait until this mount reaches a terminal state.
    ///
    /// Never returns if the engine's `start()` never settles.
    pub async fn settled(&self) -> TriggerState {
        let mut rx = self.subscribe();
        let settled = rx.wait_for(|state| state.is_terminal()).await.map(|s| *s);
        settled.unwrap_or_else(|_| *rx.borrow())
    }

    /// Unmount explicitly. Equivalent to dropping the mount.
    pub fn unmount(self) {}
}

impl Drop for Mount {
    fn drop(&mut self) {
        if self.slot.armed.swap(false, Ordering::SeqCst) {
            self.counters.pending.fetch_sub(1, Ordering::SeqCst);
            self.counters.cancelled.fetch_add(1, Ordering::SeqCst);
            self.slot.state.send_replace(TriggerState::Cancelled);
            self.slot.unmounted.notify_one();
            tracing::debug!(mount_id = %self.id, "Engine start cancelled before firing");
        }
    }
}

async fn fire_at(
    id: Uuid,
    deadline: Instant,
    slot: Arc<Slot>,
    resolver: Arc<dyn EngineResolver>,
    counters: Arc<Counters>,
) {
    tokio::select! {
        () = slot.unmounted.notified() => return,
        () = tokio::time::sleep_until(deadline) => {}
    }

    // Unmount may have won the race between the timer and this check.
    if !slot.armed.swap(false, Ordering::SeqCst) {
        return;
    }

    counters.pending.fetch_sub(1, Ordering::SeqCst);
    counters.fired.fetch_add(1, Ordering::SeqCst);
    slot.state.send_replace(TriggerState::Fired);
    tracing::debug!(mount_id = %id, "Starting sync engine");

    let outcome = AssertUnwindSafe(start_engine(resolver.as_ref()))
        .catch_unwind()
        .await
        .unwrap_or(Err(EngineStartFailure::Panicked));

    match outcome {
        Ok(()) => {
            counters.succeeded.fetch_add(1, Ordering::SeqCst);
            metrics::record_engine_start("succeeded");
            tracing::info!(mount_id = %id, "Sync engine started");
            slot.state.send_replace(TriggerState::Succeeded);
        }
        Err(e) => {
            counters.failed.fetch_add(1, Ordering::SeqCst);
            metrics::record_engine_start("failed");
            tracing::error!(mount_id = %id, error = %e, "Sync engine failed to start");
            slot.state.send_replace(TriggerState::Failed);
        }
    }
}

async fn start_engine(resolver: &dyn EngineResolver) -> Result<(), EngineStartFailure> {
    let engine = resolver.resolve().await?;
    engine.start().await
}
