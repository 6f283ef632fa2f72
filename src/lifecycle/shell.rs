//! Application shell: owns the startup trigger's current mount.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::config::StartupConfig;
use crate::lifecycle::startup::{Mount, StartupTrigger, TriggerState, TriggerStats};

/// Holds at most one [`Mount`] at a time.
///
/// Mounting again drops the previous mount first, so a pending timer is
/// cancelled before its replacement is armed.
pub struct AppShell {
    trigger: StartupTrigger,
    enabled: bool,
    current: Mutex<Option<Mount>>,
}

impl AppShell {
    pub fn new(trigger: StartupTrigger, enabled: bool) -> Self {
        Self {
            trigger,
            enabled,
            current: Mutex::new(None),
        }
    }

    pub fn from_config(config: &StartupConfig, trigger: StartupTrigger) -> Self {
        Self::new(trigger, config.enabled)
    }

    /// Mount the startup trigger, replacing any existing mount.
    pub fn mount(&self) {
        if !self.enabled {
            tracing::info!("Engine startup disabled; not mounting trigger");
            return;
        }

        let mut current = self.lock();
        drop(current.take());
        let mount = self.trigger.mount();
        tracing::info!(
            mount_id = %mount.id(),
            delay_ms = self.trigger.delay().as_millis() as u64,
            "Startup trigger mounted"
        );
        *current = Some(mount);
    }

    /// Unmount the current trigger, cancelling it if it has not fired.
    pub fn unmount(&self) {
        if let Some(mount) = self.lock().take() {
            tracing::info!(mount_id = %mount.id(), "Startup trigger unmounted");
        }
    }

    /// State of the current mount, or `Idle` when nothing is mounted.
    pub fn state(&self) -> TriggerState {
        self.lock()
            .as_ref()
            .map_or(TriggerState::Idle, Mount::state)
    }

    pub fn stats(&self) -> TriggerStats {
        self.trigger.stats()
    }

    /// Wait for the current mount to settle. Returns `None` when nothing is mounted.
    pub async fn settled(&self) -> Option<TriggerState> {
        let mut rx = self.lock().as_ref().map(Mount::subscribe)?;
        let settled = rx.wait_for(|state| state.is_terminal()).await.map(|s| *s);
        Some(settled.unwrap_or_else(|_| *rx.borrow()))
    }

    fn lock(&self) -> MutexGuard<'_, Option<Mount>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
