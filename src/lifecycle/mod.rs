//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs, shell.rs):
//!     Server starts → AppShell::mount → StartupTrigger arms timer
//!     → delay elapses → resolve engine → start() → log outcome
//!
//! Shutdown (shutdown.rs, signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger → stop accepting → drain
//!     → AppShell::unmount (cancels a timer that has not fired)
//! ```
//!
//! # Design Decisions
//! - Engine startup never blocks or fails the host
//! - Unmount is the only cancellation path; no retry after failure

pub mod shell;
pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shell::AppShell;
pub use shutdown::Shutdown;
pub use startup::{Mount, StartupTrigger, TriggerState, TriggerStats};
