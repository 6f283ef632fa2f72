//! External sync engine boundary.
//!
//! # Data Flow
//! ```text
//! StartupTrigger fires
//!     → EngineResolver::resolve() (lazy.rs caches the handle process-wide)
//!     → Starter::start()
//!         → remote.rs (POST to the engine's start URL)
//!         → local.rs  (no engine linked, reports ready)
//! ```
//!
//! # Design Decisions
//! - The engine is an injected capability, not a load-by-name module
//! - Resolution happens only when the trigger fires, never at mount time
//! - No timeout and no retry on `start()`; the engine owns that policy

pub mod lazy;
pub mod local;
pub mod remote;

use std::sync::Arc;

use futures_util::future::BoxFuture;
use thiserror::Error;

use crate::config::EngineConfig;

pub use lazy::LazyEngine;
pub use local::LocalEngine;
pub use remote::RemoteEngine;

/// Why the engine failed to start.
#[derive(Debug, Error)]
pub enum EngineStartFailure {
    #[error("engine could not be resolved: {0}")]
    Unresolved(String),

    #[error("engine rejected start: {0}")]
    Rejected(String),

    #[error("engine start request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("engine panicked during start")]
    Panicked,
}

/// A handle to an engine that can be started.
pub trait Starter: Send + Sync {
    /// Start the engine. Resolves once the engine reports it is running.
    fn start(&self) -> BoxFuture<'_, Result<(), EngineStartFailure>>;
}

/// Produces the engine handle on demand.
pub trait EngineResolver: Send + Sync {
    fn resolve(&self) -> BoxFuture<'_, Result<Arc<dyn Starter>, EngineStartFailure>>;
}

/// Build the process-wide engine accessor for the given configuration.
///
/// Nothing is constructed until the first `resolve()`.
pub fn from_config(config: &EngineConfig) -> LazyEngine {
    let start_url = config.start_url.clone();
    LazyEngine::new(move || match &start_url {
        Some(url) => {
            let engine = RemoteEngine::from_url(url)?;
            Ok(Arc::new(engine) as Arc<dyn Starter>)
        }
        None => Ok(Arc::new(LocalEngine) as Arc<dyn Starter>),
    })
}
