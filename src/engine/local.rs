//! In-process stand-in used when no external engine is configured.

use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use super::{EngineStartFailure, Starter};

/// Reports ready immediately. Synchronization runs entirely on the client.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalEngine;

impl Starter for LocalEngine {
    fn start(&self) -> BoxFuture<'_, Result<(), EngineStartFailure>> {
        async {
            tracing::debug!("No external sync engine configured; nothing to start");
            Ok(())
        }
        .boxed()
    }
}
