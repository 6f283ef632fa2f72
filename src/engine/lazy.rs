//! Lazily-initialized, process-wide engine handle.

use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use tokio::sync::OnceCell;

use super::{EngineResolver, EngineStartFailure, Starter};

type Factory = Box<dyn Fn() -> Result<Arc<dyn Starter>, EngineStartFailure> + Send + Sync>;

/// Resolves the engine on first use and hands out the same instance afterwards.
///
/// A failed factory call leaves the cell empty, so a later mount may try again.
pub struct LazyEngine {
    cell: OnceCell<Arc<dyn Starter>>,
    factory: Factory,
}

impl LazyEngine {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn Starter>, EngineStartFailure> + Send + Sync + 'static,
    {
        Self {
            cell: OnceCell::new(),
            factory: Box::new(factory),
        }
    }

    /// Whether the engine handle has been constructed yet.
    pub fn is_resolved(&self) -> bool {
        self.cell.initialized()
    }
}

impl EngineResolver for LazyEngine {
    fn resolve(&self) -> BoxFuture<'_, Result<Arc<dyn Starter>, EngineStartFailure>> {
        async move {
            let engine = self
                .cell
                .get_or_try_init(|| async {
                    tracing::debug!("Resolving sync engine handle");
                    (self.factory)()
                })
                .await?;
            Ok(Arc::clone(engine))
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use crate::engine::LocalEngine;

    #[tokio::test]
    async fn test_factory_runs_once() {
        let builds = Arc::new(AtomicUsize::new(0));
        let counter = builds.clone();
        let engine = LazyEngine::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(LocalEngine) as Arc<dyn Starter>)
        });

        let first = engine.resolve().await.unwrap();
        let second = engine.resolve().await.unwrap();

        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_failed_factory_is_retried_on_next_resolve() {
        let builds = Arc::new(AtomicUsize::new(0));
        let counter = builds.clone();
        let engine = LazyEngine::new(move || {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(EngineStartFailure::Unresolved("not yet".into()))
            } else {
                Ok(Arc::new(LocalEngine) as Arc<dyn Starter>)
            }
        });

        assert!(engine.resolve().await.is_err());
        assert!(engine.resolve().await.is_ok());
        assert_eq!(builds.load(Ordering::SeqCst), 2);
    }
}
