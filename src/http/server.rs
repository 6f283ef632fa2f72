//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, metrics)
//! - Mount the application shell when serving starts
//! - Unmount it after graceful shutdown drains

use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ShellConfig;
use crate::engine::EngineResolver;
use crate::http::handlers::{
    health, init_db, init_db_status, register, HEALTH_PATH, INIT_DB_PATH, REGISTER_PATH,
};
use crate::http::request::{
    make_request_span, propagate_request_id_layer, set_request_id_layer, track_metrics,
};
use crate::lifecycle::{AppShell, StartupTrigger};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub shell: Arc<AppShell>,
}

/// HTTP server hosting the disabled endpoints and the startup trigger.
pub struct HttpServer {
    router: Router,
    shell: Arc<AppShell>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and engine.
    pub fn new(config: ShellConfig, engine: Arc<dyn EngineResolver>) -> Self {
        let trigger = StartupTrigger::from_config(&config.startup, engine);
        let shell = Arc::new(AppShell::from_config(&config.startup, trigger));

        let state = AppState {
            shell: shell.clone(),
        };

        let router = Self::build_router(&config, state);
        Self { router, shell }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ShellConfig, state: AppState) -> Router {
        Router::new()
            .route(REGISTER_PATH, post(register))
            .route(INIT_DB_PATH, get(init_db_status).post(init_db))
            .route(HEALTH_PATH, get(health))
            .route_layer(middleware::from_fn(track_metrics))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
            .layer(set_request_id_layer())
    }

    /// The router, for serving it elsewhere or driving it in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn shell(&self) -> Arc<AppShell> {
        self.shell.clone()
    }

    /// Serve on `listener` until a shutdown signal arrives.
    ///
    /// The shell is mounted before the first connection is accepted and
    /// unmounted once in-flight requests have drained.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        self.shell.mount();

        let result = axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .await;

        self.shell.unmount();
        result?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
