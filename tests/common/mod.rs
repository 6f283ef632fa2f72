//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, http::StatusCode, routing::post, Router};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use offline_shell::lifecycle::TriggerState;
use offline_shell::{engine, AppShell, HttpServer, ShellConfig, Shutdown};

pub const ENGINE_START_PATH: &str = "/engine/start";

/// Start a mock engine that answers every start request with `status`.
///
/// Returns its address and a counter of start requests received.
#[allow(dead_code)]
pub async fn start_engine_backend(status: u16) -> (SocketAddr, Arc<AtomicU32>) {
    let calls = Arc::new(AtomicU32::new(0));
    let app = Router::new()
        .route(
            ENGINE_START_PATH,
            post(|State((calls, status)): State<(Arc<AtomicU32>, u16)>| async move {
                calls.fetch_add(1, Ordering::SeqCst);
                StatusCode::from_u16(status).unwrap()
            }),
        )
        .with_state((calls.clone(), status));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (addr, calls)
}

/// An address nothing is listening on.
#[allow(dead_code)]
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

#[allow(dead_code)]
pub fn engine_url(addr: SocketAddr) -> String {
    format!("http://{}{}", addr, ENGINE_START_PATH)
}

pub struct RunningShell {
    pub addr: SocketAddr,
    pub shell: Arc<AppShell>,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<std::io::Result<()>>,
}

impl RunningShell {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Wait (bounded) for the mounted trigger to reach a terminal state.
    #[allow(dead_code)]
    pub async fn settled(&self) -> TriggerState {
        tokio::time::timeout(Duration::from_secs(5), self.shell.settled())
            .await
            .expect("engine start did not settle in time")
            .expect("shell is not mounted")
    }

    pub async fn stop(self) {
        self.shutdown.trigger();
        self.handle.await.unwrap().unwrap();
    }
}

/// Run an `HttpServer` on an ephemeral port and wait until the shell is mounted.
pub async fn spawn_shell(mut config: ShellConfig) -> RunningShell {
    config.listener.bind_address = "127.0.0.1:0".into();
    let mounts = config.startup.enabled;

    let engine = Arc::new(engine::from_config(&config.engine));
    let server = HttpServer::new(config, engine);
    let shell = server.shell();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let handle = tokio::spawn(server.run(listener, server_shutdown));

    if mounts {
        tokio::time::timeout(Duration::from_secs(5), async {
            while shell.state() == TriggerState::Idle {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("shell never mounted");
    }

    RunningShell {
        addr,
        shell,
        shutdown,
        handle,
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
