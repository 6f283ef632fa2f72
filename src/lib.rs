//! Offline-first application shell.
//!
//! Serves the legacy persistence endpoints (permanently disabled: data lives
//! in the client's IndexedDB) and, once per session, starts the external sync
//! engine after a short delay without letting its failure reach the host.

pub mod config;
pub mod engine;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::ShellConfig;
pub use http::HttpServer;
pub use lifecycle::{AppShell, Shutdown, StartupTrigger};
