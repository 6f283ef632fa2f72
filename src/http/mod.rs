//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, graceful shutdown, shell mount/unmount)
//!     → request.rs (request ID, metrics)
//!     → handlers.rs (disabled endpoints, health)
//!     → response.rs (fixed offline-first payloads)
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::DisabledResponse;
pub use server::{AppState, HttpServer};
