//! Route handlers.
//!
//! The persistence handlers take no extractors, so any body (empty, malformed,
//! not JSON at all) is ignored and the handler cannot fail.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::http::response::DisabledResponse;
use crate::http::server::AppState;
use crate::lifecycle::{TriggerState, TriggerStats};

pub const REGISTER_PATH: &str = "/api/auth/register";
pub const INIT_DB_PATH: &str = "/api/init-db";
pub const HEALTH_PATH: &str = "/health";

pub async fn register() -> Json<DisabledResponse> {
    Json(DisabledResponse::REGISTER)
}

pub async fn init_db_status() -> Json<DisabledResponse> {
    Json(DisabledResponse::INIT_DB_STATUS)
}

pub async fn init_db() -> Json<DisabledResponse> {
    Json(DisabledResponse::INIT_DB)
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    pub engine_startup: TriggerState,
    pub startup: TriggerStats,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        engine_startup: state.shell.state(),
        startup: state.shell.stats(),
    })
}
