//! Fixed payloads returned by the disabled persistence endpoints.
//!
//! Server-side persistence is intentionally absent; the data lives in the
//! client's IndexedDB. These records exist so legacy callers get a 200 rather
//! than a 404 or 500.

use serde::Serialize;

pub const ARCHITECTURE: &str = "offline-first";

/// `{success, message, architecture}` body shared by every disabled endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisabledResponse {
    pub success: bool,
    pub message: &'static str,
    pub architecture: &'static str,
}

impl DisabledResponse {
    const fn offline_first(message: &'static str) -> Self {
        Self {
            success: true,
            message,
            architecture: ARCHITECTURE,
        }
    }

    /// `POST` on the registration endpoint.
    pub const REGISTER: Self = Self::offline_first(
        "This app uses IndexedDB-first architecture with local authentication.",
    );

    /// `GET` on the database-init endpoint.
    pub const INIT_DB_STATUS: Self = Self::offline_first(
        "This app uses IndexedDB-first architecture. No server database required.",
    );

    /// `POST` on the database-init endpoint.
    pub const INIT_DB: Self = Self::offline_first(
        "This app uses IndexedDB-first architecture. No server database initialization needed.",
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_shape() {
        let value = serde_json::to_value(DisabledResponse::REGISTER).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "success": true,
                "message": "This app uses IndexedDB-first architecture with local authentication.",
                "architecture": "offline-first",
            })
        );
    }
}
