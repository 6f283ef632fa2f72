//! Engine reached over HTTP.
//!
//! `start()` is a single `POST` to the configured URL. Any 2xx counts as
//! started; any other status is a rejection carrying the engine's reply. No
//! client-side timeout is applied.

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use url::Url;

use super::{EngineStartFailure, Starter};

pub struct RemoteEngine {
    client: reqwest::Client,
    start_url: Url,
}

impl RemoteEngine {
    pub fn new(start_url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            start_url,
        }
    }

    pub fn from_url(start_url: &str) -> Result<Self, EngineStartFailure> {
        let url = Url::parse(start_url)
            .map_err(|e| EngineStartFailure::Unresolved(format!("{start_url}: {e}")))?;
        Ok(Self::new(url))
    }
}

impl Starter for RemoteEngine {
    fn start(&self) -> BoxFuture<'_, Result<(), EngineStartFailure>> {
        async move {
            tracing::debug!(url = %self.start_url, "Requesting sync engine start");

            let response = self
                .client
                .post(self.start_url.clone())
                .send()
                .await?;

            let status = response.status();
            if status.is_success() {
                return Ok(());
            }

            let body = response.text().await.unwrap_or_default();
            let body = body.trim();
            Err(EngineStartFailure::Rejected(if body.is_empty() {
                status.to_string()
            } else {
                format!("{status}: {body}")
            }))
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Router};
    use tokio::net::TcpListener;

    async fn engine_replying(status: StatusCode, body: &'static str) -> String {
        let app = Router::new().route("/start", post(move || async move { (status, body) }));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{}/start", addr)
    }

    #[tokio::test]
    async fn test_success_status_starts() {
        let url = engine_replying(StatusCode::ACCEPTED, "").await;
        let engine = RemoteEngine::from_url(&url).unwrap();
        assert!(engine.start().await.is_ok());
    }

    #[tokio::test]
    async fn test_error_status_is_rejection_with_reply() {
        let url = engine_replying(StatusCode::SERVICE_UNAVAILABLE, "queue locked\n").await;
        let engine = RemoteEngine::from_url(&url).unwrap();

        match engine.start().await {
            Err(EngineStartFailure::Rejected(reason)) => {
                assert_eq!(reason, "503 Service Unavailable: queue locked");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_reply_reports_status_only() {
        let url = engine_replying(StatusCode::CONFLICT, "").await;
        let engine = RemoteEngine::from_url(&url).unwrap();

        let err = engine.start().await.unwrap_err();
        assert_eq!(err.to_string(), "engine rejected start: 409 Conflict");
    }

    #[tokio::test]
    async fn test_unreachable_engine_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let engine = RemoteEngine::from_url(&format!("http://{}/start", addr)).unwrap();
        assert!(matches!(
            engine.start().await,
            Err(EngineStartFailure::Transport(_))
        ));
    }

    #[test]
    fn test_invalid_url_is_unresolved() {
        assert!(matches!(
            RemoteEngine::from_url("::not a url::"),
            Err(EngineStartFailure::Unresolved(_))
        ));
    }
}
