//! # coinquote-web
//!
//! HTTP read service over a shared [`SourceAggregator`].
//!
//! | Route | Description |
//! |-------|-------------|
//! | `GET /health` | Liveness probe |
//! | `GET /api/crypto/{symbol}` | One price record |
//! | `POST /api/crypto/batch` | Records keyed by input symbol |
//!
//! Failed lookups answer `{"error": "..."}` with 400 for rejected input,
//! 404 for unknown symbols, 503 for network trouble and 502 otherwise.

mod error;
mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use coinquote_core::SourceAggregator;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::{lookup_status, ApiError, WebError};
pub use handlers::{BatchRequest, SERVICE_NAME};

/// Port bound on all interfaces when neither `--addr` nor `PORT` is given.
pub const DEFAULT_PORT: u16 = 5000;

#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<SourceAggregator>,
}

pub fn router(aggregator: Arc<SourceAggregator>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/crypto/batch", post(handlers::crypto_batch))
        .route("/api/crypto/:symbol", get(handlers::crypto))
        .with_state(AppState { aggregator })
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

/// Binds `addr` and serves until the process is stopped.
pub async fn serve(addr: SocketAddr, aggregator: Arc<SourceAggregator>) -> Result<(), WebError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| WebError::Bind { addr, source })?;
    let local_addr = listener.local_addr().unwrap_or(addr);

    tracing::info!(addr = %local_addr, "price service listening");
    tracing::info!("api: http://{local_addr}/api/crypto/<symbol>");
    tracing::info!("health check: http://{local_addr}/health");

    axum::serve(listener, router(aggregator))
        .await
        .map_err(WebError::Serve)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use coinquote_core::{
        FetchError, FetchFuture, PriceRecord, PriceSource, ProviderId, TradingPair,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    enum Behavior {
        Known,
        Missing,
        Offline,
        Broken,
    }

    struct StubSource {
        id: ProviderId,
        behavior: Behavior,
    }

    impl PriceSource for StubSource {
        fn id(&self) -> ProviderId {
            self.id
        }

        fn fetch<'a>(&'a self, pair: &'a TradingPair) -> FetchFuture<'a> {
            Box::pin(async move {
                match (&self.behavior, pair.base()) {
                    (Behavior::Known, "BTC") => PriceRecord::new(
                        pair.clone(),
                        "BTC",
                        65_000.0,
                        1.234,
                        65_500.0,
                        63_500.0,
                        self.id,
                    )
                    .map_err(|error| FetchError::from_validation(self.id, error)),
                    (Behavior::Offline, _) => {
                        Err(FetchError::network(self.id, "connection failed: refused"))
                    }
                    (Behavior::Broken, _) => {
                        Err(FetchError::upstream(self.id, "upstream returned status 500"))
                    }
                    _ => Err(FetchError::not_found(self.id, "trading pair not found")),
                }
            })
        }
    }

    fn app(behavior: fn() -> Behavior) -> Router {
        let sources = ProviderId::PRIORITY
            .into_iter()
            .map(|id| {
                Arc::new(StubSource {
                    id,
                    behavior: behavior(),
                }) as Arc<dyn PriceSource>
            })
            .collect();
        router(Arc::new(SourceAggregator::new(sources)))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        let body = serde_json::from_slice(&bytes).expect("body should be json");
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).expect("valid request")
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_owned()))
            .expect("valid request")
    }

    #[tokio::test]
    async fn health_reports_service_name() {
        let (status, body) = send(app(|| Behavior::Known), get("/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], SERVICE_NAME);
        assert!(body["timestamp"].as_str().is_some_and(|ts| ts.ends_with('Z')));
    }

    #[tokio::test]
    async fn known_symbol_returns_record_json() {
        let (status, body) = send(app(|| Behavior::Known), get("/api/crypto/btc")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["symbol"], "BTC/USDT");
        assert_eq!(body["price_formatted"], "$65,000.00");
        assert_eq!(body["change_formatted"], "+1.23%");
        assert_eq!(body["source"], "OKX");
    }

    #[tokio::test]
    async fn failures_map_to_distinct_statuses() {
        let cases: [(fn() -> Behavior, &str, StatusCode); 4] = [
            (|| Behavior::Known, "/api/crypto/okx", StatusCode::BAD_REQUEST),
            (|| Behavior::Missing, "/api/crypto/btc", StatusCode::NOT_FOUND),
            (|| Behavior::Offline, "/api/crypto/btc", StatusCode::SERVICE_UNAVAILABLE),
            (|| Behavior::Broken, "/api/crypto/btc", StatusCode::BAD_GATEWAY),
        ];

        for (behavior, uri, expected) in cases {
            let (status, body) = send(app(behavior), get(uri)).await;
            assert_eq!(status, expected, "{uri}");
            assert!(body["error"].as_str().is_some_and(|message| !message.is_empty()));
        }
    }

    #[tokio::test]
    async fn batch_maps_each_input_symbol() {
        let (status, body) = send(
            app(|| Behavior::Known),
            post_json("/api/crypto/batch", r#"{"symbols":["btc","zzz","kraken"]}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["btc"]["symbol"], "BTC/USDT");
        assert!(body["zzz"]["error"].as_str().is_some_and(|m| m.contains("'ZZZ'")));
        assert!(body["kraken"]["error"]
            .as_str()
            .is_some_and(|m| m.contains("exchange name")));
    }

    #[tokio::test]
    async fn batch_rejects_empty_and_malformed_bodies() {
        let (status, body) = send(
            app(|| Behavior::Known),
            post_json("/api/crypto/batch", r#"{"symbols":[]}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "symbol list cannot be empty");

        let (status, body) = send(
            app(|| Behavior::Known),
            post_json("/api/crypto/batch", "{not json"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().is_some());
    }
}
