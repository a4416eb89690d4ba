use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use coinquote_core::{format, UtcDateTime};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::error::ApiError;
use crate::AppState;

pub const SERVICE_NAME: &str = "crypto-price-service";

#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    #[serde(default)]
    pub symbols: Vec<String>,
}

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "timestamp": UtcDateTime::now().format_rfc3339(),
    }))
}

/// GET /api/crypto/{symbol}
pub async fn crypto(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let record = state.aggregator.lookup(&symbol).await?;
    Ok(Json(format::to_json(&record)))
}

/// POST /api/crypto/batch - `{"symbols": [...]}` to a map keyed by input symbol.
pub async fn crypto_batch(
    State(state): State<AppState>,
    payload: Result<Json<BatchRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        ApiError::bad_request(format!("invalid request body: {}", rejection.body_text()))
    })?;
    if request.symbols.is_empty() {
        return Err(ApiError::bad_request("symbol list cannot be empty"));
    }

    let mut results = Map::with_capacity(request.symbols.len());
    for symbol in request.symbols {
        let entry = match state.aggregator.lookup(&symbol).await {
            Ok(record) => format::to_json(&record),
            Err(error) => json!({ "error": error.user_message() }),
        };
        results.insert(symbol, entry);
    }

    Ok(Json(Value::Object(results)))
}
