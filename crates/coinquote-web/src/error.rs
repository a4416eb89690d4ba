use std::io;
use std::net::SocketAddr;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use coinquote_core::{DiagnosticKind, LookupError};
use serde_json::json;
use thiserror::Error;

/// Failures starting or running the HTTP server.
#[derive(Debug, Error)]
pub enum WebError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] io::Error),
}

/// `{"error": message}` body with a status code.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

/// HTTP status for a failed lookup.
pub fn lookup_status(error: &LookupError) -> StatusCode {
    match error {
        LookupError::Rejected(_) => StatusCode::BAD_REQUEST,
        LookupError::Unresolved(diagnostic) => match diagnostic.kind() {
            DiagnosticKind::UnknownSymbol => StatusCode::NOT_FOUND,
            DiagnosticKind::NetworkUnstable => StatusCode::SERVICE_UNAVAILABLE,
            DiagnosticKind::Upstream => StatusCode::BAD_GATEWAY,
        },
    }
}

impl From<LookupError> for ApiError {
    fn from(error: LookupError) -> Self {
        Self {
            status: lookup_status(&error),
            message: error.user_message(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
