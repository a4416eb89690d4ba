//! Price source trait and per-attempt error type.
//!
//! This module defines the adapter contract (`PriceSource`) that every
//! upstream provider implements, along with the [`FetchError`] produced by a
//! failed attempt.
//!
//! # Example
//!
//! ```rust,ignore
//! use coinquote_core::{OkxSource, PriceSource, TradingPair};
//!
//! async fn fetch(source: &OkxSource) -> Result<(), coinquote_core::FetchError> {
//!     let pair = TradingPair::new("BTC", "USDT").expect("valid pair");
//!     let record = source.fetch(&pair).await?;
//!     println!("{}: {}", record.pair, record.price);
//!     Ok(())
//! }
//! ```

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::http_client::{HttpError, HttpErrorKind, HttpResponse};
use crate::{PriceRecord, ProviderId, TradingPair, ValidationError};

/// Lower-cased fragments that mark an unclassified transport failure as
/// connectivity trouble.
pub const NETWORK_VOCABULARY: [&str; 6] = [
    "timeout",
    "connection",
    "reset",
    "dns",
    "network",
    "max retries",
];

/// Attempt-level failure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// The provider answered well-formed and does not know the pair.
    NotFound,
    /// Transport failure or timeout.
    NetworkError,
    /// The provider answered but could not serve the request.
    UpstreamError,
    /// The payload shape was malformed or unexpected.
    ParseError,
}

impl FetchErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::NetworkError => "network_error",
            Self::UpstreamError => "upstream_error",
            Self::ParseError => "parse_error",
        }
    }
}

impl Display for FetchErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured per-source error folded by the aggregator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    source: ProviderId,
    kind: FetchErrorKind,
    detail: String,
}

impl FetchError {
    pub fn new(source: ProviderId, kind: FetchErrorKind, detail: impl Into<String>) -> Self {
        Self {
            source,
            kind,
            detail: detail.into(),
        }
    }

    pub fn not_found(source: ProviderId, detail: impl Into<String>) -> Self {
        Self::new(source, FetchErrorKind::NotFound, detail)
    }

    pub fn network(source: ProviderId, detail: impl Into<String>) -> Self {
        Self::new(source, FetchErrorKind::NetworkError, detail)
    }

    pub fn upstream(source: ProviderId, detail: impl Into<String>) -> Self {
        Self::new(source, FetchErrorKind::UpstreamError, detail)
    }

    pub fn parse(source: ProviderId, detail: impl Into<String>) -> Self {
        Self::new(source, FetchErrorKind::ParseError, detail)
    }

    /// Timeouts, refused connections and dropped bodies are network errors.
    /// Any other transport failure counts as one only when its message uses
    /// [`NETWORK_VOCABULARY`].
    pub fn from_transport(source: ProviderId, error: &HttpError) -> Self {
        let detail = format!("transport error: {}", error.message());
        match error.kind() {
            HttpErrorKind::Timeout | HttpErrorKind::Connect | HttpErrorKind::Body => {
                Self::network(source, detail)
            }
            HttpErrorKind::Other if mentions_network_trouble(error.message()) => {
                Self::network(source, detail)
            }
            HttpErrorKind::Other => Self::upstream(source, detail),
        }
    }

    /// Classify a non-success status: 429 and 5xx are upstream trouble, any
    /// other client error means the provider does not know the pair.
    pub fn from_status(source: ProviderId, response: &HttpResponse, wire_symbol: &str) -> Self {
        match response.status {
            429 => Self::upstream(source, "rate limited (status 429)"),
            status if status >= 500 => {
                Self::upstream(source, format!("upstream returned status {status}"))
            }
            status => Self::not_found(
                source,
                format!("trading pair {wire_symbol} not found (status {status})"),
            ),
        }
    }

    pub fn from_validation(source: ProviderId, error: ValidationError) -> Self {
        Self::parse(source, format!("invalid record: {error}"))
    }

    pub const fn source(&self) -> ProviderId {
        self.source
    }

    pub const fn kind(&self) -> FetchErrorKind {
        self.kind
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    pub const fn is_not_found(&self) -> bool {
        matches!(self.kind, FetchErrorKind::NotFound)
    }
}

fn mentions_network_trouble(message: &str) -> bool {
    let message = message.to_ascii_lowercase();
    NETWORK_VOCABULARY
        .iter()
        .any(|fragment| message.contains(fragment))
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.source.display_name(), self.detail)
    }
}

impl std::error::Error for FetchError {}

/// Boxed future returned by [`PriceSource::fetch`].
pub type FetchFuture<'a> = Pin<Box<dyn Future<Output = Result<PriceRecord, FetchError>> + Send + 'a>>;

/// Upstream provider contract.
///
/// Implementations issue at most the provider's fixed number of requests
/// per call, each bounded by a timeout, and never retry.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` as one aggregator serves many
/// concurrent requests.
pub trait PriceSource: Send + Sync {
    /// Returns the unique provider identifier.
    fn id(&self) -> ProviderId;

    /// Fetches a 24h snapshot for `pair`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] classified as not found, network, upstream, or
    /// parse failure.
    fn fetch<'a>(&'a self, pair: &'a TradingPair) -> FetchFuture<'a>;
}
