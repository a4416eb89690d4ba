//! # Coinquote Core
//!
//! Symbol normalization, upstream price sources, and first-success
//! resolution for spot crypto prices.
//!
//! ## Overview
//!
//! - **Normalization** of free-form input into a canonical [`TradingPair`]
//! - **Price sources** for OKX, Binance, and CoinGecko behind one trait
//! - **Aggregation** in fixed priority order with failure classification
//! - **Formatting** of a [`PriceRecord`] for chat text and JSON
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | OKX, Binance, and CoinGecko sources |
//! | [`aggregator`] | Ordered fallback and diagnostics |
//! | [`config`] | Resolver settings and env overrides |
//! | [`data_source`] | Source trait and per-attempt errors |
//! | [`domain`] | Trading pair, price record, timestamps |
//! | [`error`] | Validation, rejection, and lookup errors |
//! | [`format`] | Price and change rendering |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`normalize`] | Input to trading pair |
//! | [`source`] | Provider identifiers |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use coinquote_core::{format, ResolverConfig, SourceAggregatorBuilder};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let aggregator = SourceAggregatorBuilder::new()
//!         .with_config(ResolverConfig::from_env())
//!         .build();
//!
//!     let record = aggregator.lookup("eth").await?;
//!     println!("{}", format::render(&record));
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │ CLI / Web / Tool │
//! └────────┬─────────┘
//!          │ lookup(input)
//!          ▼
//! ┌──────────────────┐
//! │ normalize        │──▶ Rejected
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐     ┌──────────────────┐
//! │ SourceAggregator │────▶│ OKX → Binance →  │
//! │ (classify)       │     │ CoinGecko        │
//! └────────┬─────────┘     └────────┬─────────┘
//!          │                        ▼
//!          │               ┌──────────────────┐
//!          │               │ HttpClient       │
//!          ▼               └──────────────────┘
//!   PriceRecord | Diagnostic
//! ```
//!
//! ## Error Handling
//!
//! ```rust
//! use coinquote_core::{DiagnosticKind, LookupError};
//!
//! fn status_for(error: &LookupError) -> u16 {
//!     match error {
//!         LookupError::Rejected(_) => 400,
//!         LookupError::Unresolved(diagnostic) => match diagnostic.kind() {
//!             DiagnosticKind::UnknownSymbol => 404,
//!             DiagnosticKind::NetworkUnstable => 503,
//!             DiagnosticKind::Upstream => 502,
//!         },
//!     }
//! }
//! ```

pub mod adapters;
pub mod aggregator;
pub mod config;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod format;
pub mod http_client;
pub mod normalize;
pub mod source;

// Adapter implementations
pub use adapters::{BinanceSource, CoinGeckoSource, OkxSource};

// Aggregation
pub use aggregator::{
    classify, Diagnostic, DiagnosticKind, SourceAggregator, SourceAggregatorBuilder,
    INVALID_SYMBOL_NOT_FOUND_THRESHOLD,
};

// Configuration
pub use config::ResolverConfig;

// Data source trait and types
pub use data_source::{FetchError, FetchErrorKind, FetchFuture, PriceSource};

// Domain models
pub use domain::{percent_change, PriceRecord, TradingPair, UtcDateTime, MAX_ASSET_LEN};

// Error types
pub use error::{LookupError, Rejected, ValidationError};

// HTTP client types
pub use http_client::{
    HttpClient, HttpError, HttpErrorKind, HttpRequest, HttpResponse, ReqwestHttpClient,
};

// Normalization
pub use normalize::normalize;

// Source identifiers
pub use source::ProviderId;
