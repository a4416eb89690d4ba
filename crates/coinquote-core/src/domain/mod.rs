//! # Domain Models
//!
//! Canonical domain types for coinquote price lookups.
//!
//! ## Models
//!
//! | Type | Description |
//! |------|-------------|
//! | [`TradingPair`] | Validated `BASE/QUOTE` pair |
//! | [`PriceRecord`] | 24h price snapshot from one provider |
//! | [`UtcDateTime`] | UTC timestamp |
//!
//! ## Validation
//!
//! All domain types enforce invariants at construction time:
//!
//! ```rust
//! use coinquote_core::{ProviderId, PriceRecord, TradingPair, ValidationError};
//!
//! let pair = TradingPair::new("btc", "usdt")?;
//! assert_eq!(pair.to_string(), "BTC/USDT");
//!
//! // A record never carries a non-positive price.
//! let invalid = PriceRecord::new(pair, "BTC", -1.0, 0.0, 0.0, 0.0, ProviderId::Okx);
//! assert!(matches!(invalid, Err(ValidationError::NonPositiveValue { .. })));
//! # Ok::<(), ValidationError>(())
//! ```

mod pair;
mod record;
mod timestamp;

pub use pair::{TradingPair, MAX_ASSET_LEN};
pub use record::{percent_change, PriceRecord};
pub use timestamp::UtcDateTime;
