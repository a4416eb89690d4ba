//! Free-form symbol input to canonical trading pair.
//!
//! Normalization is pure: no I/O, deterministic for a given input.

use crate::{Rejected, TradingPair, ValidationError};

/// Quote currency used when the input names only an asset.
pub const DEFAULT_QUOTE: &str = "USDT";

/// Assets with a canonical `<ASSET>/USDT` pair.
pub const KNOWN_ASSETS: [&str; 15] = [
    "BTC", "ETH", "ADA", "DOT", "LINK", "LTC", "XRP", "BNB", "SOL", "MATIC", "AVAX", "DOGE",
    "SHIB", "UNI", "ATOM",
];

/// Exchange-style separators accepted in place of `/` (`BTC-USDT`, `BTC_USDT`).
pub const PAIR_SEPARATORS: [char; 2] = ['-', '_'];

/// Exchange names users sometimes type instead of an asset.
pub const VENUE_DENYLIST: [&str; 5] = ["OKX", "BINANCE", "HUOBI", "COINBASE", "KRAKEN"];

pub fn is_known_asset(symbol: &str) -> bool {
    KNOWN_ASSETS.contains(&symbol)
}

/// Map user input to a canonical pair.
///
/// Explicit `BASE/QUOTE` input passes through after case normalization, as
/// does `BASE-QUOTE` or `BASE_QUOTE`; a bare symbol is paired against
/// [`DEFAULT_QUOTE`].
pub fn normalize(input: &str) -> Result<TradingPair, Rejected> {
    let symbol = input.trim().to_ascii_uppercase();
    if symbol.is_empty() {
        return Err(Rejected::Empty);
    }

    if VENUE_DENYLIST.contains(&symbol.as_str()) {
        return Err(Rejected::VenueName { input: symbol });
    }

    if symbol.contains('/') {
        return TradingPair::parse(&symbol).map_err(|error| reject(&symbol, error));
    }

    if symbol.contains(PAIR_SEPARATORS) {
        let pair = symbol.replace(PAIR_SEPARATORS, "/");
        return TradingPair::parse(&pair).map_err(|error| reject(&symbol, error));
    }

    if !is_known_asset(&symbol) {
        tracing::debug!(symbol = %symbol, "symbol not in known asset table; pairing with {DEFAULT_QUOTE}");
    }

    TradingPair::new(&symbol, DEFAULT_QUOTE).map_err(|error| reject(&symbol, error))
}

fn reject(symbol: &str, error: ValidationError) -> Rejected {
    let input = symbol.to_owned();
    match error {
        ValidationError::PairInvalidChar { ch: '/', .. } => Rejected::MalformedPair { input },
        ValidationError::PairInvalidChar { ch, .. } => Rejected::InvalidCharacter { input, ch },
        ValidationError::PairSideTooLong { .. } => Rejected::TooLong { input },
        _ => Rejected::MalformedPair { input },
    }
}
