mod binance;
mod coingecko;
mod okx;

pub use binance::BinanceSource;
pub use coingecko::CoinGeckoSource;
pub use okx::OkxSource;

use crate::data_source::FetchError;
use crate::ProviderId;

/// Parses a decimal string field as reported by exchange ticker payloads.
pub(crate) fn parse_decimal(
    source: ProviderId,
    field: &'static str,
    raw: &str,
) -> Result<f64, FetchError> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(FetchError::parse(
            source,
            format!("field '{field}' is not a number: '{raw}'"),
        )),
    }
}
