use serde::{Deserialize, Serialize};

use crate::{ProviderId, TradingPair, UtcDateTime, ValidationError};

/// Unified 24h price snapshot produced by exactly one upstream source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub pair: TradingPair,
    pub display_name: String,
    pub price: f64,
    pub change_24h_pct: f64,
    pub high_24h: f64,
    pub low_24h: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_24h: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,
    pub source: ProviderId,
    pub fetched_at: UtcDateTime,
}

impl PriceRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pair: TradingPair,
        display_name: impl Into<String>,
        price: f64,
        change_24h_pct: f64,
        high_24h: f64,
        low_24h: f64,
        source: ProviderId,
    ) -> Result<Self, ValidationError> {
        validate_positive("price", price)?;
        validate_finite("change_24h_pct", change_24h_pct)?;
        validate_non_negative("high_24h", high_24h)?;
        validate_non_negative("low_24h", low_24h)?;

        Ok(Self {
            pair,
            display_name: display_name.into(),
            price,
            change_24h_pct,
            high_24h,
            low_24h,
            volume_24h: None,
            market_cap: None,
            source,
            fetched_at: UtcDateTime::now(),
        })
    }

    /// Attach base-asset 24h volume when the provider reports it.
    pub fn with_volume(mut self, volume_24h: Option<f64>) -> Result<Self, ValidationError> {
        validate_optional_non_negative("volume_24h", volume_24h)?;
        self.volume_24h = volume_24h;
        Ok(self)
    }

    pub fn with_market_cap(mut self, market_cap: Option<f64>) -> Result<Self, ValidationError> {
        validate_optional_non_negative("market_cap", market_cap)?;
        self.market_cap = market_cap;
        Ok(self)
    }

    pub fn with_fetched_at(mut self, fetched_at: UtcDateTime) -> Self {
        self.fetched_at = fetched_at;
        self
    }
}

/// Percentage change from an opening level, `None` when the open is unusable.
pub fn percent_change(price: f64, open: f64) -> Option<f64> {
    if !open.is_finite() || open <= 0.0 || !price.is_finite() {
        return None;
    }
    Some((price - open) / open * 100.0)
}

fn validate_finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    Ok(())
}

fn validate_positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
    validate_finite(field, value)?;
    if value <= 0.0 {
        return Err(ValidationError::NonPositiveValue { field });
    }
    Ok(())
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    validate_finite(field, value)?;
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}

fn validate_optional_non_negative(
    field: &'static str,
    value: Option<f64>,
) -> Result<(), ValidationError> {
    if let Some(value) = value {
        validate_non_negative(field, value)?;
    }
    Ok(())
}
