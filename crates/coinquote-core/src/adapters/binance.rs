use std::sync::Arc;

use serde::Deserialize;

use crate::config::{ResolverConfig, BINANCE_BASE_URL};
use crate::data_source::{FetchError, FetchFuture, PriceSource};
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient, DEFAULT_TIMEOUT_MS};
use crate::{PriceRecord, ProviderId, TradingPair};

use super::parse_decimal;

const SOURCE: ProviderId = ProviderId::Binance;

/// Binance spot 24h statistics adapter (`BASEQUOTE` symbols).
#[derive(Clone)]
pub struct BinanceSource {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    timeout_ms: u64,
}

impl Default for BinanceSource {
    fn default() -> Self {
        Self {
            http_client: Arc::new(ReqwestHttpClient::default()),
            base_url: String::from(BINANCE_BASE_URL),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl BinanceSource {
    pub fn with_http_client(http_client: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn from_config(http_client: Arc<dyn HttpClient>, config: &ResolverConfig) -> Self {
        Self {
            http_client,
            base_url: config.binance_base_url.clone(),
            timeout_ms: config.timeout_ms,
        }
    }

    pub fn wire_symbol(pair: &TradingPair) -> String {
        format!("{}{}", pair.base(), pair.quote())
    }

    async fn fetch_24hr(&self, pair: &TradingPair) -> Result<PriceRecord, FetchError> {
        let symbol = Self::wire_symbol(pair);
        let request = HttpRequest::get(format!("{}/api/v3/ticker/24hr", self.base_url))
            .with_query("symbol", symbol.as_str())
            .with_timeout_ms(self.timeout_ms);

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|error| FetchError::from_transport(SOURCE, &error))?;

        if !response.is_success() {
            return Err(FetchError::from_status(SOURCE, &response, &symbol));
        }

        let stats: BinanceTicker24h = serde_json::from_str(&response.body).map_err(|e| {
            FetchError::parse(SOURCE, format!("failed to parse 24hr statistics: {e}"))
        })?;

        normalize_stats(pair, stats)
    }
}

impl PriceSource for BinanceSource {
    fn id(&self) -> ProviderId {
        SOURCE
    }

    fn fetch<'a>(&'a self, pair: &'a TradingPair) -> FetchFuture<'a> {
        Box::pin(self.fetch_24hr(pair))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BinanceTicker24h {
    last_price: String,
    price_change_percent: String,
    high_price: String,
    low_price: String,
    #[serde(default)]
    volume: Option<String>,
}

fn normalize_stats(pair: &TradingPair, stats: BinanceTicker24h) -> Result<PriceRecord, FetchError> {
    let price = parse_decimal(SOURCE, "lastPrice", &stats.last_price)?;
    let change = parse_decimal(SOURCE, "priceChangePercent", &stats.price_change_percent)?;
    let high = parse_decimal(SOURCE, "highPrice", &stats.high_price)?;
    let low = parse_decimal(SOURCE, "lowPrice", &stats.low_price)?;
    let volume = stats
        .volume
        .as_deref()
        .map(|raw| parse_decimal(SOURCE, "volume", raw))
        .transpose()?;

    PriceRecord::new(pair.clone(), pair.base(), price, change, high, low, SOURCE)
        .and_then(|record| record.with_volume(volume))
        .map_err(|error| FetchError::from_validation(SOURCE, error))
}
