use std::sync::Arc;

use serde::Deserialize;

use crate::config::{ResolverConfig, OKX_BASE_URL};
use crate::data_source::{FetchError, FetchFuture, PriceSource};
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient, DEFAULT_TIMEOUT_MS};
use crate::{percent_change, PriceRecord, ProviderId, TradingPair};

use super::parse_decimal;

const SOURCE: ProviderId = ProviderId::Okx;

/// OKX spot ticker adapter (`BASE-QUOTE` instrument ids).
#[derive(Clone)]
pub struct OkxSource {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    timeout_ms: u64,
}

impl Default for OkxSource {
    fn default() -> Self {
        Self {
            http_client: Arc::new(ReqwestHttpClient::default()),
            base_url: String::from(OKX_BASE_URL),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl OkxSource {
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
            base_url: config.okx_base_url.clone(),
            timeout_ms: config.timeout_ms,
        }
    }

    pub fn instrument_id(pair: &TradingPair) -> String {
        format!("{}-{}", pair.base(), pair.quote())
    }

    async fn fetch_ticker(&self, pair: &TradingPair) -> Result<PriceRecord, FetchError> {
        let inst_id = Self::instrument_id(pair);
        let request = HttpRequest::get(format!("{}/api/v5/market/ticker", self.base_url))
            .with_query("instId", inst_id.as_str())
            .with_timeout_ms(self.timeout_ms);

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|error| FetchError::from_transport(SOURCE, &error))?;

        if !response.is_success() {
            return Err(FetchError::from_status(SOURCE, &response, &inst_id));
        }

        let envelope: OkxEnvelope = serde_json::from_str(&response.body)
            .map_err(|e| FetchError::parse(SOURCE, format!("failed to parse ticker response: {e}")))?;

        // OKX reports unknown instruments with a non-zero code and HTTP 200.
        if envelope.code != "0" {
            return Err(FetchError::not_found(
                SOURCE,
                format!("trading pair {inst_id} not found (code {})", envelope.code),
            ));
        }

        let Some(ticker) = envelope.data.into_iter().next() else {
            return Err(FetchError::not_found(
                SOURCE,
                format!("trading pair {inst_id} not found (empty result)"),
            ));
        };

        normalize_ticker(pair, ticker)
    }
}

impl PriceSource for OkxSource {
    fn id(&self) -> ProviderId {
        SOURCE
    }

    fn fetch<'a>(&'a self, pair: &'a TradingPair) -> FetchFuture<'a> {
        Box::pin(self.fetch_ticker(pair))
    }
}

#[derive(Debug, Deserialize)]
struct OkxEnvelope {
    code: String,
    #[serde(default)]
    data: Vec<OkxTicker>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OkxTicker {
    last: String,
    #[serde(rename = "open24h")]
    open_24h: String,
    #[serde(rename = "high24h")]
    high_24h: String,
    #[serde(rename = "low24h")]
    low_24h: String,
    #[serde(rename = "vol24h", default)]
    vol_24h: Option<String>,
}

fn normalize_ticker(pair: &TradingPair, ticker: OkxTicker) -> Result<PriceRecord, FetchError> {
    let price = parse_decimal(SOURCE, "last", &ticker.last)?;
    let open = parse_decimal(SOURCE, "open24h", &ticker.open_24h)?;
    let change = percent_change(price, open)
        .ok_or_else(|| FetchError::parse(SOURCE, "open24h must be greater than zero"))?;
    let high = parse_decimal(SOURCE, "high24h", &ticker.high_24h)?;
    let low = parse_decimal(SOURCE, "low24h", &ticker.low_24h)?;
    let volume = ticker
        .vol_24h
        .as_deref()
        .map(|raw| parse_decimal(SOURCE, "vol24h", raw))
        .transpose()?;

    PriceRecord::new(pair.clone(), pair.base(), price, change, high, low, SOURCE)
        .and_then(|record| record.with_volume(volume))
        .map_err(|error| FetchError::from_validation(SOURCE, error))
}
