use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;

use crate::config::{ResolverConfig, COINGECKO_BASE_URL};
use crate::data_source::{FetchError, FetchFuture, PriceSource};
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient, DEFAULT_TIMEOUT_MS};
use crate::{PriceRecord, ProviderId, TradingPair};

const SOURCE: ProviderId = ProviderId::CoinGecko;

/// CoinGecko adapter.
///
/// Two-step fetch: search the base symbol, then read market data for the
/// chosen coin id. CoinGecko quotes in fiat, so `USDT` is read as `usd`
/// while the record keeps the requested quote.
#[derive(Clone)]
pub struct CoinGeckoSource {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    timeout_ms: u64,
}

impl Default for CoinGeckoSource {
    fn default() -> Self {
        Self {
            http_client: Arc::new(ReqwestHttpClient::default()),
            base_url: String::from(COINGECKO_BASE_URL),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl CoinGeckoSource {
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
            base_url: config.coingecko_base_url.clone(),
            timeout_ms: config.timeout_ms,
        }
    }

    /// CoinGecko `vs_currency` key for a quote symbol.
    pub fn vs_currency(quote: &str) -> String {
        match quote {
            "USDT" => String::from("usd"),
            other => other.to_ascii_lowercase(),
        }
    }

    async fn get(&self, request: HttpRequest, step: &str) -> Result<String, FetchError> {
        let response = self
            .http_client
            .execute(request.with_timeout_ms(self.timeout_ms))
            .await
            .map_err(|error| FetchError::from_transport(SOURCE, &error))?;

        if !response.is_success() {
            return Err(FetchError::upstream(
                SOURCE,
                format!("{step} returned status {}", response.status),
            ));
        }

        Ok(response.body)
    }

    async fn search(&self, base: &str) -> Result<SearchCoin, FetchError> {
        let request = HttpRequest::get(format!("{}/api/v3/search", self.base_url))
            .with_query("query", base);
        let body = self.get(request, "search").await?;

        let results: SearchResponse = serde_json::from_str(&body)
            .map_err(|e| FetchError::parse(SOURCE, format!("failed to parse search response: {e}")))?;

        pick_candidate(base, results.coins).ok_or_else(|| {
            FetchError::not_found(SOURCE, format!("no cryptocurrency found matching '{base}'"))
        })
    }

    async fn fetch_two_step(&self, pair: &TradingPair) -> Result<PriceRecord, FetchError> {
        let coin = self.search(pair.base()).await?;

        let request = HttpRequest::get(format!(
            "{}/api/v3/coins/{}",
            self.base_url,
            urlencoding::encode(&coin.id)
        ))
        .with_query("localization", "false")
        .with_query("tickers", "false")
        .with_query("community_data", "false")
        .with_query("developer_data", "false");
        let body = self.get(request, "coin lookup").await?;

        let detail: CoinDetail = serde_json::from_str(&body)
            .map_err(|e| FetchError::parse(SOURCE, format!("failed to parse coin data: {e}")))?;

        normalize_market_data(pair, &coin.name, detail)
    }
}

impl PriceSource for CoinGeckoSource {
    fn id(&self) -> ProviderId {
        SOURCE
    }

    fn fetch<'a>(&'a self, pair: &'a TradingPair) -> FetchFuture<'a> {
        Box::pin(self.fetch_two_step(pair))
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    coins: Vec<SearchCoin>,
}

#[derive(Debug, Clone, Deserialize)]
struct SearchCoin {
    id: String,
    name: String,
    #[serde(default)]
    symbol: String,
}

#[derive(Debug, Deserialize)]
struct CoinDetail {
    #[serde(default)]
    market_data: Option<MarketData>,
}

/// Per-currency maps; CoinGecko sends `null` for currencies it cannot price.
#[derive(Debug, Deserialize)]
struct MarketData {
    #[serde(default)]
    current_price: HashMap<String, Option<f64>>,
    #[serde(default)]
    price_change_percentage_24h: Option<f64>,
    #[serde(default)]
    high_24h: HashMap<String, Option<f64>>,
    #[serde(default)]
    low_24h: HashMap<String, Option<f64>>,
    #[serde(default)]
    market_cap: HashMap<String, Option<f64>>,
}

fn in_currency(values: &HashMap<String, Option<f64>>, currency: &str) -> Option<f64> {
    values.get(currency).copied().flatten()
}

/// Prefer an exact symbol match; search ranks by popularity otherwise.
fn pick_candidate(base: &str, coins: Vec<SearchCoin>) -> Option<SearchCoin> {
    let exact = coins
        .iter()
        .position(|coin| coin.symbol.eq_ignore_ascii_case(base));
    match exact {
        Some(index) => coins.into_iter().nth(index),
        None => coins.into_iter().next(),
    }
}

fn normalize_market_data(
    pair: &TradingPair,
    name: &str,
    detail: CoinDetail,
) -> Result<PriceRecord, FetchError> {
    let Some(market) = detail.market_data else {
        return Err(FetchError::upstream(SOURCE, "coin has no market data"));
    };

    let currency = CoinGeckoSource::vs_currency(pair.quote());
    let price = in_currency(&market.current_price, &currency)
        .filter(|price| *price > 0.0)
        .ok_or_else(|| {
            FetchError::upstream(SOURCE, format!("no {} price available for {pair}", pair.quote()))
        })?;

    let change = market
        .price_change_percentage_24h
        .ok_or_else(|| FetchError::parse(SOURCE, "missing price_change_percentage_24h"))?;
    let high = in_currency(&market.high_24h, &currency)
        .ok_or_else(|| FetchError::parse(SOURCE, format!("missing high_24h.{currency}")))?;
    let low = in_currency(&market.low_24h, &currency)
        .ok_or_else(|| FetchError::parse(SOURCE, format!("missing low_24h.{currency}")))?;
    let market_cap = in_currency(&market.market_cap, &currency).filter(|cap| *cap > 0.0);

    PriceRecord::new(pair.clone(), name, price, change, high, low, SOURCE)
        .and_then(|record| record.with_market_cap(market_cap))
        .map_err(|error| FetchError::from_validation(SOURCE, error))
}
