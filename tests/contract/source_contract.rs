//! Contract checks every price source must satisfy, run against canned
//! upstream payloads.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use coinquote_core::{
    BinanceSource, CoinGeckoSource, FetchErrorKind, HttpClient, HttpError, HttpRequest,
    HttpResponse, OkxSource, PriceSource, ProviderId, ResolverConfig, SourceAggregatorBuilder,
    TradingPair,
};

const OKX_TICKER: &str = r#"{"code":"0","msg":"","data":[{"instId":"SOL-USDT","last":"150.5","open24h":"148","high24h":"152","low24h":"147.1","vol24h":"910000"}]}"#;
const BINANCE_STATS: &str = r#"{"symbol":"SOLUSDT","priceChangePercent":"1.69","lastPrice":"150.50","highPrice":"152.00","lowPrice":"147.10","volume":"910000.00"}"#;
const GECKO_SEARCH: &str = r#"{"coins":[{"id":"solana","name":"Solana","symbol":"SOL"}]}"#;
const GECKO_COIN: &str = r#"{"id":"solana","market_data":{"current_price":{"usd":150.5},"price_change_percentage_24h":1.69,"high_24h":{"usd":152.0},"low_24h":{"usd":147.1},"market_cap":{"usd":70000000000.0}}}"#;

/// Serves canned bodies keyed by URL path fragment.
struct CannedHttpClient {
    routes: Vec<(&'static str, HttpResponse)>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl CannedHttpClient {
    fn new(routes: Vec<(&'static str, HttpResponse)>) -> Arc<Self> {
        Arc::new(Self {
            routes,
            requests: Mutex::new(Vec::new()),
        })
    }

    fn healthy() -> Arc<Self> {
        Self::new(vec![
            ("/api/v5/market/ticker", HttpResponse::ok_json(OKX_TICKER)),
            ("/api/v3/ticker/24hr", HttpResponse::ok_json(BINANCE_STATS)),
            ("/api/v3/search", HttpResponse::ok_json(GECKO_SEARCH)),
            ("/api/v3/coins/", HttpResponse::ok_json(GECKO_COIN)),
        ])
    }

    fn urls(&self) -> Vec<String> {
        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .iter()
            .map(HttpRequest::full_url)
            .collect()
    }
}

impl HttpClient for CannedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        let response = self
            .routes
            .iter()
            .find(|(path, _)| request.url.contains(path))
            .map(|(_, response)| response.clone())
            .unwrap_or_else(|| HttpResponse::new(404, ""));
        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .push(request);
        Box::pin(async move { Ok(response) })
    }
}

fn sol() -> TradingPair {
    TradingPair::new("SOL", "USDT").expect("valid pair")
}

fn all_sources(client: Arc<CannedHttpClient>) -> Vec<Arc<dyn PriceSource>> {
    let config = ResolverConfig::default();
    vec![
        Arc::new(OkxSource::from_config(client.clone(), &config)),
        Arc::new(BinanceSource::from_config(client.clone(), &config)),
        Arc::new(CoinGeckoSource::from_config(client, &config)),
    ]
}

#[tokio::test]
async fn every_source_reports_its_own_id_on_records() {
    let sources = all_sources(CannedHttpClient::healthy());

    for (source, expected) in sources.iter().zip(ProviderId::PRIORITY) {
        assert_eq!(source.id(), expected);

        let record = source.fetch(&sol()).await.expect("canned payload resolves");
        assert_eq!(record.source, expected);
        assert_eq!(record.pair, sol());
        assert!(record.price > 0.0);
        assert!(record.low_24h <= record.high_24h);
    }
}

#[tokio::test]
async fn sources_agree_on_normalized_values() {
    let sources = all_sources(CannedHttpClient::healthy());
    let mut changes = Vec::new();

    for source in &sources {
        let record = source.fetch(&sol()).await.expect("canned payload resolves");
        assert_eq!(record.price, 150.5);
        changes.push(record.change_24h_pct);
    }

    for change in changes {
        assert!((change - 1.69).abs() < 0.01, "change {change} drifted");
    }
}

#[tokio::test]
async fn wire_symbols_follow_each_provider_convention() {
    let client = CannedHttpClient::healthy();
    let config = ResolverConfig::default();

    OkxSource::from_config(client.clone(), &config)
        .fetch(&sol())
        .await
        .expect("okx resolves");
    BinanceSource::from_config(client.clone(), &config)
        .fetch(&sol())
        .await
        .expect("binance resolves");
    CoinGeckoSource::from_config(client.clone(), &config)
        .fetch(&sol())
        .await
        .expect("coingecko resolves");

    assert_eq!(
        client.urls(),
        vec![
            "https://www.okx.com/api/v5/market/ticker?instId=SOL-USDT".to_owned(),
            "https://api.binance.com/api/v3/ticker/24hr?symbol=SOLUSDT".to_owned(),
            "https://api.coingecko.com/api/v3/search?query=SOL".to_owned(),
            "https://api.coingecko.com/api/v3/coins/solana?localization=false&tickers=false&community_data=false&developer_data=false".to_owned(),
        ]
    );
}

#[tokio::test]
async fn unknown_pair_is_not_found_on_every_source() {
    let client = CannedHttpClient::new(vec![
        (
            "/api/v5/market/ticker",
            HttpResponse::ok_json(r#"{"code":"51001","msg":"Instrument ID does not exist","data":[]}"#),
        ),
        (
            "/api/v3/ticker/24hr",
            HttpResponse::new(400, r#"{"code":-1121,"msg":"Invalid symbol."}"#),
        ),
        ("/api/v3/search", HttpResponse::ok_json(r#"{"coins":[]}"#)),
    ]);
    let pair = TradingPair::new("ZZZNOTACOIN", "USDT").expect("valid pair");

    for source in all_sources(client) {
        let error = source.fetch(&pair).await.expect_err("unknown pair must fail");
        assert_eq!(error.kind(), FetchErrorKind::NotFound, "{}", error);
        assert_eq!(error.source(), source.id());
    }
}

#[tokio::test]
async fn builder_wires_sources_in_priority_order() {
    let aggregator = SourceAggregatorBuilder::new()
        .with_http_client(CannedHttpClient::healthy())
        .build();

    assert_eq!(aggregator.source_chain(), ProviderId::PRIORITY.to_vec());

    let record = aggregator.resolve(&sol()).await.expect("first source resolves");
    assert_eq!(record.source, ProviderId::Okx);
}
