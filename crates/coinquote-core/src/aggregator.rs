use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::adapters::{BinanceSource, CoinGeckoSource, OkxSource};
use crate::config::ResolverConfig;
use crate::data_source::{FetchError, FetchErrorKind, PriceSource};
use crate::error::LookupError;
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::normalize::normalize;
use crate::{PriceRecord, ProviderId, TradingPair};

/// Minimum number of `NotFound` attempts that marks the symbol itself as unknown.
pub const INVALID_SYMBOL_NOT_FOUND_THRESHOLD: usize = 2;

/// Terminal failure category after every source has been tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    UnknownSymbol,
    NetworkUnstable,
    Upstream,
}

impl DiagnosticKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UnknownSymbol => "unknown_symbol",
            Self::NetworkUnstable => "network_unstable",
            Self::Upstream => "upstream",
        }
    }
}

impl Display for DiagnosticKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-facing explanation of a failed resolution.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct Diagnostic {
    kind: DiagnosticKind,
    message: String,
}

impl Diagnostic {
    fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Folds the failed attempts of one resolution into a single diagnostic.
///
/// A lone `NotFound` never marks the symbol unknown on its own; it falls
/// through to the network and last-error branches. Only the error kind is
/// consulted, since details echo the user's symbol.
pub fn classify(base: &str, errors: &[FetchError]) -> Diagnostic {
    let not_found = errors.iter().filter(|error| error.is_not_found()).count();
    if not_found >= INVALID_SYMBOL_NOT_FOUND_THRESHOLD {
        return Diagnostic::new(
            DiagnosticKind::UnknownSymbol,
            format!(
                "Sorry, no cryptocurrency matching '{base}' was found. Check the symbol, or try a common one such as BTC, ETH or ADA."
            ),
        );
    }

    if errors
        .iter()
        .any(|error| error.kind() == FetchErrorKind::NetworkError)
    {
        return Diagnostic::new(
            DiagnosticKind::NetworkUnstable,
            "Network error: the connection is unstable, please check your network and try again.",
        );
    }

    match errors.last() {
        Some(last) => Diagnostic::new(
            DiagnosticKind::Upstream,
            format!("Failed to fetch price data: {last}"),
        ),
        None => Diagnostic::new(
            DiagnosticKind::Upstream,
            "Failed to fetch price data: no price sources are configured",
        ),
    }
}

/// Ordered source list with first-success fallback.
///
/// Sources are tried one at a time in registration order. The aggregator
/// holds no mutable state and is shared behind `Arc` by every caller.
pub struct SourceAggregator {
    sources: Vec<Arc<dyn PriceSource>>,
    attempt_timeout: Duration,
}

impl Default for SourceAggregator {
    fn default() -> Self {
        SourceAggregatorBuilder::new().build()
    }
}

impl SourceAggregator {
    pub fn new(sources: Vec<Arc<dyn PriceSource>>) -> Self {
        Self {
            sources,
            attempt_timeout: attempt_budget(&ResolverConfig::default()),
        }
    }

    /// Upper bound for a single source attempt, including every request it makes.
    pub fn with_attempt_timeout(mut self, attempt_timeout: Duration) -> Self {
        self.attempt_timeout = attempt_timeout;
        self
    }

    pub fn source_chain(&self) -> Vec<ProviderId> {
        self.sources.iter().map(|source| source.id()).collect()
    }

    /// Normalizes `input` and resolves it. Rejected input makes no upstream call.
    pub async fn lookup(&self, input: &str) -> Result<PriceRecord, LookupError> {
        let pair = normalize(input)?;
        Ok(self.resolve(&pair).await?)
    }

    pub async fn resolve(&self, pair: &TradingPair) -> Result<PriceRecord, Diagnostic> {
        let started = Instant::now();
        let mut errors = Vec::with_capacity(self.sources.len());

        for source in &self.sources {
            let provider = source.id();
            tracing::debug!(source = %provider, pair = %pair, "trying price source");

            let outcome = match tokio::time::timeout(self.attempt_timeout, source.fetch(pair)).await
            {
                Ok(outcome) => outcome,
                Err(_) => Err(FetchError::network(
                    provider,
                    format!(
                        "request timeout after {} ms",
                        self.attempt_timeout.as_millis()
                    ),
                )),
            };

            match outcome {
                Ok(record) => {
                    tracing::info!(
                        source = %provider,
                        pair = %pair,
                        failed_attempts = errors.len(),
                        latency_ms = elapsed_ms(started),
                        "price resolved"
                    );
                    return Ok(record);
                }
                Err(error) => {
                    tracing::warn!(
                        source = %provider,
                        pair = %pair,
                        kind = %error.kind(),
                        detail = error.detail(),
                        "price source failed"
                    );
                    errors.push(error);
                }
            }
        }

        let diagnostic = classify(pair.base(), &errors);
        tracing::warn!(
            pair = %pair,
            kind = %diagnostic.kind(),
            attempts = errors.len(),
            latency_ms = elapsed_ms(started),
            "all price sources failed"
        );
        Err(diagnostic)
    }
}

/// Builder wiring the three production sources from a [`ResolverConfig`].
///
/// # Example
///
/// ```rust,ignore
/// use coinquote_core::{ResolverConfig, SourceAggregatorBuilder};
///
/// let aggregator = SourceAggregatorBuilder::new()
///     .with_config(ResolverConfig::from_env())
///     .with_coingecko_enabled(false)
///     .build();
/// ```
pub struct SourceAggregatorBuilder {
    config: ResolverConfig,
    http_client: Option<Arc<dyn HttpClient>>,
    enable_okx: bool,
    enable_binance: bool,
    enable_coingecko: bool,
}

impl Default for SourceAggregatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceAggregatorBuilder {
    pub fn new() -> Self {
        Self {
            config: ResolverConfig::default(),
            http_client: None,
            enable_okx: true,
            enable_binance: true,
            enable_coingecko: true,
        }
    }

    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Share one transport between every source instead of building a reqwest client.
    pub fn with_http_client(mut self, http_client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(http_client);
        self
    }

    pub fn with_okx_enabled(mut self, enabled: bool) -> Self {
        self.enable_okx = enabled;
        self
    }

    pub fn with_binance_enabled(mut self, enabled: bool) -> Self {
        self.enable_binance = enabled;
        self
    }

    pub fn with_coingecko_enabled(mut self, enabled: bool) -> Self {
        self.enable_coingecko = enabled;
        self
    }

    pub fn build(self) -> SourceAggregator {
        let http_client = self
            .http_client
            .unwrap_or_else(|| Arc::new(ReqwestHttpClient::new(&self.config.user_agent)));

        let mut sources: Vec<Arc<dyn PriceSource>> = Vec::with_capacity(ProviderId::PRIORITY.len());
        for provider in ProviderId::PRIORITY {
            match provider {
                ProviderId::Okx if self.enable_okx => sources.push(Arc::new(
                    OkxSource::from_config(Arc::clone(&http_client), &self.config),
                )),
                ProviderId::Binance if self.enable_binance => sources.push(Arc::new(
                    BinanceSource::from_config(Arc::clone(&http_client), &self.config),
                )),
                ProviderId::CoinGecko if self.enable_coingecko => sources.push(Arc::new(
                    CoinGeckoSource::from_config(Arc::clone(&http_client), &self.config),
                )),
                _ => {}
            }
        }

        SourceAggregator::new(sources).with_attempt_timeout(attempt_budget(&self.config))
    }
}

/// CoinGecko makes two sequential requests per attempt.
fn attempt_budget(config: &ResolverConfig) -> Duration {
    Duration::from_millis(config.timeout_ms.saturating_mul(2))
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis().min(u128::from(u64::MAX)) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::FetchFuture;
    use crate::error::Rejected;
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Script {
        Succeed,
        Fail(FetchErrorKind, &'static str),
        Stall,
    }

    struct StubSource {
        id: ProviderId,
        script: Script,
        calls: AtomicUsize,
    }

    impl StubSource {
        fn new(id: ProviderId, script: Script) -> Arc<Self> {
            Arc::new(Self {
                id,
                script,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl PriceSource for StubSource {
        fn id(&self) -> ProviderId {
            self.id
        }

        fn fetch<'a>(&'a self, pair: &'a TradingPair) -> FetchFuture<'a> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move {
                match &self.script {
                    Script::Succeed => Ok(PriceRecord::new(
                        pair.clone(),
                        pair.base(),
                        100.0,
                        1.0,
                        101.0,
                        99.0,
                        self.id,
                    )
                    .expect("valid record")),
                    Script::Fail(kind, detail) => Err(FetchError::new(self.id, *kind, *detail)),
                    Script::Stall => {
                        tokio::time::sleep(Duration::from_secs(30)).await;
                        Err(FetchError::upstream(self.id, "unreachable"))
                    }
                }
            })
        }
    }

    fn aggregator(sources: &[Arc<StubSource>]) -> SourceAggregator {
        SourceAggregator::new(
            sources
                .iter()
                .map(|source| Arc::clone(source) as Arc<dyn PriceSource>)
                .collect(),
        )
    }

    fn btc() -> TradingPair {
        TradingPair::new("BTC", "USDT").expect("valid pair")
    }

    #[tokio::test]
    async fn first_success_short_circuits_later_sources() {
        let okx = StubSource::new(ProviderId::Okx, Script::Succeed);
        let binance = StubSource::new(ProviderId::Binance, Script::Succeed);
        let gecko = StubSource::new(ProviderId::CoinGecko, Script::Succeed);

        let record = aggregator(&[okx.clone(), binance.clone(), gecko.clone()])
            .resolve(&btc())
            .await
            .expect("should resolve");

        assert_eq!(record.source, ProviderId::Okx);
        assert_eq!((okx.calls(), binance.calls(), gecko.calls()), (1, 0, 0));
    }

    #[tokio::test]
    async fn falls_back_in_priority_order() {
        let okx = StubSource::new(
            ProviderId::Okx,
            Script::Fail(FetchErrorKind::UpstreamError, "upstream returned status 502"),
        );
        let binance = StubSource::new(ProviderId::Binance, Script::Succeed);
        let gecko = StubSource::new(ProviderId::CoinGecko, Script::Succeed);

        let record = aggregator(&[okx.clone(), binance.clone(), gecko.clone()])
            .resolve(&btc())
            .await
            .expect("should resolve");

        assert_eq!(record.source, ProviderId::Binance);
        assert_eq!((okx.calls(), binance.calls(), gecko.calls()), (1, 1, 0));
    }

    #[test]
    fn two_not_found_errors_mark_symbol_unknown() {
        let errors = [
            FetchError::not_found(ProviderId::Okx, "trading pair ZZZ-USDT not found"),
            FetchError::network(ProviderId::Binance, "request timeout"),
            FetchError::not_found(ProviderId::CoinGecko, "no cryptocurrency found"),
        ];

        let diagnostic = classify("ZZZ", &errors);
        assert_eq!(diagnostic.kind(), DiagnosticKind::UnknownSymbol);
        assert!(diagnostic.message().contains("'ZZZ'"));
        assert!(diagnostic.message().contains("BTC"));
    }

    #[test]
    fn not_found_twice_wins_over_a_trailing_network_error() {
        let errors = [
            FetchError::not_found(ProviderId::Okx, "trading pair ZZZ-USDT not found"),
            FetchError::not_found(ProviderId::Binance, "trading pair ZZZUSDT not found"),
            FetchError::network(ProviderId::CoinGecko, "request timeout after 20000 ms"),
        ];

        let diagnostic = classify("ZZZ", &errors);
        assert_eq!(diagnostic.kind(), DiagnosticKind::UnknownSymbol);
    }

    #[test]
    fn network_error_kind_marks_connection_unstable() {
        let errors = [
            FetchError::network(ProviderId::Okx, "transport error: connection failed"),
            FetchError::parse(ProviderId::Binance, "failed to parse 24hr statistics"),
        ];

        let diagnostic = classify("BTC", &errors);
        assert_eq!(diagnostic.kind(), DiagnosticKind::NetworkUnstable);
    }

    #[test]
    fn symbols_resembling_network_words_are_not_network_trouble() {
        let errors = [
            FetchError::not_found(
                ProviderId::Okx,
                "trading pair RESETX-USDT not found (code 51001)",
            ),
            FetchError::upstream(ProviderId::Binance, "upstream returned status 502"),
            FetchError::upstream(
                ProviderId::CoinGecko,
                "no USDT price available for NETWORK/USDT",
            ),
        ];

        let diagnostic = classify("RESETX", &errors);
        assert_eq!(diagnostic.kind(), DiagnosticKind::Upstream);
        assert!(diagnostic.message().contains("CoinGecko"));
    }

    #[test]
    fn lone_not_found_surfaces_last_error() {
        let errors = [
            FetchError::not_found(ProviderId::Okx, "trading pair FOO-USDT not found"),
            FetchError::upstream(ProviderId::Binance, "rate limited (status 429)"),
            FetchError::parse(ProviderId::CoinGecko, "missing high_24h.usd"),
        ];

        let diagnostic = classify("FOO", &errors);
        assert_eq!(diagnostic.kind(), DiagnosticKind::Upstream);
        assert!(diagnostic.message().contains("CoinGecko: missing high_24h.usd"));
    }

    #[test]
    fn empty_source_list_reports_configuration() {
        let diagnostic = classify("BTC", &[]);
        assert_eq!(diagnostic.kind(), DiagnosticKind::Upstream);
        assert!(diagnostic.message().contains("no price sources"));
    }

    #[tokio::test]
    async fn stalled_source_times_out_and_fallback_continues() {
        let okx = StubSource::new(ProviderId::Okx, Script::Stall);
        let binance = StubSource::new(ProviderId::Binance, Script::Succeed);

        let record = aggregator(&[okx.clone(), binance.clone()])
            .with_attempt_timeout(Duration::from_millis(20))
            .resolve(&btc())
            .await
            .expect("should resolve");

        assert_eq!(record.source, ProviderId::Binance);
        assert_eq!(okx.calls(), 1);
    }

    #[tokio::test]
    async fn rejected_input_makes_no_calls() {
        let okx = StubSource::new(ProviderId::Okx, Script::Succeed);

        let error = aggregator(&[okx.clone()])
            .lookup("binance")
            .await
            .expect_err("venue names are rejected");

        assert!(matches!(
            error,
            LookupError::Rejected(Rejected::VenueName { .. })
        ));
        assert_eq!(okx.calls(), 0);
    }

    #[test]
    fn builder_respects_priority_and_flags() {
        let aggregator = SourceAggregatorBuilder::new()
            .with_binance_enabled(false)
            .build();
        assert_eq!(
            aggregator.source_chain(),
            vec![ProviderId::Okx, ProviderId::CoinGecko]
        );
        assert_eq!(
            SourceAggregatorBuilder::new().build().source_chain(),
            ProviderId::PRIORITY.to_vec()
        );
    }
}
