use std::env;

use crate::http_client::DEFAULT_TIMEOUT_MS;

pub const OKX_BASE_URL: &str = "https://www.okx.com";
pub const BINANCE_BASE_URL: &str = "https://api.binance.com";
pub const COINGECKO_BASE_URL: &str = "https://api.coingecko.com";

/// Resolver settings shared by every upstream adapter.
///
/// # Environment Variables
///
/// | Setting | Env Var |
/// |---------|---------|
/// | Per-call timeout | `COINQUOTE_TIMEOUT_MS` |
/// | OKX base URL | `COINQUOTE_OKX_BASE_URL` |
/// | Binance base URL | `COINQUOTE_BINANCE_BASE_URL` |
/// | CoinGecko base URL | `COINQUOTE_COINGECKO_BASE_URL` |
/// | User agent | `COINQUOTE_USER_AGENT` |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    pub timeout_ms: u64,
    pub okx_base_url: String,
    pub binance_base_url: String,
    pub coingecko_base_url: String,
    pub user_agent: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            okx_base_url: String::from(OKX_BASE_URL),
            binance_base_url: String::from(BINANCE_BASE_URL),
            coingecko_base_url: String::from(COINGECKO_BASE_URL),
            user_agent: format!("coinquote/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ResolverConfig {
    /// Defaults overridden by any `COINQUOTE_*` variables that are set.
    ///
    /// An unparsable timeout keeps the default and is logged.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("COINQUOTE_TIMEOUT_MS") {
            match raw.trim().parse::<u64>() {
                Ok(timeout_ms) if timeout_ms > 0 => config.timeout_ms = timeout_ms,
                _ => tracing::warn!(value = %raw, "ignoring invalid COINQUOTE_TIMEOUT_MS"),
            }
        }
        if let Some(url) = lookup("COINQUOTE_OKX_BASE_URL") {
            config.okx_base_url = trim_base_url(&url);
        }
        if let Some(url) = lookup("COINQUOTE_BINANCE_BASE_URL") {
            config.binance_base_url = trim_base_url(&url);
        }
        if let Some(url) = lookup("COINQUOTE_COINGECKO_BASE_URL") {
            config.coingecko_base_url = trim_base_url(&url);
        }
        if let Some(agent) = lookup("COINQUOTE_USER_AGENT") {
            config.user_agent = agent;
        }

        config
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

fn trim_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_owned()
}
