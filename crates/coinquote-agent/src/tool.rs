//! # Price Tool
//!
//! Turns a function call into chat-ready text. Every reply is a plain
//! string; failures become an `Error: ...` line instead of an `Err`, since
//! the model only ever sees text.

use std::sync::Arc;

use coinquote_core::{format, LookupError, SourceAggregator};

use crate::schema::{QueryType, ToolArguments};
use crate::AgentError;

/// Assets listed by an overview query.
pub const OVERVIEW_ASSETS: [&str; 6] = ["BTC", "ETH", "BNB", "SOL", "XRP", "ADA"];

/// Function-calling handler backed by one shared aggregator.
#[derive(Clone)]
pub struct CryptoTool {
    aggregator: Arc<SourceAggregator>,
}

impl CryptoTool {
    pub fn new(aggregator: Arc<SourceAggregator>) -> Self {
        Self { aggregator }
    }

    /// Handles the raw JSON argument string of a `query_crypto_price` call.
    pub async fn handle_call(&self, arguments_json: &str) -> String {
        match ToolArguments::parse(arguments_json) {
            Ok(arguments) => self.handle(&arguments).await,
            Err(error) => error_line(&error.to_string()),
        }
    }

    pub async fn handle(&self, arguments: &ToolArguments) -> String {
        tracing::debug!(
            query_type = arguments.query_type.as_str(),
            symbol = %arguments.symbol,
            "handling tool call"
        );

        match arguments.query_type {
            QueryType::Overview => self.overview().await,
            QueryType::Batch => self.batch(&arguments.symbols()).await,
            QueryType::Price if arguments.symbol.trim().is_empty() => {
                error_line(&AgentError::MissingSymbol.to_string())
            }
            QueryType::Price => self.price(&arguments.symbol).await,
        }
    }

    /// Full display block for one symbol.
    pub async fn price(&self, symbol: &str) -> String {
        match self.aggregator.lookup(symbol).await {
            Ok(record) => format::render(&record),
            Err(error) => lookup_error_line(&error),
        }
    }

    /// One compact line per symbol, in input order.
    pub async fn batch(&self, symbols: &[&str]) -> String {
        if symbols.is_empty() {
            return error_line(&AgentError::MissingSymbol.to_string());
        }

        let mut lines = Vec::with_capacity(symbols.len() + 1);
        lines.push(format!("Prices for {} assets:", symbols.len()));
        for symbol in symbols {
            lines.push(self.summary_line(symbol).await);
        }
        lines.join("\n")
    }

    pub async fn overview(&self) -> String {
        let mut lines = Vec::with_capacity(OVERVIEW_ASSETS.len() + 1);
        lines.push(String::from("Market overview:"));
        for symbol in OVERVIEW_ASSETS {
            lines.push(self.summary_line(symbol).await);
        }
        lines.join("\n")
    }

    async fn summary_line(&self, symbol: &str) -> String {
        match self.aggregator.lookup(symbol).await {
            Ok(record) => format!(
                "{}: {} ({})",
                record.pair,
                format::format_price(record.price, record.pair.quote()),
                format::format_change(record.change_24h_pct)
            ),
            Err(error) => format!(
                "{}: {}",
                symbol.trim().to_ascii_uppercase(),
                error.user_message()
            ),
        }
    }
}

fn lookup_error_line(error: &LookupError) -> String {
    error_line(&error.user_message())
}

fn error_line(message: &str) -> String {
    format!("Error: {message}")
}
