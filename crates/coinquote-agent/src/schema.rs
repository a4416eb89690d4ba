//! # Function Schema
//!
//! OpenAI-style function definition for the price tool and the typed form of
//! its call arguments.
//!
//! ## Example
//!
//! ```rust
//! use coinquote_agent::schema::{function_schema, QueryType, ToolArguments};
//!
//! let schema = function_schema();
//! assert_eq!(schema["name"], "query_crypto_price");
//!
//! let args = ToolArguments::parse(r#"{"symbol":"btc,eth","query_type":"batch"}"#)?;
//! assert_eq!(args.query_type, QueryType::Batch);
//! assert_eq!(args.symbols(), vec!["btc", "eth"]);
//! # Ok::<(), coinquote_agent::AgentError>(())
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::AgentError;

/// Function name advertised to the model.
pub const TOOL_NAME: &str = "query_crypto_price";

/// Kind of answer the model asks for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryType {
    #[default]
    Price,
    Overview,
    Batch,
}

impl QueryType {
    pub const ALL: [Self; 3] = [Self::Price, Self::Overview, Self::Batch];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Price => "price",
            Self::Overview => "overview",
            Self::Batch => "batch",
        }
    }
}

/// Arguments of one `query_crypto_price` call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ToolArguments {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub query_type: QueryType,
}

impl ToolArguments {
    /// Parses the JSON argument string a model attaches to a function call.
    /// An empty string is read as `{}`.
    pub fn parse(arguments_json: &str) -> Result<Self, AgentError> {
        let raw = arguments_json.trim();
        let raw = if raw.is_empty() { "{}" } else { raw };
        serde_json::from_str(raw).map_err(|source| AgentError::InvalidArguments {
            message: source.to_string(),
        })
    }

    /// Comma-separated symbols, trimmed, blanks dropped.
    pub fn symbols(&self) -> Vec<&str> {
        self.symbol
            .split(',')
            .map(str::trim)
            .filter(|symbol| !symbol.is_empty())
            .collect()
    }
}

pub fn function_schema() -> Value {
    json!({
        "name": TOOL_NAME,
        "description": "Look up real-time cryptocurrency prices",
        "parameters": {
            "type": "object",
            "properties": {
                "symbol": {
                    "type": "string",
                    "description": "Cryptocurrency symbol such as BTC, ETH or ADA; comma-separated for batch queries"
                },
                "query_type": {
                    "type": "string",
                    "enum": QueryType::ALL.map(QueryType::as_str),
                    "description": "price (single asset), overview (market overview) or batch (several assets)"
                }
            },
            "required": ["symbol"]
        }
    })
}
