//! # coinquote-agent
//!
//! Function-calling surface for chat agents: the `query_crypto_price`
//! schema and a handler that answers calls with chat-ready text.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`schema`] | Function definition and typed call arguments |
//! | [`tool`] | Call handler for price, batch, and overview queries |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use coinquote_agent::{function_schema, CryptoTool};
//! use coinquote_core::SourceAggregatorBuilder;
//!
//! let tool = CryptoTool::new(Arc::new(SourceAggregatorBuilder::new().build()));
//! println!("{}", function_schema());
//! let reply = tool.handle_call(r#"{"symbol":"ETH"}"#).await;
//! ```

mod error;
pub mod schema;
pub mod tool;

pub use error::AgentError;
pub use schema::{function_schema, QueryType, ToolArguments, TOOL_NAME};
pub use tool::{CryptoTool, OVERVIEW_ASSETS};
