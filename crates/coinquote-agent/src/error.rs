use thiserror::Error;

/// Failures of a tool call that never reach the price sources.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AgentError {
    #[error("invalid function arguments: {message}")]
    InvalidArguments { message: String },

    #[error("please provide a cryptocurrency symbol, for example BTC or ETH")]
    MissingSymbol,
}
