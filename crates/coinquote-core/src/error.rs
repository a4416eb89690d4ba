use thiserror::Error;

use crate::aggregator::Diagnostic;

/// Validation and contract errors exposed by `coinquote-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("trading pair side '{side}' cannot be empty")]
    EmptyPairSide { side: &'static str },
    #[error("trading pair side '{side}' length {len} exceeds max {max}")]
    PairSideTooLong {
        side: &'static str,
        len: usize,
        max: usize,
    },
    #[error("trading pair contains invalid character '{ch}' at index {index}")]
    PairInvalidChar { ch: char, index: usize },
    #[error("trading pair must look like BASE/QUOTE: '{value}'")]
    MalformedPair { value: String },

    #[error("invalid source '{value}', expected one of okx, binance, coingecko")]
    InvalidSource { value: String },

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },
    #[error("field '{field}' must be greater than zero")]
    NonPositiveValue { field: &'static str },
}

/// Input rejected before any upstream call is made.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Rejected {
    #[error("symbol cannot be empty")]
    Empty,
    #[error("'{input}' is an exchange name, not a valid cryptocurrency symbol")]
    VenueName { input: String },
    #[error("'{input}' is not a valid trading pair, expected BASE/QUOTE")]
    MalformedPair { input: String },
    #[error("'{input}' is not a valid cryptocurrency symbol (unsupported character '{ch}')")]
    InvalidCharacter { input: String, ch: char },
    #[error("'{input}' is not a valid cryptocurrency symbol (too long)")]
    TooLong { input: String },
}

/// Failure side of a full symbol lookup.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error(transparent)]
    Rejected(#[from] Rejected),

    #[error(transparent)]
    Unresolved(#[from] Diagnostic),
}

impl LookupError {
    /// User-facing message for chat and HTTP responses.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}
