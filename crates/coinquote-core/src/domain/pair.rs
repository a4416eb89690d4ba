use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Longest accepted base or quote symbol.
pub const MAX_ASSET_LEN: usize = 20;

/// Canonical `BASE/QUOTE` trading pair.
///
/// Both sides are non-empty, uppercase ASCII alphanumerics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TradingPair {
    base: String,
    quote: String,
}

impl TradingPair {
    pub fn new(base: &str, quote: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            base: validate_side("base", base)?,
            quote: validate_side("quote", quote)?,
        })
    }

    /// Parse the textual `BASE/QUOTE` form.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let Some((base, quote)) = input.split_once('/') else {
            return Err(ValidationError::MalformedPair {
                value: input.to_owned(),
            });
        };
        Self::new(base, quote)
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn quote(&self) -> &str {
        &self.quote
    }
}

fn validate_side(side: &'static str, raw: &str) -> Result<String, ValidationError> {
    let normalized = raw.trim().to_ascii_uppercase();
    if normalized.is_empty() {
        return Err(ValidationError::EmptyPairSide { side });
    }

    let len = normalized.chars().count();
    if len > MAX_ASSET_LEN {
        return Err(ValidationError::PairSideTooLong {
            side,
            len,
            max: MAX_ASSET_LEN,
        });
    }

    for (index, ch) in normalized.chars().enumerate() {
        if !ch.is_ascii_alphanumeric() {
            return Err(ValidationError::PairInvalidChar { ch, index });
        }
    }

    Ok(normalized)
}

impl Display for TradingPair {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

impl TryFrom<String> for TradingPair {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TradingPair> for String {
    fn from(value: TradingPair) -> Self {
        value.to_string()
    }
}
