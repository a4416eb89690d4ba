use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Canonical upstream provider identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Okx,
    Binance,
    #[serde(rename = "coingecko")]
    CoinGecko,
}

impl ProviderId {
    /// Fixed resolution order, most reliable provider first.
    pub const PRIORITY: [Self; 3] = [Self::Okx, Self::Binance, Self::CoinGecko];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Okx => "okx",
            Self::Binance => "binance",
            Self::CoinGecko => "coingecko",
        }
    }

    /// Human-facing provider name used in rendered output.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Okx => "OKX",
            Self::Binance => "Binance",
            Self::CoinGecko => "CoinGecko",
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "okx" => Ok(Self::Okx),
            "binance" => Ok(Self::Binance),
            "coingecko" => Ok(Self::CoinGecko),
            other => Err(ValidationError::InvalidSource {
                value: other.to_owned(),
            }),
        }
    }
}
