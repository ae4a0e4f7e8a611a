use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reference assets whose USD spot price backs the ETH/BTC conversions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Asset {
    Eth,
    Btc,
}

impl Asset {
    pub const ALL: [Asset; 2] = [Asset::Eth, Asset::Btc];

    pub fn as_str(&self) -> &'static str {
        match self {
            Asset::Eth => "ETH",
            Asset::Btc => "BTC",
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, sqlx::FromRow)]
pub struct SpotPrice {
    pub id: i64,
    pub asset: String,
    pub usd_price: f64,
    pub recorded_at: DateTime<Utc>,
}

/// The pair of spot prices every normalized record is measured against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotPrices {
    pub eth: f64,
    pub btc: f64,
}
