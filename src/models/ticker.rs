use serde::{Deserialize, Deserializer, Serialize};

/// One entry of the CoinMarketCap v1 ticker. Numbers arrive as strings.
#[derive(Debug, Default, Clone, Deserialize, Serialize, PartialEq)]
pub struct Ticker {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rank: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price_usd: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price_btc: Option<f64>,
    #[serde(default, rename = "24h_volume_usd", deserialize_with = "lenient_f64")]
    pub volume_usd_24h: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub market_cap_usd: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub available_supply: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_supply: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub percent_change_1h: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub percent_change_24h: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub percent_change_7d: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub last_updated: Option<f64>,
}

/// The ticker endpoint answers with a one-element array, older mirrors with a bare object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TickerPayload {
    Many(Vec<Ticker>),
    One(Ticker),
}

impl TickerPayload {
    pub fn into_first(self) -> Option<Ticker> {
        match self {
            TickerPayload::Many(tickers) => tickers.into_iter().next(),
            TickerPayload::One(ticker) => Some(ticker),
        }
    }
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let parsed = match value {
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        _ => None,
    };
    Ok(parsed.filter(|v| v.is_finite()))
}
