pub mod mail;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::{
    models::{Asset, ExternalError, Ticker, TickerPayload},
    resolver::{HistoricalPriceSource, SpotPriceSource, TickerSource},
    Config,
};

pub use mail::HttpMailer;

const USER_AGENT: &str = concat!("icostats-backend/", env!("CARGO_PKG_VERSION"));
const ONE_DAY_SECS: i64 = 86_400;

/// HTTP client for the public price APIs
pub struct External {
    client: Client,
    coinmarketcap_url: String,
    gdax_url: String,
    cryptowatch_url: String,
}

#[derive(Debug, Deserialize)]
struct GdaxTicker {
    price: String,
}

#[derive(Debug, Deserialize)]
struct CryptowatchOhlc {
    result: Value,
}

impl External {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(External {
            client: http_client(config.http_timeout)?,
            coinmarketcap_url: trim_base(&config.coinmarketcap_url),
            gdax_url: trim_base(&config.gdax_url),
            cryptowatch_url: trim_base(&config.cryptowatch_url),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, ExternalError> {
        debug!("GET {}", url);
        let response = self.client.get(url).query(query).send().await?;
        match response.status() {
            status if status.is_success() => {
                let body = response.text().await?;
                Ok(serde_json::from_str(&body)?)
            }
            StatusCode::NOT_FOUND => Err(ExternalError::NotFound(url.to_string())),
            status => Err(ExternalError::ApiError(format!("{url} returned {status}"))),
        }
    }
}

#[async_trait]
impl TickerSource for External {
    async fn fetch_ticker(&self, ticker: &str) -> Result<Ticker, ExternalError> {
        let url = format!("{}/v1/ticker/{}/", self.coinmarketcap_url, ticker);
        let payload: TickerPayload = self.get_json(&url, &[]).await?;
        payload
            .into_first()
            .ok_or_else(|| ExternalError::NotFound(ticker.to_string()))
    }
}

#[async_trait]
impl SpotPriceSource for External {
    async fn current_price(&self, asset: Asset) -> Result<f64, ExternalError> {
        let url = format!("{}/products/{}-USD/ticker", self.gdax_url, asset);
        let ticker: GdaxTicker = self.get_json(&url, &[]).await?;
        ticker
            .price
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite() && *p > 0.0)
            .ok_or_else(|| ExternalError::ApiError(format!("bad {asset} price: {}", ticker.price)))
    }
}

#[async_trait]
impl HistoricalPriceSource for External {
    /// Close of the daily ETH/USD candle on GDAX for `date`
    async fn eth_price_at(&self, date: NaiveDate) -> Result<f64, ExternalError> {
        let url = format!("{}/markets/gdax/ethusd/ohlc", self.cryptowatch_url);
        let day_end = date.and_time(NaiveTime::MIN).and_utc().timestamp() + ONE_DAY_SECS;
        let query = [
            ("after", day_end.to_string()),
            ("before", day_end.to_string()),
            ("periods", ONE_DAY_SECS.to_string()),
        ];
        let ohlc: CryptowatchOhlc = self.get_json(&url, &query).await?;

        // candle layout: [close_time, open, high, low, close, volume, ...]
        ohlc.result[ONE_DAY_SECS.to_string()]
            .as_array()
            .and_then(|candles| candles.first())
            .and_then(|candle| candle.get(4))
            .and_then(Value::as_f64)
            .ok_or_else(|| ExternalError::ApiError(format!("no ETH candle for {date}")))
    }
}

pub(crate) fn http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
}

fn trim_base(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
