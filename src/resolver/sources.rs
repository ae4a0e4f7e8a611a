//! The services the resolver aggregates, as seen from the resolver.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::models::{dto::SendMailRequest, Asset, ExternalError, SpotPrice, Ticker};

/// Live market data per ticker (CoinMarketCap)
#[async_trait]
pub trait TickerSource: Send + Sync {
    async fn fetch_ticker(&self, ticker: &str) -> Result<Ticker, ExternalError>;
}

/// ETH/USD price on a past day (Cryptowatch)
#[async_trait]
pub trait HistoricalPriceSource: Send + Sync {
    async fn eth_price_at(&self, date: NaiveDate) -> Result<f64, ExternalError>;
}

/// Current USD price of a reference asset (GDAX)
#[async_trait]
pub trait SpotPriceSource: Send + Sync {
    async fn current_price(&self, asset: Asset) -> Result<f64, ExternalError>;
}

/// Persisted spot prices, read when the live source is down
#[async_trait]
pub trait PriceStore: Send + Sync {
    async fn latest_price(&self, asset: Asset) -> Result<Option<SpotPrice>, sqlx::Error>;
    async fn record_price(&self, asset: Asset, usd_price: f64) -> Result<SpotPrice, sqlx::Error>;
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_mail(&self, mail: &SendMailRequest) -> Result<(), ExternalError>;
}
