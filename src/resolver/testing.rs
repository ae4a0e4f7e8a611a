//! In-memory stand-ins for the resolver's collaborators.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use super::{
    HistoricalPriceSource, IcoResolver, Mailer, PriceStore, Sources, SpotPriceSource,
    TickerSource,
};
use crate::models::{dto::SendMailRequest, Asset, ExternalError, IcoSeed, SpotPrice, Ticker};

#[derive(Default)]
pub struct FakeTickers {
    pub tickers: Mutex<HashMap<String, Ticker>>,
}

#[async_trait]
impl TickerSource for FakeTickers {
    async fn fetch_ticker(&self, ticker: &str) -> Result<Ticker, ExternalError> {
        self.tickers
            .lock()
            .unwrap()
            .get(ticker)
            .cloned()
            .ok_or_else(|| ExternalError::NotFound(ticker.to_string()))
    }
}

#[derive(Default)]
pub struct FakeHistory {
    pub price: Mutex<Option<f64>>,
    pub dates: Mutex<Vec<NaiveDate>>,
}

#[async_trait]
impl HistoricalPriceSource for FakeHistory {
    async fn eth_price_at(&self, date: NaiveDate) -> Result<f64, ExternalError> {
        self.dates.lock().unwrap().push(date);
        self.price
            .lock()
            .unwrap()
            .ok_or_else(|| ExternalError::ApiError("no candles".to_string()))
    }
}

#[derive(Default)]
pub struct FakeSpot {
    pub prices: Mutex<HashMap<Asset, f64>>,
    pub calls: AtomicUsize,
}

#[async_trait]
impl SpotPriceSource for FakeSpot {
    async fn current_price(&self, asset: Asset) -> Result<f64, ExternalError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prices
            .lock()
            .unwrap()
            .get(&asset)
            .copied()
            .ok_or_else(|| ExternalError::ApiError(format!("{asset} ticker unavailable")))
    }
}

#[derive(Default)]
pub struct FakeStore {
    pub rows: Mutex<Vec<SpotPrice>>,
}

#[async_trait]
impl PriceStore for FakeStore {
    async fn latest_price(&self, asset: Asset) -> Result<Option<SpotPrice>, sqlx::Error> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|row| row.asset == asset.as_str())
            .max_by_key(|row| (row.recorded_at, row.id))
            .cloned())
    }

    async fn record_price(&self, asset: Asset, usd_price: f64) -> Result<SpotPrice, sqlx::Error> {
        let mut rows = self.rows.lock().unwrap();
        let row = SpotPrice {
            id: rows.len() as i64 + 1,
            asset: asset.as_str().to_string(),
            usd_price,
            recorded_at: Utc::now(),
        };
        rows.push(row.clone());
        Ok(row)
    }
}

#[derive(Default)]
pub struct FakeMailer {
    pub fail: Mutex<bool>,
    pub sent: Mutex<Vec<SendMailRequest>>,
}

#[async_trait]
impl Mailer for FakeMailer {
    async fn send_mail(&self, mail: &SendMailRequest) -> Result<(), ExternalError> {
        if *self.fail.lock().unwrap() {
            return Err(ExternalError::ApiError("relay refused".to_string()));
        }
        self.sent.lock().unwrap().push(mail.clone());
        Ok(())
    }
}

#[derive(Default, Clone)]
pub struct Fakes {
    pub tickers: Arc<FakeTickers>,
    pub history: Arc<FakeHistory>,
    pub spot: Arc<FakeSpot>,
    pub store: Arc<FakeStore>,
    pub mailer: Arc<FakeMailer>,
}

impl Fakes {
    pub fn with_ticker(self, ticker: &str, live: Ticker) -> Self {
        self.tickers
            .tickers
            .lock()
            .unwrap()
            .insert(ticker.to_string(), live);
        self
    }

    pub fn with_history(self, price: f64) -> Self {
        *self.history.price.lock().unwrap() = Some(price);
        self
    }

    pub fn with_spot(self, asset: Asset, price: f64) -> Self {
        self.spot.prices.lock().unwrap().insert(asset, price);
        self
    }

    pub fn with_stored(self, asset: Asset, price: f64) -> Self {
        let mut rows = self.store.rows.lock().unwrap();
        let id = rows.len() as i64 + 1;
        rows.push(SpotPrice {
            id,
            asset: asset.as_str().to_string(),
            usd_price: price,
            recorded_at: Utc::now(),
        });
        drop(rows);
        self
    }

    pub fn with_failing_mailer(self) -> Self {
        *self.mailer.fail.lock().unwrap() = true;
        self
    }

    pub fn sources(&self) -> Sources {
        Sources {
            tickers: self.tickers.clone(),
            history: self.history.clone(),
            spot: self.spot.clone(),
            store: self.store.clone(),
            mailer: self.mailer.clone(),
        }
    }

    pub fn resolver(&self, seeds: Vec<IcoSeed>) -> IcoResolver {
        IcoResolver::new(seeds, self.sources(), Duration::from_secs(60))
    }
}

pub fn seed(id: &str, ticker: &str, start_date: &str, is_erc20: bool) -> IcoSeed {
    IcoSeed {
        id: id.to_string(),
        ticker: ticker.to_string(),
        name: id.to_string(),
        is_erc20,
        start_date: Some(start_date.to_string()),
        ico_price: Some(1.0),
        ..Default::default()
    }
}

pub fn ticker(price_usd: f64) -> Ticker {
    Ticker {
        price_usd: Some(price_usd),
        ..Default::default()
    }
}
