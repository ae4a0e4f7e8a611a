pub mod sources;
#[cfg(test)]
pub mod testing;

use std::{fmt, sync::Arc, time::Duration};

use chrono::{NaiveDate, Utc};
use futures::future::try_join_all;
use moka::future::Cache;
use tracing::{debug, info, warn};

use crate::models::{
    dto::SendMailRequest, Asset, ExternalError, IcoRecord, IcoSeed, NormalizedIco, SpotPrices,
};
pub use sources::{HistoricalPriceSource, Mailer, PriceStore, SpotPriceSource, TickerSource};

/// GDAX has no ETH history before this day
pub fn gdax_history_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2016, 5, 25).unwrap_or(NaiveDate::MIN)
}

pub const MAIL_SUCCESS: &str = "success";
pub const MAIL_FAILED: &str = "failed";

#[derive(Debug)]
pub enum ResolverError {
    UnknownIco(String),
    Ticker { id: String, source: ExternalError },
    History { id: String, source: ExternalError },
    SpotPriceUnavailable { asset: Asset, source: ExternalError },
    Store(sqlx::Error),
}

impl fmt::Display for ResolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolverError::UnknownIco(id) => write!(f, "No ticker found for {}", id),
            ResolverError::Ticker { id, source } => {
                write!(f, "Failed to fetch ticker for {}: {}", id, source)
            }
            ResolverError::History { id, source } => {
                write!(f, "Failed to fetch ETH price at launch for {}: {}", id, source)
            }
            ResolverError::SpotPriceUnavailable { asset, source } => write!(
                f,
                "No {} spot price available (live fetch failed: {}, nothing persisted)",
                asset, source
            ),
            ResolverError::Store(e) => write!(f, "Price store error: {}", e),
        }
    }
}

impl std::error::Error for ResolverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResolverError::Ticker { source, .. }
            | ResolverError::History { source, .. }
            | ResolverError::SpotPriceUnavailable { source, .. } => Some(source),
            ResolverError::Store(e) => Some(e),
            ResolverError::UnknownIco(_) => None,
        }
    }
}

/// Collaborators the resolver aggregates
#[derive(Clone)]
pub struct Sources {
    pub tickers: Arc<dyn TickerSource>,
    pub history: Arc<dyn HistoricalPriceSource>,
    pub spot: Arc<dyn SpotPriceSource>,
    pub store: Arc<dyn PriceStore>,
    pub mailer: Arc<dyn Mailer>,
}

/// Answers the `icos`, `ico(id)` and `sendMail` operations
pub struct IcoResolver {
    seeds: Arc<Vec<IcoSeed>>,
    sources: Sources,
    spot_cache: Cache<Asset, f64>,
}

impl IcoResolver {
    pub fn new(seeds: Vec<IcoSeed>, sources: Sources, spot_cache_ttl: Duration) -> Self {
        let spot_cache = Cache::builder()
            .max_capacity(Asset::ALL.len() as u64)
            .time_to_live(spot_cache_ttl)
            .build();

        IcoResolver {
            seeds: Arc::new(seeds),
            sources,
            spot_cache,
        }
    }

    pub fn seeds(&self) -> &[IcoSeed] {
        &self.seeds
    }

    /// Every tracked ICO, normalized against the current ETH and BTC prices.
    /// One failing ticker fetch fails the whole list.
    pub async fn icos(&self) -> Result<Vec<NormalizedIco>, ResolverError> {
        self.icos_at(Utc::now().date_naive()).await
    }

    pub async fn icos_at(&self, today: NaiveDate) -> Result<Vec<NormalizedIco>, ResolverError> {
        let records = try_join_all(self.seeds.iter().map(|seed| self.fetch_record(seed))).await?;

        let spot = SpotPrices {
            eth: self.spot_price(Asset::Eth).await?,
            btc: self.spot_price(Asset::Btc).await?,
        };

        Ok(records
            .into_iter()
            .map(|record| NormalizedIco::normalize(record, Some(spot), today))
            .collect())
    }

    /// A single ICO straight from the ticker: no spot prices, no cache, no fallback
    pub async fn ico(&self, id: &str) -> Result<NormalizedIco, ResolverError> {
        let seed = self.seeds.iter().find(|seed| seed.id == id);
        let ticker = seed.map_or(id, |seed| seed.ticker.as_str());

        let live = self
            .sources
            .tickers
            .fetch_ticker(ticker)
            .await
            .map_err(|source| match source {
                ExternalError::NotFound(_) => ResolverError::UnknownIco(id.to_string()),
                source => ResolverError::Ticker {
                    id: id.to_string(),
                    source,
                },
            })?;

        let record = match seed {
            Some(seed) => IcoRecord::merge(seed, live, None),
            None => IcoRecord::from_ticker(id, live),
        };
        Ok(NormalizedIco::normalize(record, None, Utc::now().date_naive()))
    }

    async fn fetch_record(&self, seed: &IcoSeed) -> Result<IcoRecord, ResolverError> {
        let live = self
            .sources
            .tickers
            .fetch_ticker(&seed.ticker)
            .await
            .map_err(|source| ResolverError::Ticker {
                id: seed.id.clone(),
                source,
            })?;

        let mut eth_price_at_launch = None;
        if seed.eth_price_at_launch.is_none() {
            if let Some(start) = seed.start_date().filter(|d| *d > gdax_history_start()) {
                let price = self
                    .sources
                    .history
                    .eth_price_at(start)
                    .await
                    .map_err(|source| ResolverError::History {
                        id: seed.id.clone(),
                        source,
                    })?;
                info!("Fetched eth price at launch for {}", seed.name);
                eth_price_at_launch = Some(price);
            }
        }

        Ok(IcoRecord::merge(seed, live, eth_price_at_launch))
    }

    /// Read-through cached spot price, falling back to the latest persisted value when the live fetch fails.
    /// Only live prices are cached.
    pub async fn spot_price(&self, asset: Asset) -> Result<f64, ResolverError> {
        if let Some(price) = self.spot_cache.get(&asset).await {
            debug!("Using cached {} price ({})", asset, price);
            return Ok(price);
        }

        match self.sources.spot.current_price(asset).await {
            Ok(price) => {
                self.spot_cache.insert(asset, price).await;
                Ok(price)
            }
            Err(source) => {
                warn!("Live {} price fetch failed: {}", asset, source);
                // fallback values are never cached, the next request retries the live source
                let latest = self
                    .sources
                    .store
                    .latest_price(asset)
                    .await
                    .map_err(ResolverError::Store)?;
                match latest {
                    Some(latest) => {
                        info!("Fetched fallback {} price ({}) from db.", asset, latest.usd_price);
                        Ok(latest.usd_price)
                    }
                    None => Err(ResolverError::SpotPriceUnavailable { asset, source }),
                }
            }
        }
    }

    /// Relays a contact form message. Answers `"success"` or `"failed"`.
    pub async fn send_mail(&self, mail: &SendMailRequest) -> &'static str {
        if !is_valid_mail(mail) {
            warn!("Rejected contact message with missing fields");
            return MAIL_FAILED;
        }
        match self.sources.mailer.send_mail(mail).await {
            Ok(()) => {
                info!("Relayed contact message from {}", mail.email);
                MAIL_SUCCESS
            }
            Err(e) => {
                warn!("Failed to relay contact message: {}", e);
                MAIL_FAILED
            }
        }
    }
}

fn is_valid_mail(mail: &SendMailRequest) -> bool {
    !mail.name.trim().is_empty()
        && !mail.message.trim().is_empty()
        && mail.email.trim().contains('@')
}
