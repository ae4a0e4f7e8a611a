use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{SpotPrices, Ticker};
use crate::ranking::roi::{self, Currency, Period};

/// Static metadata for a tracked ICO
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
pub struct IcoSeed {
    pub id: String,
    /// CoinMarketCap slug used for the ticker lookup
    pub ticker: String,
    pub name: String,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub is_erc20: bool,
    /// `MM/DD/YYYY`
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub ico_price: Option<f64>,
    #[serde(default)]
    pub eth_price_at_launch: Option<f64>,
    #[serde(default)]
    pub btc_price_at_launch: Option<f64>,
}

impl IcoSeed {
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date.as_deref().and_then(roi::parse_start_date)
    }
}

/// A seed merged with the live ticker for one request
#[derive(Debug, Default, Clone, PartialEq)]
pub struct IcoRecord {
    pub id: String,
    pub ticker: String,
    pub name: String,
    pub symbol: Option<String>,
    pub is_erc20: bool,
    pub start_date: Option<String>,
    pub ico_price: Option<f64>,
    pub eth_price_at_launch: Option<f64>,
    pub btc_price_at_launch: Option<f64>,
    pub live: Ticker,
}

impl IcoRecord {
    /// Live values override the seed, except for the id. A backfilled ETH launch price wins over the seed's.
    pub fn merge(seed: &IcoSeed, live: Ticker, eth_price_at_launch: Option<f64>) -> Self {
        IcoRecord {
            id: seed.id.clone(),
            ticker: seed.ticker.clone(),
            name: live.name.clone().unwrap_or_else(|| seed.name.clone()),
            symbol: live.symbol.clone().or_else(|| seed.symbol.clone()),
            is_erc20: seed.is_erc20,
            start_date: seed.start_date.clone(),
            ico_price: seed.ico_price,
            eth_price_at_launch: eth_price_at_launch.or(seed.eth_price_at_launch),
            btc_price_at_launch: seed.btc_price_at_launch,
            live,
        }
    }

    /// A record for an untracked ticker, built from live data only
    pub fn from_ticker(id: &str, live: Ticker) -> Self {
        IcoRecord {
            id: id.to_string(),
            ticker: live.id.clone().unwrap_or_else(|| id.to_string()),
            name: live.name.clone().unwrap_or_else(|| id.to_string()),
            symbol: live.symbol.clone(),
            live,
            ..Default::default()
        }
    }
}

/// An ICO with live market data and derived ROI fields. ROI values are fractions (0.5 = +50%).
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct NormalizedIco {
    pub id: String,
    pub ticker: String,
    pub name: String,
    pub symbol: Option<String>,
    pub rank: Option<f64>,
    pub is_erc20: bool,
    #[schema(example = "06/20/2017")]
    pub start_date: Option<String>,
    pub ico_price: Option<f64>,
    pub price_usd: Option<f64>,
    pub price_btc: Option<f64>,
    pub volume_usd_24h: Option<f64>,
    pub market_cap_usd: Option<f64>,
    pub available_supply: Option<f64>,
    pub total_supply: Option<f64>,
    pub percent_change_1h: Option<f64>,
    pub percent_change_24h: Option<f64>,
    pub percent_change_7d: Option<f64>,
    pub last_updated: Option<f64>,
    pub eth_price_at_launch: Option<f64>,
    pub btc_price_at_launch: Option<f64>,
    /// ETH spot price the record was normalized against
    pub eth_price: Option<f64>,
    /// BTC spot price the record was normalized against
    pub btc_price: Option<f64>,
    pub ico_price_eth: Option<f64>,
    pub ico_price_btc: Option<f64>,
    pub current_price_eth: Option<f64>,
    pub current_price_btc: Option<f64>,
    pub roi_since_ico: Option<f64>,
    pub roi_since_ico_eth: Option<f64>,
    pub roi_since_ico_btc: Option<f64>,
    pub eth_roi_during_period: Option<f64>,
    pub btc_roi_during_period: Option<f64>,
    pub roi_vs_eth: Option<f64>,
    pub roi_vs_btc: Option<f64>,
    pub roi_per_day: Option<f64>,
    pub roi_per_week: Option<f64>,
    pub roi_per_month: Option<f64>,
}

impl NormalizedIco {
    pub fn normalize(record: IcoRecord, spot: Option<SpotPrices>, today: NaiveDate) -> Self {
        let live = record.live;
        let mut ico = NormalizedIco {
            id: record.id,
            ticker: record.ticker,
            name: record.name,
            symbol: record.symbol,
            rank: live.rank,
            is_erc20: record.is_erc20,
            start_date: record.start_date,
            ico_price: record.ico_price,
            price_usd: live.price_usd,
            price_btc: live.price_btc,
            volume_usd_24h: live.volume_usd_24h,
            market_cap_usd: live.market_cap_usd,
            available_supply: live.available_supply,
            total_supply: live.total_supply,
            percent_change_1h: live.percent_change_1h,
            percent_change_24h: live.percent_change_24h,
            percent_change_7d: live.percent_change_7d,
            last_updated: live.last_updated,
            eth_price_at_launch: record.eth_price_at_launch,
            btc_price_at_launch: record.btc_price_at_launch,
            eth_price: spot.map(|s| s.eth),
            btc_price: spot.map(|s| s.btc),
            ..Default::default()
        };

        ico.ico_price_eth = roi::ratio(ico.ico_price, ico.eth_price_at_launch);
        ico.ico_price_btc = roi::ratio(ico.ico_price, ico.btc_price_at_launch);
        ico.current_price_eth = roi::ratio(ico.price_usd, ico.eth_price);
        ico.current_price_btc = ico
            .price_btc
            .or_else(|| roi::ratio(ico.price_usd, ico.btc_price));

        ico.roi_since_ico = roi::total_roi(&ico, Currency::Usd);
        ico.roi_since_ico_eth = roi::total_roi(&ico, Currency::Eth);
        ico.roi_since_ico_btc = roi::total_roi(&ico, Currency::Btc);

        ico.eth_roi_during_period = roi::growth(ico.eth_price_at_launch, ico.eth_price);
        ico.btc_roi_during_period = roi::growth(ico.btc_price_at_launch, ico.btc_price);
        ico.roi_vs_eth = difference(ico.roi_since_ico, ico.eth_roi_during_period);
        ico.roi_vs_btc = difference(ico.roi_since_ico, ico.btc_roi_during_period);

        let start = ico.start_date.as_deref().and_then(roi::parse_start_date);
        ico.roi_per_day = roi::periodic_roi(ico.roi_since_ico, start, Period::Daily, today);
        ico.roi_per_week = roi::periodic_roi(ico.roi_since_ico, start, Period::Weekly, today);
        ico.roi_per_month = roi::periodic_roi(ico.roi_since_ico, start, Period::Monthly, today);

        ico
    }

    /// Looks up a numeric column by its wire name
    pub fn numeric_field(&self, name: &str) -> Option<f64> {
        match name {
            "rank" => self.rank,
            "ico_price" => self.ico_price,
            "price_usd" => self.price_usd,
            "price_btc" => self.price_btc,
            "volume_usd_24h" | "24h_volume_usd" => self.volume_usd_24h,
            "market_cap_usd" => self.market_cap_usd,
            "available_supply" => self.available_supply,
            "total_supply" => self.total_supply,
            "percent_change_1h" => self.percent_change_1h,
            "percent_change_24h" => self.percent_change_24h,
            "percent_change_7d" => self.percent_change_7d,
            "eth_price_at_launch" => self.eth_price_at_launch,
            "btc_price_at_launch" => self.btc_price_at_launch,
            "ico_price_eth" => self.ico_price_eth,
            "ico_price_btc" => self.ico_price_btc,
            "current_price_eth" => self.current_price_eth,
            "current_price_btc" => self.current_price_btc,
            "roi_since_ico" => self.roi_since_ico,
            "roi_since_ico_eth" => self.roi_since_ico_eth,
            "roi_since_ico_btc" => self.roi_since_ico_btc,
            "eth_roi_during_period" => self.eth_roi_during_period,
            "btc_roi_during_period" => self.btc_roi_during_period,
            "roi_vs_eth" => self.roi_vs_eth,
            "roi_vs_btc" => self.roi_vs_btc,
            "roi_per_day" => self.roi_per_day,
            "roi_per_week" => self.roi_per_week,
            "roi_per_month" => self.roi_per_month,
            _ => None,
        }
    }
}

fn difference(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    Some(a? - b?)
}
