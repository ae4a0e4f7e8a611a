use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::NormalizedIco;

/// Date format of ICO start dates
pub const START_DATE_FORMAT: &str = "%m/%d/%Y";

/// Display currency for prices and ROI
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Eth,
    Btc,
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Currency::Usd => "USD",
            Currency::Eth => "ETH",
            Currency::Btc => "BTC",
        })
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "ETH" => Ok(Currency::Eth),
            "BTC" => Ok(Currency::Btc),
            other => Err(format!("unknown currency: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
}

impl Period {
    pub fn days(&self) -> f64 {
        match self {
            Period::Daily => 1.0,
            Period::Weekly => 7.0,
            Period::Monthly => 30.0,
        }
    }
}

pub fn parse_start_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), START_DATE_FORMAT).ok()
}

/// `numerator / denominator`, absent unless both are present and the denominator is positive
pub fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    let (n, d) = (numerator?, denominator?);
    if d > 0.0 {
        Some(n / d).filter(|v| v.is_finite())
    } else {
        None
    }
}

/// Fractional change from `from` to `to`
pub fn growth(from: Option<f64>, to: Option<f64>) -> Option<f64> {
    ratio(to, from).map(|r| r - 1.0)
}

pub fn ico_price(ico: &NormalizedIco, currency: Currency) -> Option<f64> {
    match currency {
        Currency::Usd => ico.ico_price,
        Currency::Eth => ico.ico_price_eth,
        Currency::Btc => ico.ico_price_btc,
    }
}

pub fn current_price(ico: &NormalizedIco, currency: Currency) -> Option<f64> {
    match currency {
        Currency::Usd => ico.price_usd,
        Currency::Eth => ico.current_price_eth,
        Currency::Btc => ico.current_price_btc,
    }
}

pub fn total_roi(ico: &NormalizedIco, currency: Currency) -> Option<f64> {
    growth(ico_price(ico, currency), current_price(ico, currency))
}

/// Spreads a total ROI over the periods elapsed since `start`. Under one elapsed day the total is kept.
pub fn periodic_roi(
    roi: Option<f64>,
    start: Option<NaiveDate>,
    period: Period,
    today: NaiveDate,
) -> Option<f64> {
    let roi = roi?;
    let elapsed_days = (today - start?).num_days();
    if elapsed_days < 1 {
        return Some(roi);
    }
    let periods = elapsed_days as f64 / period.days();
    Some(roi / periods)
}
