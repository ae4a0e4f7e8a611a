use std::{cmp::Ordering, fmt, str::FromStr};

use chrono::NaiveDate;

use super::roi::{self, Currency, Period};
use crate::models::NormalizedIco;

/// Column a ranking is sorted by
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortKey {
    Name,
    StartDate,
    IcoPrice,
    CurrentPrice,
    RoiPerDay,
    RoiPerWeek,
    RoiPerMonth,
    RoiSinceIco,
    /// Any other numeric column, compared as-is
    Field(String),
}

impl SortKey {
    pub fn as_str(&self) -> &str {
        match self {
            SortKey::Name => "name",
            SortKey::StartDate => "start_date",
            SortKey::IcoPrice => "ico_price",
            SortKey::CurrentPrice => "current_price",
            SortKey::RoiPerDay => "roi_per_day",
            SortKey::RoiPerWeek => "roi_per_week",
            SortKey::RoiPerMonth => "roi_per_month",
            SortKey::RoiSinceIco => "roi_since_ico",
            SortKey::Field(name) => name,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "name" => SortKey::Name,
            "start_date" => SortKey::StartDate,
            "ico_price" => SortKey::IcoPrice,
            "current_price" => SortKey::CurrentPrice,
            "roi_per_day" => SortKey::RoiPerDay,
            "roi_per_week" => SortKey::RoiPerWeek,
            "roi_per_month" => SortKey::RoiPerMonth,
            "roi_since_ico" => SortKey::RoiSinceIco,
            other => SortKey::Field(other.to_string()),
        })
    }
}

/// What the comparator needs besides the two records
#[derive(Debug, Clone, Copy)]
pub struct SortContext {
    pub currency: Currency,
    pub today: NaiveDate,
}

/// Orders two ICOs for a ranking.
///
/// Numeric columns run high to low unless `ascending`. Name and start date run
/// A to Z / oldest first unless `ascending`, which reverses them. Missing values
/// sit below every present value in both directions' underlying order.
pub fn handle_sort(
    a: &NormalizedIco,
    b: &NormalizedIco,
    sort_by: &SortKey,
    ascending: bool,
    ctx: &SortContext,
) -> Ordering {
    match sort_by {
        SortKey::Name => {
            let ord = a.name.to_lowercase().cmp(&b.name.to_lowercase());
            if ascending {
                ord.reverse()
            } else {
                ord
            }
        }
        SortKey::StartDate => {
            let da = a.start_date.as_deref().and_then(roi::parse_start_date);
            let db = b.start_date.as_deref().and_then(roi::parse_start_date);
            let ord = da.cmp(&db);
            if ascending {
                ord.reverse()
            } else {
                ord
            }
        }
        SortKey::IcoPrice => numeric(
            roi::ico_price(a, ctx.currency),
            roi::ico_price(b, ctx.currency),
            ascending,
        ),
        SortKey::CurrentPrice => numeric(
            roi::current_price(a, ctx.currency),
            roi::current_price(b, ctx.currency),
            ascending,
        ),
        SortKey::RoiPerDay => periodic(a, b, Period::Daily, ascending, ctx),
        SortKey::RoiPerWeek => periodic(a, b, Period::Weekly, ascending, ctx),
        SortKey::RoiPerMonth => periodic(a, b, Period::Monthly, ascending, ctx),
        SortKey::RoiSinceIco => numeric(
            roi::total_roi(a, ctx.currency),
            roi::total_roi(b, ctx.currency),
            ascending,
        ),
        SortKey::Field(name) => numeric(a.numeric_field(name), b.numeric_field(name), ascending),
    }
}

fn periodic(
    a: &NormalizedIco,
    b: &NormalizedIco,
    period: Period,
    ascending: bool,
    ctx: &SortContext,
) -> Ordering {
    let value = |ico: &NormalizedIco| {
        let start = ico.start_date.as_deref().and_then(roi::parse_start_date);
        roi::periodic_roi(roi::total_roi(ico, ctx.currency), start, period, ctx.today)
    };
    numeric(value(a), value(b), ascending)
}

fn numeric(a: Option<f64>, b: Option<f64>, ascending: bool) -> Ordering {
    let ord = match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    };
    if ascending {
        ord
    } else {
        ord.reverse()
    }
}
