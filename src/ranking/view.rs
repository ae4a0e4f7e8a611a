use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{handle_sort, Currency, SortContext, SortKey};
use crate::models::NormalizedIco;

/// The four ranking pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum RankingKind {
    RoiSinceIco,
    RoiOverTime,
    VsEth,
    VsBtc,
}

impl RankingKind {
    /// Resolves the ranking from a page path; unknown paths get the total ROI ranking
    pub fn from_path(path: &str) -> Self {
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };
        if path.starts_with("/roi-over-time") {
            RankingKind::RoiOverTime
        } else if path.starts_with("/vs-eth") {
            RankingKind::VsEth
        } else if path.starts_with("/vs-btc") {
            RankingKind::VsBtc
        } else {
            RankingKind::RoiSinceIco
        }
    }

    pub fn default_sort(&self) -> SortKey {
        match self {
            RankingKind::RoiOverTime => SortKey::RoiPerMonth,
            RankingKind::VsEth => SortKey::Field("roi_vs_eth".to_string()),
            RankingKind::VsBtc => SortKey::Field("roi_vs_btc".to_string()),
            RankingKind::RoiSinceIco => SortKey::RoiSinceIco,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            RankingKind::RoiOverTime => "ROI Over Time",
            RankingKind::VsEth => "Compare Performance to Ethereum",
            RankingKind::VsBtc => "Compare Performance to Bitcoin",
            RankingKind::RoiSinceIco => "ROI Since ICO",
        }
    }

    /// The ETH/BTC comparisons are always shown in USD terms
    pub fn shows_currency_picker(&self) -> bool {
        !matches!(self, RankingKind::VsEth | RankingKind::VsBtc)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct Filters {
    /// Only list ERC-20 tokens
    pub erc20: bool,
}

impl Default for Filters {
    fn default() -> Self {
        Filters { erc20: true }
    }
}

impl Filters {
    pub fn admits(&self, ico: &NormalizedIco) -> bool {
        !(self.erc20 && !ico.is_erc20)
    }
}

/// Sort and filter state of one ranking page
#[derive(Debug, Clone, PartialEq)]
pub struct RankingView {
    pub kind: RankingKind,
    pub sort_by: SortKey,
    pub ascending: bool,
    pub filters: Filters,
    pub currency: Currency,
}

impl RankingView {
    pub fn new(kind: RankingKind) -> Self {
        RankingView {
            kind,
            sort_by: kind.default_sort(),
            ascending: false,
            filters: Filters::default(),
            currency: Currency::Usd,
        }
    }

    pub fn sort(&mut self, sort_by: SortKey, ascending: bool) {
        self.sort_by = sort_by;
        self.ascending = ascending;
    }

    /// Clicking the active column flips its direction, any other column starts descending
    pub fn click_header(&mut self, sort_by: SortKey) {
        if self.sort_by == sort_by {
            self.ascending = !self.ascending;
        } else {
            self.sort(sort_by, false);
        }
    }

    /// Ignored on pages without a currency picker, which always show USD
    pub fn set_currency(&mut self, currency: Currency) {
        if self.kind.shows_currency_picker() {
            self.currency = currency;
        }
    }

    pub fn set_filters(&mut self, filters: Filters) {
        self.filters = filters;
    }

    /// Filters then stable-sorts a copy of `icos`
    pub fn apply(&self, icos: &[NormalizedIco], today: NaiveDate) -> Vec<NormalizedIco> {
        let ctx = SortContext {
            currency: self.currency,
            today,
        };
        let mut ranked: Vec<NormalizedIco> = icos
            .iter()
            .filter(|ico| self.filters.admits(ico))
            .cloned()
            .collect();
        ranked.sort_by(|a, b| handle_sort(a, b, &self.sort_by, self.ascending, &ctx));
        ranked
    }
}
