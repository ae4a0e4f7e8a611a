use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    models::NormalizedIco,
    ranking::{Currency, Filters, RankingKind, RankingView},
};

/// Overrides of the ranking page's default state
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RankingQuery {
    pub sort_by: Option<String>,
    pub ascending: Option<bool>,
    /// USD, ETH or BTC. Ignored by vs-eth and vs-btc.
    pub currency: Option<String>,
    /// Only list ERC-20 tokens (defaults to true)
    pub erc20: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RankingResponse {
    pub kind: RankingKind,
    pub title: String,
    pub sort_by: String,
    pub ascending: bool,
    pub currency: Currency,
    pub filters: Filters,
    pub show_currency_picker: bool,
    pub icos: Vec<NormalizedIco>,
}

impl RankingResponse {
    pub fn new(view: &RankingView, icos: Vec<NormalizedIco>) -> Self {
        Self {
            kind: view.kind,
            title: view.kind.title().to_string(),
            sort_by: view.sort_by.to_string(),
            ascending: view.ascending,
            currency: view.currency,
            filters: view.filters,
            show_currency_picker: view.kind.shows_currency_picker(),
            icos,
        }
    }
}
