use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use utoipa::OpenApi;

use crate::{
    models::{
        dto::{RankingQuery, RankingResponse},
        Error,
    },
    ranking::{Currency, Filters, RankingKind, RankingView, SortKey},
    AppState,
};

/// Defines the OpenAPI spec for ranking endpoints
#[derive(OpenApi)]
#[openapi(paths(get_ranking_handler))]
pub struct RankingsApi;

/// Used to group ranking endpoints together in the OpenAPI documentation
pub const RANKING_API_GROUP: &str = "RANKING";

/// Builds a router for ranking routes
pub fn ranking_routes() -> Router<Arc<AppState>> {
    Router::new().route("/:kind", get(get_ranking_handler))
}

/// Applies the query overrides on top of the page's default state
pub fn view_for(kind: &str, query: &RankingQuery) -> Result<RankingView, Error> {
    let mut view = RankingView::new(RankingKind::from_path(kind));

    if let Some(sort_by) = &query.sort_by {
        let sort_by = sort_by.parse::<SortKey>().unwrap_or_else(|never| match never {});
        view.sort(sort_by, query.ascending.unwrap_or(false));
    } else if let Some(ascending) = query.ascending {
        view.ascending = ascending;
    }
    if let Some(currency) = &query.currency {
        let currency = currency
            .parse::<Currency>()
            .map_err(|e| Error::new(StatusCode::BAD_REQUEST, &e))?;
        view.set_currency(currency);
    }
    if let Some(erc20) = query.erc20 {
        view.set_filters(Filters { erc20 });
    }
    Ok(view)
}

/// Get a ranked, filtered ICO list
#[utoipa::path(
    get,
    path = "/api/rankings/{kind}",
    tag = RANKING_API_GROUP,
    params(
        ("kind" = String, Path, description = "roi-since-ico, roi-over-time, vs-eth or vs-btc"),
        RankingQuery
    ),
    responses(
        (status = 200, description = "Ranked ICOs", body = RankingResponse),
        (status = 400, description = "Unknown currency"),
        (status = 502, description = "An upstream price source failed"),
    )
)]
pub async fn get_ranking_handler(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
    Query(query): Query<RankingQuery>,
) -> Result<Json<RankingResponse>, Error> {
    let view = view_for(&kind, &query)?;
    let today = Utc::now().date_naive();
    let icos = state.resolver.icos_at(today).await?;
    Ok(Json(RankingResponse::new(&view, view.apply(&icos, today))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_the_kind() {
        let view = view_for("roi-over-time", &RankingQuery::default()).unwrap();
        assert_eq!(view.sort_by, SortKey::RoiPerMonth);
        assert!(!view.ascending);
        assert!(view.filters.erc20);
    }

    #[test]
    fn test_overrides_are_applied() {
        let query = RankingQuery {
            sort_by: Some("name".to_string()),
            ascending: Some(true),
            currency: Some("eth".to_string()),
            erc20: Some(false),
        };
        let view = view_for("roi-over-time", &query).unwrap();

        assert_eq!(view.kind, RankingKind::RoiOverTime);
        assert_eq!(view.sort_by, SortKey::Name);
        assert!(view.ascending);
        assert_eq!(view.currency, Currency::Eth);
        assert!(!view.filters.erc20);
    }

    #[test]
    fn test_direction_alone_keeps_default_column() {
        let query = RankingQuery {
            ascending: Some(true),
            ..Default::default()
        };
        let view = view_for("vs-eth", &query).unwrap();
        assert_eq!(view.sort_by.as_str(), "roi_vs_eth");
        assert!(view.ascending);
    }

    #[test]
    fn test_currency_ignored_on_comparison_pages() {
        let query = RankingQuery {
            currency: Some("BTC".to_string()),
            ..Default::default()
        };
        let view = view_for("vs-eth", &query).unwrap();
        assert_eq!(view.currency, Currency::Usd);
    }

    #[test]
    fn test_unknown_currency_is_rejected() {
        let query = RankingQuery {
            currency: Some("EUR".to_string()),
            ..Default::default()
        };
        let err = view_for("roi-since-ico", &query).unwrap_err();
        assert_eq!(err.code, StatusCode::BAD_REQUEST);
    }
}
