use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use tracing::info;
use utoipa::OpenApi;

use crate::{
    models::{
        dto::{CompareQuery, SearchQuery, SearchResponse},
        Error, NormalizedIco,
    },
    ranking::search,
    AppState,
};

/// Defines the OpenAPI spec for ICO endpoints
#[derive(OpenApi)]
#[openapi(paths(
    get_icos_handler,
    get_ico_handler,
    search_icos_handler,
    compare_icos_handler
))]
pub struct IcosApi;

/// Used to group ICO endpoints together in the OpenAPI documentation
pub const ICO_API_GROUP: &str = "ICO";

/// Builds a router for ICO routes
pub fn ico_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(get_icos_handler))
        .route("/:id", get(get_ico_handler))
}

/// List every tracked ICO
#[utoipa::path(
    get,
    path = "/api/icos",
    tag = ICO_API_GROUP,
    responses(
        (status = 200, description = "Normalized ICOs", body = [NormalizedIco]),
        (status = 502, description = "An upstream price source failed"),
    )
)]
pub async fn get_icos_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<NormalizedIco>>, Error> {
    let icos = state.resolver.icos().await?;
    info!("Resolved {} ICOs", icos.len());
    Ok(Json(icos))
}

/// Get a single ICO by id
#[utoipa::path(
    get,
    path = "/api/icos/{id}",
    tag = ICO_API_GROUP,
    params(
        ("id" = String, Path, description = "Tracked ICO id or CoinMarketCap ticker")
    ),
    responses(
        (status = 200, description = "ICO successfully fetched", body = NormalizedIco),
        (status = 404, description = "Unknown ticker"),
        (status = 502, description = "The ticker source failed"),
    )
)]
pub async fn get_ico_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<NormalizedIco>, Error> {
    Ok(Json(state.resolver.ico(&id).await?))
}

/// Autocomplete an ICO name for the compare selector
#[utoipa::path(
    get,
    path = "/api/search",
    tag = ICO_API_GROUP,
    params(SearchQuery),
    responses(
        (status = 200, description = "First matching name and its id, if any", body = SearchResponse),
    )
)]
pub async fn search_icos_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Json<SearchResponse> {
    let seeds = state.resolver.seeds();
    let found = search(seeds.iter().map(|seed| seed.name.as_str()), &query.q);
    Json(SearchResponse {
        id: found.as_ref().map(|(index, _)| seeds[*index].id.clone()),
        result: found.map(|(_, name)| name),
    })
}

/// Get the ICOs picked in the compare selector, in the order given
#[utoipa::path(
    get,
    path = "/api/compare",
    tag = ICO_API_GROUP,
    params(CompareQuery),
    responses(
        (status = 200, description = "Selected ICOs", body = [NormalizedIco]),
        (status = 502, description = "An upstream price source failed"),
    )
)]
pub async fn compare_icos_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CompareQuery>,
) -> Result<Json<Vec<NormalizedIco>>, Error> {
    let ids = query.ids();
    if ids.is_empty() {
        return Ok(Json(Vec::new()));
    }
    let icos = state.resolver.icos().await?;
    let selected = ids
        .iter()
        .filter_map(|id| icos.iter().find(|ico| ico.id == *id).cloned())
        .collect();
    Ok(Json(selected))
}
