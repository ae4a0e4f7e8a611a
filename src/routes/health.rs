use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tracing::error;
use utoipa::OpenApi;

use crate::{
    models::{dto::Message, Error},
    AppState,
};

#[derive(OpenApi)]
#[openapi(paths(health_checker_handler))]
/// Defines the OpenAPI spec for health endpoints
pub struct HealthApi;

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "HEALTH",
    responses(
        (status = OK, description = "Success", body = Message),
        (status = SERVICE_UNAVAILABLE, description = "Database unreachable", body = Message)
    )
)]
pub async fn health_checker_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, Error> {
    state.db.ping().await.map_err(|e| {
        error!("Health check failed: {}", e);
        Error::new(StatusCode::SERVICE_UNAVAILABLE, "Database unreachable")
    })?;
    Ok(Json(Message::new("OK, I'm alive!")))
}
