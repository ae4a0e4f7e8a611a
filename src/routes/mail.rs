use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use utoipa::OpenApi;

use crate::{
    models::dto::{SendMailRequest, SendMailResponse},
    AppState,
};

#[derive(OpenApi)]
#[openapi(paths(send_mail_handler))]
/// Defines the OpenAPI spec for the contact form endpoint
pub struct MailApi;

/// Used to group mail endpoints together in the OpenAPI documentation
pub const MAIL_API_GROUP: &str = "MAIL";

/// Builds a router for mail routes
pub fn mail_routes() -> Router<Arc<AppState>> {
    Router::new().route("/", post(send_mail_handler))
}

/// Send a contact form message
#[utoipa::path(
    post,
    path = "/api/mail",
    tag = MAIL_API_GROUP,
    request_body = SendMailRequest,
    responses(
        (status = 200, description = "\"success\" or \"failed\"", body = SendMailResponse),
    )
)]
pub async fn send_mail_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SendMailRequest>,
) -> Json<SendMailResponse> {
    let status = state.resolver.send_mail(&body).await;
    Json(SendMailResponse {
        status: status.to_string(),
    })
}
