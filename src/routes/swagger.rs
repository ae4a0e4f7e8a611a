use crate::models::dto;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(info(
    title = "ICO Stats API",
    description = "ICO rankings and ROI comparisons backed by live market data",
))]
struct Api;

/// Constructs the route on the API that renders the swagger UI and returns the OpenAPI schema.
/// Merges in OpenAPI definitions from other locations in the app, such as the [dto] package
/// and the route submodules
pub fn build_documentation() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api_docs())
}

pub fn api_docs() -> utoipa::openapi::OpenApi {
    let mut api_docs = Api::openapi();
    api_docs.merge(dto::OpenApiSchemas::openapi());
    api_docs.merge(super::health::HealthApi::openapi());
    api_docs.merge(super::ico::IcosApi::openapi());
    api_docs.merge(super::ranking::RankingsApi::openapi());
    api_docs.merge(super::mail::MailApi::openapi());
    api_docs
}
