pub mod ico;
pub mod mail;
pub mod message;
pub mod ranking;
pub use ico::*;
pub use mail::*;
pub use message::Message;
pub use ranking::*;

use utoipa::OpenApi;

use crate::{
    models::NormalizedIco,
    ranking::{Currency, Filters, RankingKind},
};

#[derive(OpenApi)]
#[openapi(components(schemas(
    Message,
    NormalizedIco,
    SearchResponse,
    RankingKind,
    Currency,
    Filters,
    RankingResponse,
    SendMailRequest,
    SendMailResponse,
)))]
/// Captures OpenAPI schemas and canned responses defined in the DTO module
pub struct OpenApiSchemas;
