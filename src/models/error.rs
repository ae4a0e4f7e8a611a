use core::fmt;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;

use super::dto::Message;
use crate::resolver::ResolverError;

#[derive(Debug)]
pub struct Error {
    pub code: StatusCode,
    pub body: Json<Message>,
}

impl Error {
    pub fn new(code: StatusCode, message: &str) -> Self {
        Self {
            code,
            body: Json(Message::new(message)),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (self.code, self.body).into_response()
    }
}

impl From<(StatusCode, &str)> for Error {
    fn from((code, msg): (StatusCode, &str)) -> Self {
        Self::new(code, msg)
    }
}

impl From<sqlx::error::Error> for Error {
    fn from(error: sqlx::error::Error) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, &error.to_string())
    }
}

impl From<ResolverError> for Error {
    fn from(error: ResolverError) -> Self {
        let code = match &error {
            ResolverError::UnknownIco(_) => StatusCode::NOT_FOUND,
            ResolverError::Ticker { .. }
            | ResolverError::History { .. }
            | ResolverError::SpotPriceUnavailable { .. } => StatusCode::BAD_GATEWAY,
            ResolverError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(code, &error.to_string())
    }
}

/// Failure talking to one of the upstream price or mail services
#[derive(Debug)]
pub enum ExternalError {
    ReqwestError(reqwest::Error),
    JsonError(serde_json::Error),
    ApiError(String),
    NotFound(String),
}

impl fmt::Display for ExternalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExternalError::ReqwestError(e) => write!(f, "Reqwest error: {}", e),
            ExternalError::JsonError(e) => write!(f, "JSON error: {}", e),
            ExternalError::ApiError(e) => write!(f, "API error: {}", e),
            ExternalError::NotFound(e) => write!(f, "Not found: {}", e),
        }
    }
}

impl std::error::Error for ExternalError {}

impl From<reqwest::Error> for ExternalError {
    fn from(error: reqwest::Error) -> Self {
        ExternalError::ReqwestError(error)
    }
}

impl From<serde_json::Error> for ExternalError {
    fn from(error: serde_json::Error) -> Self {
        ExternalError::JsonError(error)
    }
}
