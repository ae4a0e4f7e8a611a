use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct SendMailRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SendMailResponse {
    #[schema(example = "success")]
    pub status: String,
}
