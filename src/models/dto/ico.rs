use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// What the user typed so far
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SearchResponse {
    /// Lowercased name of the first ICO starting with the query
    pub result: Option<String>,
    /// Id of that ICO, as accepted by `/api/compare`
    pub id: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CompareQuery {
    /// Comma separated ICO ids
    #[serde(default)]
    pub ids: String,
}

impl CompareQuery {
    pub fn ids(&self) -> Vec<&str> {
        self.ids
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .collect()
    }
}
