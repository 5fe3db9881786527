use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EngineVolumeQuery {
    pub engine_volume: Option<f64>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuoteQuery {
    pub service: String,
    pub engine_volume: Option<f64>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpcomingQuery {
    pub limit: Option<usize>,
}

impl UpcomingQuery {
    pub fn normalize(&self, default: usize) -> usize {
        self.limit.unwrap_or(default).clamp(1, 100)
    }
}
