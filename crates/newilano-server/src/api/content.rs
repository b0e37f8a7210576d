use axum::{
    extract::{Query, State},
    Extension, Json,
};
use newilano_core::{Campaign, HeroSlide};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct CampaignQuery {
    /// Absent means every campaign.
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(super) struct HeroSlideQuery {
    #[serde(default = "default_include_defaults")]
    pub include_defaults: bool,
}

fn default_include_defaults() -> bool {
    true
}

pub(super) async fn list_campaigns(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<CampaignQuery>,
) -> Result<Json<ApiResponse<Vec<Campaign>>>, ApiError> {
    let limit = query.limit.map(|l| normalize_limit(Some(l)));
    let campaigns = newilano_db::list_campaigns(&state.pool, limit)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(ApiResponse::new(campaigns, req_id.0))
}

pub(super) async fn list_hero_slides(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<HeroSlideQuery>,
) -> Result<Json<ApiResponse<Vec<HeroSlide>>>, ApiError> {
    let defaults: &[HeroSlide] = if query.include_defaults {
        state.hero_defaults.as_slice()
    } else {
        &[]
    };
    let slides = newilano_db::list_hero_slides(&state.pool, defaults)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(ApiResponse::new(slides, req_id.0))
}
