use axum::{extract::State, Extension, Json};
use newilano_core::BrandSummary;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState};

pub(super) async fn list_brands(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<BrandSummary>>>, ApiError> {
    let brands = newilano_db::list_brands(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = brands
        .into_iter()
        .map(newilano_db::BrandRow::into_summary)
        .collect();

    Ok(ApiResponse::new(data, req_id.0))
}
