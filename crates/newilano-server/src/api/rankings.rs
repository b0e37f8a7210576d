//! Ranked product lists.
//!
//! - `GET /api/v1/products/most-favorited`
//! - `GET /api/v1/products/trending`
//! - `GET /api/v1/products/{slug}/recommendations`

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use newilano_core::Product;

use crate::middleware::RequestId;

use super::products::LimitQuery;
use super::{map_db_error, normalize_ranking_limit, ApiError, ApiResponse, AppState};

pub(super) async fn most_favorited(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<ApiResponse<Vec<Product>>>, ApiError> {
    let products = state
        .ranking()
        .most_favorited_products(normalize_ranking_limit(query.limit))
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(ApiResponse::new(products, req_id.0))
}

pub(super) async fn trending(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<ApiResponse<Vec<Product>>>, ApiError> {
    let products = state
        .ranking()
        .trending_products(normalize_ranking_limit(query.limit))
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(ApiResponse::new(products, req_id.0))
}

/// Unknown slugs answer with an empty list rather than 404, matching the
/// product page which renders the rail regardless.
pub(super) async fn recommendations(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(slug): Path<String>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<ApiResponse<Vec<Product>>>, ApiError> {
    let products = state
        .ranking()
        .recommendations(&slug, normalize_ranking_limit(query.limit))
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(ApiResponse::new(products, req_id.0))
}
