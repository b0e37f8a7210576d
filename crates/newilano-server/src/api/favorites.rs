//! Per-user favorites. Mounted behind bearer auth; the session layer in
//! front of the API resolves the signed-in user to `user_id`.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use newilano_core::Product;
use serde::Serialize;
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(super) struct FavoriteChangeItem {
    slug: String,
    change: &'static str,
}

pub(super) async fn list_favorites(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<Product>>>, ApiError> {
    let products = newilano_db::list_user_favorites(&state.pool, user_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(ApiResponse::new(products, req_id.0))
}

pub(super) async fn add_favorite(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((user_id, slug)): Path<(Uuid, String)>,
) -> Result<Json<ApiResponse<FavoriteChangeItem>>, ApiError> {
    let change = newilano_db::add_favorite(&state.pool, user_id, &slug)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(ApiResponse::new(
        FavoriteChangeItem {
            slug,
            change: change.as_str(),
        },
        req_id.0,
    ))
}

pub(super) async fn remove_favorite(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((user_id, slug)): Path<(Uuid, String)>,
) -> Result<Json<ApiResponse<FavoriteChangeItem>>, ApiError> {
    let change = newilano_db::remove_favorite(&state.pool, user_id, &slug)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(ApiResponse::new(
        FavoriteChangeItem {
            slug,
            change: change.as_str(),
        },
        req_id.0,
    ))
}
