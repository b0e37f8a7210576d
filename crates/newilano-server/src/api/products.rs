use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use newilano_core::{facet_values, filter_catalog, CatalogFilter, Facets, Product, SearchHit};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct CatalogQuery {
    pub category: Option<String>,
    pub brand: Option<String>,
    pub search: Option<String>,
}

/// Browse view payload. Facets cover the whole catalog so the filter chips
/// stay stable while a filter is applied.
#[derive(Debug, Serialize)]
pub(super) struct CatalogListing {
    products: Vec<Product>,
    facets: Facets,
}

#[derive(Debug, Deserialize)]
pub(super) struct LimitQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SearchQuery {
    #[serde(default)]
    pub q: String,
    pub limit: Option<i64>,
}

pub(super) async fn list_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<ApiResponse<CatalogListing>>, ApiError> {
    let catalog = newilano_db::list_products(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let filter = CatalogFilter::from_query(query.category, query.brand, query.search);
    let facets = facet_values(&catalog);
    let products = if filter.is_empty() {
        catalog
    } else {
        filter_catalog(&catalog, &filter)
    };

    Ok(ApiResponse::new(CatalogListing { products, facets }, req_id.0))
}

pub(super) async fn list_new_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<ApiResponse<Vec<Product>>>, ApiError> {
    let products = newilano_db::list_new_products(&state.pool, normalize_limit(query.limit))
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(ApiResponse::new(products, req_id.0))
}

pub(super) async fn search_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<SearchHit>>>, ApiError> {
    let hits = newilano_db::search_products(&state.pool, &query.q, normalize_limit(query.limit))
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(ApiResponse::new(hits, req_id.0))
}

pub(super) async fn get_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<Product>>, ApiError> {
    let product = newilano_db::get_product_by_slug(&state.pool, &slug)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| {
            ApiError::new(
                req_id.0.clone(),
                "not_found",
                format!("product '{slug}' not found"),
            )
        })?;

    Ok(ApiResponse::new(product, req_id.0))
}
