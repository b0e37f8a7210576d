//! Admin catalog writes.
//!
//! - `POST /api/v1/admin/products`         create a product (slug from name)
//! - `PUT  /api/v1/admin/products/{slug}`  replace a product's fields
//! - `POST /api/v1/admin/hero-slides`      add a hero slide
//! - `GET  /api/v1/admin/overview`         catalog totals and per-brand product counts

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use newilano_core::{DraftError, HeroSlide, HeroSlideDraft, Product, ProductDraft};
use newilano_db::CatalogOverview;
use serde::Serialize;
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(super) struct CreatedHeroSlide {
    id: Uuid,
    sort_order: i32,
    slide: HeroSlide,
}

fn validation_error(request_id: &str, error: &DraftError) -> ApiError {
    ApiError::new(request_id, "validation_error", error.to_string())
}

/// Resolves the draft's brand to its display name, 400 when unknown.
async fn resolve_brand_name(
    state: &AppState,
    draft: &ProductDraft,
    request_id: &str,
) -> Result<String, ApiError> {
    let brand_id = draft
        .brand_id
        .ok_or_else(|| validation_error(request_id, &DraftError::MissingField("brand_id")))?;

    let brand = newilano_db::get_brand_by_id(&state.pool, brand_id)
        .await
        .map_err(|e| map_db_error(request_id.to_owned(), &e))?
        .ok_or_else(|| {
            ApiError::new(
                request_id,
                "validation_error",
                format!("brand '{brand_id}' not found"),
            )
        })?;

    Ok(brand.name)
}

pub(super) async fn create_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(draft): Json<ProductDraft>,
) -> Result<(StatusCode, Json<ApiResponse<Product>>), ApiError> {
    let slug = draft.slug().map_err(|e| validation_error(&req_id.0, &e))?;
    let brand_name = resolve_brand_name(&state, &draft, &req_id.0).await?;
    let mut product = draft
        .into_product(slug, brand_name, Utc::now())
        .map_err(|e| validation_error(&req_id.0, &e))?;

    product.id = match newilano_db::insert_product(&state.pool, &product).await {
        Ok(id) => id,
        Err(newilano_db::DbError::Conflict) => {
            return Err(ApiError::new(
                req_id.0,
                "conflict",
                format!("product '{}' already exists", product.slug),
            ));
        }
        Err(e) => return Err(map_db_error(req_id.0, &e)),
    };

    tracing::info!(slug = %product.slug, "product created");
    Ok((StatusCode::CREATED, ApiResponse::new(product, req_id.0)))
}

pub(super) async fn update_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(slug): Path<String>,
    Json(draft): Json<ProductDraft>,
) -> Result<Json<ApiResponse<Product>>, ApiError> {
    let existing = newilano_db::get_product_by_slug(&state.pool, &slug)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| {
            ApiError::new(
                req_id.0.clone(),
                "not_found",
                format!("product '{slug}' not found"),
            )
        })?;

    let brand_name = resolve_brand_name(&state, &draft, &req_id.0).await?;
    // The slug stays fixed even when the name changes.
    let mut product = draft
        .into_product(existing.slug, brand_name, existing.created_at)
        .map_err(|e| validation_error(&req_id.0, &e))?;

    product.id = newilano_db::upsert_product(&state.pool, &product)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    tracing::info!(slug = %product.slug, "product updated");
    Ok(ApiResponse::new(product, req_id.0))
}

pub(super) async fn create_hero_slide(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(draft): Json<HeroSlideDraft>,
) -> Result<(StatusCode, Json<ApiResponse<CreatedHeroSlide>>), ApiError> {
    let (mut slide, sort_order) = draft
        .into_slide()
        .map_err(|e| validation_error(&req_id.0, &e))?;

    let id = newilano_db::upsert_hero_slide(&state.pool, &slide, sort_order)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    slide.id = id.to_string();

    Ok((
        StatusCode::CREATED,
        ApiResponse::new(
            CreatedHeroSlide {
                id,
                sort_order,
                slide,
            },
            req_id.0,
        ),
    ))
}

pub(super) async fn overview(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<CatalogOverview>>, ApiError> {
    let overview = newilano_db::catalog_overview(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(ApiResponse::new(overview, req_id.0))
}
