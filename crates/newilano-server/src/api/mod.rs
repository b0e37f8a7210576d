mod admin;
mod brands;
mod content;
mod favorites;
mod products;
mod rankings;

use std::{sync::Arc, time::Duration};

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use newilano_core::{HeroSlide, RankingEngine};
use newilano_db::PgCatalog;
use serde::Serialize;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{
    enforce_rate_limit, request_id, require_bearer_auth, AuthState, RateLimitState, RequestId,
};

const DEFAULT_LIST_LIMIT: i64 = 50;
const MAX_LIST_LIMIT: i64 = 200;
const DEFAULT_RANKING_LIMIT: i64 = 8;
const MAX_RANKING_LIMIT: i64 = 48;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    /// Slides served when the `hero_slides` table is empty.
    pub hero_defaults: Arc<Vec<HeroSlide>>,
    pub trending_window: chrono::Duration,
}

impl AppState {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            hero_defaults: Arc::new(Vec::new()),
            trending_window: chrono::Duration::hours(
                newilano_core::ranking::DEFAULT_TRENDING_WINDOW_HOURS,
            ),
        }
    }

    pub(super) fn ranking(&self) -> RankingEngine<PgCatalog> {
        RankingEngine::new(PgCatalog::new(self.pool.clone()))
            .with_trending_window(self.trending_window)
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn new(data: T, request_id: String) -> Json<Self> {
        Json(Self {
            data,
            meta: ResponseMeta::new(request_id),
        })
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "conflict" => StatusCode::CONFLICT,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// List endpoints: default 50, clamped to `1..=200`.
pub(super) fn normalize_limit(limit: Option<i64>) -> usize {
    clamp_limit(limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT)
}

/// Ranking endpoints: default 8, clamped to `1..=48`.
pub(super) fn normalize_ranking_limit(limit: Option<i64>) -> usize {
    clamp_limit(limit, DEFAULT_RANKING_LIMIT, MAX_RANKING_LIMIT)
}

fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> usize {
    let clamped = limit.unwrap_or(default).clamp(1, max);
    usize::try_from(clamped).unwrap_or(1)
}

pub(super) fn map_db_error(request_id: String, error: &newilano_db::DbError) -> ApiError {
    match error {
        newilano_db::DbError::NotFound => {
            ApiError::new(request_id, "not_found", "resource not found")
        }
        newilano_db::DbError::Conflict => {
            ApiError::new(request_id, "conflict", "resource already exists")
        }
        _ => {
            tracing::error!(error = %error, "database query failed");
            ApiError::new(request_id, "internal_error", "database query failed")
        }
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

fn public_router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/brands", get(brands::list_brands))
        .route("/api/v1/campaigns", get(content::list_campaigns))
        .route("/api/v1/hero-slides", get(content::list_hero_slides))
        .route("/api/v1/products", get(products::list_products))
        .route("/api/v1/products/new", get(products::list_new_products))
        .route(
            "/api/v1/products/most-favorited",
            get(rankings::most_favorited),
        )
        .route("/api/v1/products/trending", get(rankings::trending))
        .route("/api/v1/products/search", get(products::search_products))
        .route("/api/v1/products/{slug}", get(products::get_product))
        .route(
            "/api/v1/products/{slug}/recommendations",
            get(rankings::recommendations),
        )
}

fn protected_router(auth: AuthState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/users/{user_id}/favorites",
            get(favorites::list_favorites),
        )
        .route(
            "/api/v1/users/{user_id}/favorites/{slug}",
            put(favorites::add_favorite).delete(favorites::remove_favorite),
        )
        .route("/api/v1/admin/products", post(admin::create_product))
        .route("/api/v1/admin/products/{slug}", put(admin::update_product))
        .route("/api/v1/admin/hero-slides", post(admin::create_hero_slide))
        .route("/api/v1/admin/overview", get(admin::overview))
        .layer(axum::middleware::from_fn_with_state(
            auth,
            require_bearer_auth,
        ))
}

pub fn build_app(state: AppState, auth: AuthState, rate_limit: RateLimitState) -> Router {
    Router::new()
        .merge(public_router())
        .merge(protected_router(auth))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id))
                .layer(axum::middleware::from_fn_with_state(
                    rate_limit,
                    enforce_rate_limit,
                ))
                .layer(CompressionLayer::new()),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match newilano_db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    database: "ok",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        database: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}

pub fn default_rate_limit_state() -> RateLimitState {
    RateLimitState::new(120, Duration::from_secs(60))
}

#[cfg(test)]
mod tests;
