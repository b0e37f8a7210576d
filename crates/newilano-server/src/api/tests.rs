use std::sync::Arc;

use super::*;
use axum::body::{to_bytes, Body};
use axum::http::Request;
use tower::ServiceExt;
use uuid::Uuid;

#[test]
fn normalize_limit_applies_defaults_and_bounds() {
    assert_eq!(normalize_limit(None), 50);
    assert_eq!(normalize_limit(Some(0)), 1);
    assert_eq!(normalize_limit(Some(-5)), 1);
    assert_eq!(normalize_limit(Some(1_000)), 200);
    assert_eq!(normalize_limit(Some(25)), 25);
}

#[test]
fn normalize_ranking_limit_applies_defaults_and_bounds() {
    assert_eq!(normalize_ranking_limit(None), 8);
    assert_eq!(normalize_ranking_limit(Some(0)), 1);
    assert_eq!(normalize_ranking_limit(Some(100)), 48);
    assert_eq!(normalize_ranking_limit(Some(12)), 12);
}

#[test]
fn api_error_validation_error_maps_to_bad_request() {
    let response = ApiError::new("req-1", "validation_error", "invalid input").into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn map_db_error_turns_not_found_into_404() {
    let response = map_db_error("req-1".to_string(), &newilano_db::DbError::NotFound)
        .into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[test]
fn map_db_error_turns_conflict_into_409() {
    let response = map_db_error("req-1".to_string(), &newilano_db::DbError::Conflict)
        .into_response();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// -----------------------------------------------------------------------------
// Helpers
// -----------------------------------------------------------------------------

fn open_app(state: AppState) -> Router {
    let auth = AuthState::from_keys("", true).expect("auth");
    build_app(state, auth, default_rate_limit_state())
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
        .await
        .expect("response");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = serde_json::from_slice(&body).expect("json parse");
    (status, json)
}

async fn seed_product(pool: &sqlx::PgPool, slug: &str, brand: &str, category: &str, age_hours: i32) {
    sqlx::query(
        "INSERT INTO products (brand_name, slug, name, category, price, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, 5499, NOW() - make_interval(hours => $5), \
                 NOW() - make_interval(hours => $5))",
    )
    .bind(brand)
    .bind(slug)
    .bind(format!("{brand} {slug}"))
    .bind(category)
    .bind(age_hours)
    .execute(pool)
    .await
    .expect("seed_product failed");
}

async fn seed_user(pool: &sqlx::PgPool, email: &str, favorites: &[&str]) -> Uuid {
    let favorites: Vec<String> = favorites.iter().map(|s| (*s).to_string()).collect();
    newilano_db::upsert_user(pool, email, &favorites)
        .await
        .expect("seed_user failed")
}

fn slugs(json: &serde_json::Value) -> Vec<String> {
    json.as_array()
        .expect("array")
        .iter()
        .map(|p| p["slug"].as_str().expect("slug").to_string())
        .collect()
}

// -----------------------------------------------------------------------------
// Catalog routes
// -----------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn request_id_header_is_echoed(pool: sqlx::PgPool) {
    let app = open_app(AppState::new(pool));
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/health")
                .header("x-request-id", "abc-123")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-request-id").map(|v| v.as_bytes()),
        Some(&b"abc-123"[..])
    );
}

#[sqlx::test(migrations = "../../migrations")]
async fn products_route_filters_and_returns_facets(pool: sqlx::PgPool) {
    seed_product(&pool, "samba", "Adidas", "Sneaker", 3).await;
    seed_product(&pool, "hoodie", "Adidas", "Apparel", 2).await;
    seed_product(&pool, "pegasus", "Nike", "Sneaker", 1).await;

    let (status, json) = get_json(
        open_app(AppState::new(pool)),
        "/api/v1/products?category=Sneaker&search=%20adidas%20",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(slugs(&json["data"]["products"]), vec!["samba"]);
    assert_eq!(json["data"]["products"][0]["price"].as_str(), Some("5.499 TL"));
    assert_eq!(
        json["data"]["facets"]["categories"],
        serde_json::json!(["Apparel", "Sneaker"])
    );
    assert_eq!(
        json["data"]["facets"]["brands"],
        serde_json::json!(["Adidas", "Nike"])
    );
}

#[sqlx::test(migrations = "../../migrations")]
async fn product_detail_returns_404_for_unknown_slug(pool: sqlx::PgPool) {
    let (status, json) = get_json(open_app(AppState::new(pool)), "/api/v1/products/nope").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"].as_str(), Some("not_found"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn search_route_returns_compact_hits(pool: sqlx::PgPool) {
    seed_product(&pool, "samba", "Adidas", "Sneaker", 1).await;

    let (status, json) = get_json(
        open_app(AppState::new(pool)),
        "/api/v1/products/search?q=ADIDAS",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let hits = json["data"].as_array().expect("data array");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["slug"].as_str(), Some("samba"));
    assert!(hits[0].get("gallery").is_none(), "hits are compact");
}

#[sqlx::test(migrations = "../../migrations")]
async fn hero_slides_use_configured_defaults_when_table_is_empty(pool: sqlx::PgPool) {
    let mut state = AppState::new(pool);
    state.hero_defaults = Arc::new(vec![HeroSlide {
        id: "welcome".to_string(),
        title: "Welcome".to_string(),
        subtitle: String::new(),
        cta_label: "Shop".to_string(),
        cta_href: "/".to_string(),
        image: "/img/hero.jpg".to_string(),
    }]);

    let (_, with_defaults) = get_json(open_app(state.clone()), "/api/v1/hero-slides").await;
    assert_eq!(with_defaults["data"][0]["id"].as_str(), Some("welcome"));

    let (_, without) = get_json(
        open_app(state),
        "/api/v1/hero-slides?include_defaults=false",
    )
    .await;
    assert_eq!(without["data"].as_array().map(Vec::len), Some(0));
}

// -----------------------------------------------------------------------------
// Ranking routes
// -----------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn most_favorited_route_ranks_and_backfills(pool: sqlx::PgPool) {
    seed_product(&pool, "a", "Adidas", "Sneaker", 3).await;
    seed_product(&pool, "b", "Adidas", "Sneaker", 2).await;
    seed_product(&pool, "c", "Nike", "Sneaker", 1).await;
    seed_user(&pool, "u1@example.com", &["a"]).await;
    seed_user(&pool, "u2@example.com", &["a", "b"]).await;

    let (status, json) = get_json(
        open_app(AppState::new(pool)),
        "/api/v1/products/most-favorited?limit=3",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(slugs(&json["data"]), vec!["a", "b", "c"]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn trending_route_falls_back_to_recently_updated(pool: sqlx::PgPool) {
    seed_product(&pool, "older", "Adidas", "Sneaker", 5).await;
    seed_product(&pool, "newer", "Adidas", "Sneaker", 1).await;

    let (status, json) = get_json(
        open_app(AppState::new(pool)),
        "/api/v1/products/trending",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(slugs(&json["data"]), vec!["newer", "older"]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn recommendations_route_returns_empty_list_for_unknown_slug(pool: sqlx::PgPool) {
    seed_product(&pool, "a", "Adidas", "Sneaker", 1).await;

    let (status, json) = get_json(
        open_app(AppState::new(pool)),
        "/api/v1/products/nope/recommendations",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"].as_array().map(Vec::len), Some(0));
}

// -----------------------------------------------------------------------------
// Favorites routes
// -----------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn favorites_require_bearer_token_when_keys_configured(pool: sqlx::PgPool) {
    let user = seed_user(&pool, "u@example.com", &[]).await;
    let auth = AuthState::from_keys("secret", false).expect("auth");
    let app = build_app(AppState::new(pool), auth, default_rate_limit_state());

    let uri = format!("/api/v1/users/{user}/favorites");
    let denied = app
        .clone()
        .oneshot(Request::builder().uri(&uri).body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);

    let allowed = app
        .oneshot(
            Request::builder()
                .uri(&uri)
                .header("authorization", "Bearer secret")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(allowed.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../migrations")]
async fn put_favorite_adds_then_reports_unchanged(pool: sqlx::PgPool) {
    seed_product(&pool, "samba", "Adidas", "Sneaker", 1).await;
    let user = seed_user(&pool, "u@example.com", &[]).await;
    let app = open_app(AppState::new(pool));
    let uri = format!("/api/v1/users/{user}/favorites/samba");

    for expected in ["added", "unchanged"] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri(&uri)
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        assert_eq!(json["data"]["change"].as_str(), Some(expected));
    }

    let (_, listed) = get_json(app, &format!("/api/v1/users/{user}/favorites")).await;
    assert_eq!(slugs(&listed["data"]), vec!["samba"]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn put_favorite_for_unknown_product_is_404(pool: sqlx::PgPool) {
    let user = seed_user(&pool, "u@example.com", &[]).await;
    let app = open_app(AppState::new(pool));

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/api/v1/users/{user}/favorites/nope"))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// -----------------------------------------------------------------------------
// Admin routes
// -----------------------------------------------------------------------------

async fn send_json(
    app: Router,
    method: &str,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .expect("request"),
        )
        .await
        .expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

async fn seed_brand(pool: &sqlx::PgPool, name: &str, slug: &str) -> Uuid {
    sqlx::query_scalar::<_, Uuid>("INSERT INTO brands (name, slug) VALUES ($1, $2) RETURNING id")
        .bind(name)
        .bind(slug)
        .fetch_one(pool)
        .await
        .expect("seed_brand failed")
}

fn product_body(brand_id: Uuid, name: &str, price: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "brand_id": brand_id,
        "category": "Sneaker",
        "price": price,
        "image": "/img/samba.jpg",
        "description": "Klasik model",
        "sizes": ["42", "43"],
        "product_url": "adidas.com.tr/samba"
    })
}

#[sqlx::test(migrations = "../../migrations")]
async fn admin_creates_product_and_rejects_duplicates(pool: sqlx::PgPool) {
    let brand_id = seed_brand(&pool, "Adidas", "adidas").await;
    let app = open_app(AppState::new(pool));
    let body = product_body(brand_id, "Samba OG", serde_json::json!("5499"));

    let (status, created) = send_json(app.clone(), "POST", "/api/v1/admin/products", &body).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["slug"].as_str(), Some("samba-og"));
    assert_eq!(created["data"]["brand"].as_str(), Some("Adidas"));
    assert_eq!(created["data"]["price"].as_str(), Some("5.499 TL"));
    assert_eq!(
        created["data"]["product_url"].as_str(),
        Some("https://adidas.com.tr/samba")
    );

    let (status, duplicate) = send_json(app, "POST", "/api/v1/admin/products", &body).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(duplicate["error"]["code"].as_str(), Some("conflict"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn admin_create_rejects_invalid_price_and_unknown_brand(pool: sqlx::PgPool) {
    let brand_id = seed_brand(&pool, "Adidas", "adidas").await;
    let app = open_app(AppState::new(pool));

    let zero_price = product_body(brand_id, "Samba OG", serde_json::json!(0));
    let (status, json) =
        send_json(app.clone(), "POST", "/api/v1/admin/products", &zero_price).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"].as_str(), Some("validation_error"));

    let unknown_brand = product_body(Uuid::new_v4(), "Samba OG", serde_json::json!(10));
    let (status, _) = send_json(app, "POST", "/api/v1/admin/products", &unknown_brand).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../migrations")]
async fn admin_update_keeps_slug(pool: sqlx::PgPool) {
    let brand_id = seed_brand(&pool, "Adidas", "adidas").await;
    let app = open_app(AppState::new(pool));
    let body = product_body(brand_id, "Samba OG", serde_json::json!(5499));
    let (status, _) = send_json(app.clone(), "POST", "/api/v1/admin/products", &body).await;
    assert_eq!(status, StatusCode::CREATED);

    let renamed = product_body(brand_id, "Samba OG Cloud White", serde_json::json!("4999,50"));
    let (status, updated) = send_json(
        app.clone(),
        "PUT",
        "/api/v1/admin/products/samba-og",
        &renamed,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["slug"].as_str(), Some("samba-og"));
    assert_eq!(updated["data"]["name"].as_str(), Some("Samba OG Cloud White"));
    assert_eq!(updated["data"]["price"].as_str(), Some("4.999,50 TL"));

    let (status, _) = send_json(app, "PUT", "/api/v1/admin/products/nope", &renamed).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../migrations")]
async fn admin_hero_slide_replaces_defaults(pool: sqlx::PgPool) {
    let mut state = AppState::new(pool);
    state.hero_defaults = Arc::new(vec![HeroSlide {
        id: "welcome".to_string(),
        title: "Welcome".to_string(),
        subtitle: String::new(),
        cta_label: "Shop".to_string(),
        cta_href: "/".to_string(),
        image: "/img/hero.jpg".to_string(),
    }]);
    let app = open_app(state);

    let body = serde_json::json!({
        "title": "Samba Drop",
        "subtitle": "Yeni sezon",
        "cta_label": "Keşfet",
        "cta_href": "/vitrin",
        "image": "/img/samba-hero.jpg",
        "order": 1
    });
    let (status, created) =
        send_json(app.clone(), "POST", "/api/v1/admin/hero-slides", &body).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["sort_order"].as_i64(), Some(1));

    let (_, slides) = get_json(app, "/api/v1/hero-slides").await;
    let slides = slides["data"].as_array().expect("data array");
    assert_eq!(slides.len(), 1);
    assert_eq!(slides[0]["title"].as_str(), Some("Samba Drop"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn admin_overview_reports_totals_and_brand_counts(pool: sqlx::PgPool) {
    let adidas = seed_brand(&pool, "Adidas", "adidas").await;
    seed_brand(&pool, "Nike", "nike").await;
    let app = open_app(AppState::new(pool));

    for name in ["Samba OG", "Gazelle"] {
        let body = product_body(adidas, name, serde_json::json!(5499));
        let (status, _) = send_json(app.clone(), "POST", "/api/v1/admin/products", &body).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, json) = get_json(app, "/api/v1/admin/overview").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["totals"]["products"].as_i64(), Some(2));
    assert_eq!(json["data"]["totals"]["brands"].as_i64(), Some(1));
    assert_eq!(json["data"]["totals"]["categories"].as_i64(), Some(1));

    let brands = json["data"]["brands"].as_array().expect("brands array");
    assert_eq!(brands.len(), 2);
    assert_eq!(brands[0]["slug"].as_str(), Some("adidas"));
    assert_eq!(brands[0]["product_count"].as_i64(), Some(2));
    assert_eq!(brands[1]["slug"].as_str(), Some("nike"));
    assert_eq!(brands[1]["product_count"].as_i64(), Some(0));
}
