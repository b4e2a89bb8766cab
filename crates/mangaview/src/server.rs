//! HTTP server for the Mangaview proxy endpoints
//!
//! JSON endpoints reshape MangaDex responses; the cover and page endpoints
//! stream raw image bytes through the expiring caches.

use crate::catalog::{CatalogService, DEFAULT_SEARCH_LIMIT};
use crate::error::AppError;
use crate::random::RandomTitleClient;
use crate::types::{HealthResponse, RandomResponse, SearchResponse};
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

/// Landing page; detail endpoints are JSON, so this stays a static document
const INDEX_HTML: &str = r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>Mangaview</title></head>
<body>
<h1>Mangaview</h1>
<p>A caching proxy for the MangaDex catalog.</p>
<ul>
<li><code>GET /search?title=&amp;limit=&amp;offset=</code></li>
<li><code>GET /manga/{mangaId}</code></li>
<li><code>GET /cover/{mangaId}</code></li>
<li><code>GET /chapter/{chapterId}</code></li>
<li><code>GET /chapter/{chapterId}/page/{pageIndex}</code></li>
<li><code>GET /random</code></li>
<li><code>GET /health</code></li>
</ul>
</body>
</html>
"#;

/// Shared state for the HTTP server
pub struct ServerState {
    pub catalog: CatalogService,
    pub random: RandomTitleClient,
    pub started_at: DateTime<Utc>,
}

impl ServerState {
    pub fn new(catalog: CatalogService, random: RandomTitleClient) -> Self {
        Self {
            catalog,
            random,
            started_at: Utc::now(),
        }
    }
}

pub type SharedState = Arc<ServerState>;

/// Search query parameters; absent values default rather than reject
#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    title: String,
    #[serde(default = "default_limit")]
    limit: u32,
    #[serde(default)]
    offset: u32,
}

fn default_limit() -> u32 {
    DEFAULT_SEARCH_LIMIT
}

/// Create the HTTP router
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/search", get(search))
        .route("/cover/{manga_id}", get(get_cover))
        .route("/manga/{manga_id}", get(get_manga))
        .route("/chapter/{chapter_id}", get(get_chapter))
        .route("/chapter/{chapter_id}/page/{page_index}", get(get_page))
        .route("/random", get(get_random))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_server(state: SharedState, port: u16) -> std::io::Result<()> {
    let router = create_router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Health check endpoint
async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let (cover_cache, page_cache) = state.catalog.cache_stats();
    let uptime_secs = (Utc::now() - state.started_at).num_seconds() as u64;

    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_secs,
        cover_cache,
        page_cache,
    })
}

/// Search manga by title
async fn search(
    State(state): State<SharedState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, AppError> {
    let response = state
        .catalog
        .search(&params.title, params.limit, params.offset)
        .await?;
    Ok(Json(response))
}

/// Proxy a manga's cover image
async fn get_cover(
    State(state): State<SharedState>,
    Path(manga_id): Path<String>,
) -> Result<Response, AppError> {
    let (image, from_cache) = state.catalog.cover(&manga_id).await?;
    Ok(image_response(&image.content_type, image.body.clone(), from_cache))
}

/// Manga detail as JSON
async fn get_manga(
    State(state): State<SharedState>,
    Path(manga_id): Path<String>,
) -> Result<Response, AppError> {
    let detail = state.catalog.manga_detail(&manga_id).await?;
    Ok(Json(detail).into_response())
}

/// Chapter detail as JSON
async fn get_chapter(
    State(state): State<SharedState>,
    Path(chapter_id): Path<String>,
) -> Result<Response, AppError> {
    let detail = state.catalog.chapter_detail(&chapter_id).await?;
    Ok(Json(detail).into_response())
}

/// Proxy one page image of a chapter
async fn get_page(
    State(state): State<SharedState>,
    Path((chapter_id, page_index)): Path<(String, u32)>,
) -> Result<Response, AppError> {
    let (image, from_cache) = state.catalog.page(&chapter_id, page_index).await?;
    Ok(image_response(&image.content_type, image.body.clone(), from_cache))
}

/// One random manga title
async fn get_random(
    State(state): State<SharedState>,
) -> Result<Json<RandomResponse>, AppError> {
    let title = state.random.random_title().await?;
    Ok(Json(RandomResponse { title }))
}

// Bytes clones are reference-counted, so serving a cached image does not
// copy the buffer.
fn image_response(content_type: &str, body: Bytes, from_cache: bool) -> Response {
    let cache_header = if from_cache { "HIT" } else { "MISS" };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CACHE_CONTROL, "public, max-age=86400")
        .header("X-Cache", cache_header)
        .body(Body::from(body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AppConfig;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn create_test_state() -> SharedState {
        let config = AppConfig::default();
        let catalog = CatalogService::new(&config);
        let random = RandomTitleClient::new(config.random_max_attempts);
        Arc::new(ServerState::new(catalog, random))
    }

    #[tokio::test]
    async fn test_index_serves_html() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(content_type.starts_with("text/html"));
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["status"], "ok");
        assert!(json["uptime_secs"].as_u64().is_some());
        assert!(json["cover_cache"]["entries"].as_u64().is_some());
        assert!(json["page_cache"]["misses"].as_u64().is_some());
    }

    #[tokio::test]
    async fn test_search_without_title_returns_empty_results() {
        let router = create_router(create_test_state());

        // Missing params default instead of rejecting, and an empty title
        // short-circuits before any upstream call.
        let response = router
            .oneshot(Request::builder().uri("/search").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["results"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_page_index_must_be_numeric() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/chapter/ch-1/page/abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/nonexistent")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_image_response_headers() {
        let response = image_response("image/jpeg", Bytes::from_static(&[1, 2, 3]), true);

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "image/jpeg"
        );
        assert_eq!(response.headers().get("X-Cache").unwrap(), "HIT");
    }

    #[test]
    fn test_server_state_new() {
        let state = create_test_state();

        // started_at should be close to now
        let diff = (Utc::now() - state.started_at).num_seconds();
        assert!((0..5).contains(&diff));
    }
}
