//! HTTP routes.

use crate::visitors::{VisitorCounter, track_visitor};
use axum::{
    Router,
    extract::{Query, State},
    http::{HeaderValue, Method, StatusCode},
    middleware,
    response::{IntoResponse, Json, Response},
    routing::get,
};
use herald_cache::CacheManager;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    cache: CacheManager,
    visitors: Arc<VisitorCounter>,
}

impl AppState {
    /// State serving `cache` with a fresh visitor counter.
    pub fn new(cache: CacheManager) -> Self {
        Self::with_visitors(cache, VisitorCounter::new())
    }

    /// State serving `cache` and counting into `visitors`.
    pub fn with_visitors(cache: CacheManager, visitors: VisitorCounter) -> Self {
        Self {
            cache,
            visitors: Arc::new(visitors),
        }
    }

    /// The snapshot cache.
    pub fn cache(&self) -> &CacheManager {
        &self.cache
    }

    /// The visitor counter.
    pub fn visitors(&self) -> &Arc<VisitorCounter> {
        &self.visitors
    }
}

/// Build the router.
///
/// `cors_origins` lists the origins allowed to call the API; an empty list
/// allows any origin.
pub fn create_router(state: AppState, cors_origins: &[String]) -> Router {
    let tracked = Router::new()
        .route("/telegram", get(channel_history))
        .route("/uniqueUserCount", get(unique_user_count))
        .route_layer(middleware::from_fn_with_state(
            state.visitors.clone(),
            track_visitor,
        ));

    Router::new()
        .route("/health", get(health_check))
        .merge(tracked)
        .layer(build_cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn build_cors_layer(cors_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_headers(Any);

    if cors_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = cors_origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                warn!("CORS: Invalid origin in config: {}", origin);
                None
            })
        })
        .collect();
    info!("CORS: Allowing {} origin(s)", origins.len());
    layer.allow_origin(origins)
}

#[derive(Debug, Deserialize)]
struct HistoryQuery {
    limit: Option<usize>,
}

/// Cached records, first `limit` only when given.
async fn channel_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Response {
    match state.cache.read().await {
        Ok(snapshot) => {
            let records = snapshot.records();
            let shown = query.limit.map_or(records.len(), |limit| limit.min(records.len()));
            Json(&records[..shown]).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to load channel history");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error" })),
            )
                .into_response()
        }
    }
}

async fn unique_user_count(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({ "count": state.visitors.count() }))
}

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "cached": !state.cache.is_empty() })),
    )
}
