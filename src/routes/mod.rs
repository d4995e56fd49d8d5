use axum::{
    http::StatusCode,
    middleware as axum_middleware,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::{
    db::{Cache, MovieStore},
    middleware::{cors, request_id},
    services::RecommendationSelector,
};

pub mod movies;
pub mod preferences;
pub mod ratings;
pub mod recommendations;

/// Shared application state
pub struct AppState {
    pub store: Arc<dyn MovieStore>,
    pub selector: RecommendationSelector,
    pub cache: Option<Cache>,
    pub catalog_cache_ttl: u64,
}

impl AppState {
    pub fn new(store: Arc<dyn MovieStore>, selector: RecommendationSelector) -> Self {
        Self {
            store,
            selector,
            cache: None,
            catalog_cache_ttl: 300,
        }
    }

    /// Serves catalog listings through `cache`
    pub fn with_cache(mut self, cache: Cache, ttl: u64) -> Self {
        self.cache = Some(cache);
        self.catalog_cache_ttl = ttl;
        self
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        // Path the hosted web client already calls
        .route("/functions/v1/get-recommendations", post(recommendations::recommend))
        .with_state(state)
        // Last layer added runs first: every response, preflights included,
        // is traced and carries a request id
        .layer(cors::cors_layer())
        .layer(TraceLayer::new_for_http().make_span_with(request_id::make_span_with_request_id))
        .layer(axum_middleware::from_fn(request_id::request_id_middleware))
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/recommendations", post(recommendations::recommend))
        .route("/movies", get(movies::list))
        .route("/movies/genres", get(movies::genres))
        .route("/users/:user_id/ratings", get(ratings::list))
        .route("/users/:user_id/ratings/:movie_id", put(ratings::rate))
        .route(
            "/users/:user_id/preferences",
            get(preferences::get).put(preferences::save),
        )
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
