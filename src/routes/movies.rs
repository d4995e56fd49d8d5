use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{Movie, MovieFilter},
    routes::AppState,
    services::catalog,
};

/// Handler for catalog browsing
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<MovieFilter>,
) -> AppResult<Json<Vec<Movie>>> {
    let movies = catalog::browse(
        state.store.as_ref(),
        state.cache.as_ref(),
        state.catalog_cache_ttl,
        &filter,
    )
    .await?;
    Ok(Json(movies))
}

/// Handler for the genre list
pub async fn genres(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<String>>> {
    let genres = catalog::genres(
        state.store.as_ref(),
        state.cache.as_ref(),
        state.catalog_cache_ttl,
    )
    .await?;
    Ok(Json(genres))
}
