use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::UserRating,
    routes::AppState,
    services::ratings,
};

#[derive(Debug, Deserialize)]
pub struct RateMovieRequest {
    pub rating: i32,
}

/// Handler listing a user's ratings keyed by movie id
pub async fn list(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> AppResult<Json<HashMap<Uuid, i32>>> {
    let ratings = ratings::user_ratings(state.store.as_ref(), &user_id).await?;
    Ok(Json(ratings))
}

/// Handler for rating a movie
pub async fn rate(
    State(state): State<Arc<AppState>>,
    Path((user_id, movie_id)): Path<(String, Uuid)>,
    Json(request): Json<RateMovieRequest>,
) -> AppResult<Json<UserRating>> {
    let record =
        ratings::rate_movie(state.store.as_ref(), &user_id, movie_id, request.rating).await?;
    Ok(Json(record))
}
