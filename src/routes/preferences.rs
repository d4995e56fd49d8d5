use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::UserPreferences,
    routes::AppState,
    services::preferences,
};

#[derive(Debug, Deserialize)]
pub struct SavePreferencesRequest {
    #[serde(default)]
    pub favorite_genres: Vec<String>,
}

/// Handler returning a user's favorite genres
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> AppResult<Json<UserPreferences>> {
    let prefs = preferences::get_preferences(state.store.as_ref(), &user_id).await?;
    Ok(Json(prefs))
}

/// Handler replacing a user's favorite genres
pub async fn save(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Json(request): Json<SavePreferencesRequest>,
) -> AppResult<Json<UserPreferences>> {
    let prefs =
        preferences::save_preferences(state.store.as_ref(), &user_id, request.favorite_genres)
            .await?;
    Ok(Json(prefs))
}
