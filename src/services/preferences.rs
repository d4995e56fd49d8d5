use crate::{
    db::MovieStore,
    error::{AppError, AppResult},
    models::UserPreferences,
};

/// Saved preferences, or an empty set for users that never saved any
pub async fn get_preferences(
    store: &dyn MovieStore,
    user_id: &str,
) -> AppResult<UserPreferences> {
    Ok(store
        .get_preferences(user_id)
        .await?
        .unwrap_or_else(|| UserPreferences::empty(user_id)))
}

/// Replaces a user's favorite genres
pub async fn save_preferences(
    store: &dyn MovieStore,
    user_id: &str,
    favorite_genres: Vec<String>,
) -> AppResult<UserPreferences> {
    if user_id.trim().is_empty() {
        return Err(AppError::InvalidInput("User id cannot be empty".to_string()));
    }

    let preferences = UserPreferences::new(user_id, favorite_genres);
    store.save_preferences(&preferences).await?;

    tracing::info!(
        user_id = %user_id,
        genres = ?preferences.favorite_genres,
        "Preferences saved"
    );

    Ok(preferences)
}
