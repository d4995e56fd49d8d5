use std::collections::HashMap;
use uuid::Uuid;

use crate::{
    db::MovieStore,
    error::{AppError, AppResult},
    models::{RatingValue, UserRating},
};

/// Records a user's score for a movie, replacing any earlier score
pub async fn rate_movie(
    store: &dyn MovieStore,
    user_id: &str,
    movie_id: Uuid,
    rating: i32,
) -> AppResult<UserRating> {
    if user_id.trim().is_empty() {
        return Err(AppError::InvalidInput("User id cannot be empty".to_string()));
    }

    let rating = RatingValue::new(rating)?;

    if store.get_movie(movie_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Movie {} not found", movie_id)));
    }

    let record = store.upsert_rating(user_id, movie_id, rating).await?;

    tracing::info!(
        user_id = %user_id,
        movie_id = %movie_id,
        rating = %rating,
        "Movie rated"
    );

    Ok(record)
}

/// Map of movie id to the user's score
pub async fn user_ratings(
    store: &dyn MovieStore,
    user_id: &str,
) -> AppResult<HashMap<Uuid, i32>> {
    let history = store.rating_history(user_id).await?;
    Ok(history.into_iter().map(|r| (r.movie_id, r.rating)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryStore, MockMovieStore};
    use crate::models::Movie;

    #[tokio::test]
    async fn test_rate_movie_upserts() {
        let movie = Movie::new("Nova", "Sci-Fi", 2021, 4.8);
        let store = MemoryStore::with_movies(vec![movie.clone()]);

        tokio_test::assert_ok!(rate_movie(&store, "user-1", movie.id, 2).await);
        let record = tokio_test::assert_ok!(rate_movie(&store, "user-1", movie.id, 4).await);
        assert_eq!(record.rating.get(), 4);

        let ratings = user_ratings(&store, "user-1").await.unwrap();
        assert_eq!(ratings.len(), 1);
        assert_eq!(ratings[&movie.id], 4);
    }

    #[tokio::test]
    async fn test_rate_movie_rejects_out_of_range() {
        let mut store = MockMovieStore::new();
        store.expect_get_movie().never();
        store.expect_upsert_rating().never();

        let result = rate_movie(&store, "user-1", Uuid::new_v4(), 7).await;
        let err = tokio_test::assert_err!(result);
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_rate_unknown_movie_is_not_found() {
        let store = MemoryStore::new();
        let result = rate_movie(&store, "user-1", Uuid::new_v4(), 3).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_user_ratings_empty_for_new_user() {
        let store = MemoryStore::new();
        assert!(user_ratings(&store, "nobody").await.unwrap().is_empty());
    }
}
