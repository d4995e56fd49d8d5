use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    db::MovieStore,
    error::AppResult,
    models::{Movie, RatedMovie, RatingValue, UserPreferences, UserRating},
};

/// Movie store held in process memory
///
/// Used for tests and for running the API without a configured backend.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<MemoryStoreInner>>,
}

#[derive(Default)]
struct MemoryStoreInner {
    movies: Vec<Movie>,
    ratings: HashMap<(String, Uuid), UserRating>,
    preferences: HashMap<String, UserPreferences>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with the given catalog
    pub fn with_movies(movies: Vec<Movie>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryStoreInner {
                movies,
                ..MemoryStoreInner::default()
            })),
        }
    }

    /// Adds a movie to the catalog
    pub async fn insert_movie(&self, movie: Movie) {
        let mut inner = self.inner.write().await;
        inner.movies.retain(|m| m.id != movie.id);
        inner.movies.push(movie);
    }
}

#[async_trait::async_trait]
impl MovieStore for MemoryStore {
    async fn list_movies(&self) -> AppResult<Vec<Movie>> {
        let inner = self.inner.read().await;
        let mut movies = inner.movies.clone();
        // Stable sort keeps insertion order among equal ratings
        movies.sort_by(|a, b| b.rating.total_cmp(&a.rating));
        Ok(movies)
    }

    async fn get_movie(&self, id: Uuid) -> AppResult<Option<Movie>> {
        let inner = self.inner.read().await;
        Ok(inner.movies.iter().find(|m| m.id == id).cloned())
    }

    async fn rating_history(&self, user_id: &str) -> AppResult<Vec<RatedMovie>> {
        let inner = self.inner.read().await;
        let mut history: Vec<RatedMovie> = inner
            .ratings
            .values()
            .filter(|r| r.user_id == user_id)
            .filter_map(|r| {
                inner.movies.iter().find(|m| m.id == r.movie_id).map(|m| RatedMovie {
                    movie_id: m.id,
                    title: m.title.clone(),
                    genre: m.genre.clone(),
                    rating: r.rating.get(),
                    updated_at: r.updated_at,
                })
            })
            .collect();

        history.sort_by(|a, b| {
            b.rating
                .cmp(&a.rating)
                .then_with(|| b.updated_at.cmp(&a.updated_at))
        });
        Ok(history)
    }

    async fn upsert_rating(
        &self,
        user_id: &str,
        movie_id: Uuid,
        rating: RatingValue,
    ) -> AppResult<UserRating> {
        let record = UserRating {
            user_id: user_id.to_string(),
            movie_id,
            rating,
            updated_at: Utc::now(),
        };

        let mut inner = self.inner.write().await;
        inner
            .ratings
            .insert((user_id.to_string(), movie_id), record.clone());
        Ok(record)
    }

    async fn get_preferences(&self, user_id: &str) -> AppResult<Option<UserPreferences>> {
        let inner = self.inner.read().await;
        Ok(inner.preferences.get(user_id).cloned())
    }

    async fn save_preferences(&self, preferences: &UserPreferences) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        inner
            .preferences
            .insert(preferences.user_id.clone(), preferences.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
