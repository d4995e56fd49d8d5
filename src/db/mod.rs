//! Data backends for movies, ratings and preferences
//!
//! The catalog itself is owned by the store; the API only reads it. Ratings
//! and preferences are written with upsert semantics, one row per key.
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Movie, RatedMovie, RatingValue, UserPreferences, UserRating},
};

pub mod memory;
pub mod postgres;
pub mod redis;
pub mod rest;

pub use self::memory::MemoryStore;
pub use self::postgres::{create_pool, PgMovieStore};
pub use self::redis::{create_redis_client, Cache, CacheKey, CacheWriterHandle};
pub use self::rest::RestMovieStore;

/// Trait for movie data backends
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieStore: Send + Sync {
    /// Every catalog movie, highest aggregate rating first
    async fn list_movies(&self) -> AppResult<Vec<Movie>>;

    /// A single movie by id
    async fn get_movie(&self, id: Uuid) -> AppResult<Option<Movie>>;

    /// A user's full rating history joined with movie title and genre
    ///
    /// Ordered by rating descending, then most recently updated first.
    async fn rating_history(&self, user_id: &str) -> AppResult<Vec<RatedMovie>>;

    /// Inserts or replaces the rating for (user, movie)
    async fn upsert_rating(
        &self,
        user_id: &str,
        movie_id: Uuid,
        rating: RatingValue,
    ) -> AppResult<UserRating>;

    /// Saved genre preferences, if the user has any
    async fn get_preferences(&self, user_id: &str) -> AppResult<Option<UserPreferences>>;

    /// Inserts or replaces a user's genre preferences
    async fn save_preferences(&self, preferences: &UserPreferences) -> AppResult<()>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}
