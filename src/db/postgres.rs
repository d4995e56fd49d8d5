use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::{
    db::MovieStore,
    error::AppResult,
    models::{Movie, RatedMovie, RatingValue, UserPreferences, UserRating},
};

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Applies the bundled schema migrations
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Movie store backed by PostgreSQL
#[derive(Clone)]
pub struct PgMovieStore {
    pool: PgPool,
}

impl PgMovieStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl MovieStore for PgMovieStore {
    async fn list_movies(&self) -> AppResult<Vec<Movie>> {
        let movies = sqlx::query_as::<_, Movie>(
            r#"
            SELECT id, title, genre, year, description, poster_url, rating
            FROM movies
            ORDER BY rating DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(movies)
    }

    async fn get_movie(&self, id: Uuid) -> AppResult<Option<Movie>> {
        let movie = sqlx::query_as::<_, Movie>(
            r#"
            SELECT id, title, genre, year, description, poster_url, rating
            FROM movies
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(movie)
    }

    async fn rating_history(&self, user_id: &str) -> AppResult<Vec<RatedMovie>> {
        let rows = sqlx::query_as::<_, RatedMovie>(
            r#"
            SELECT r.movie_id, m.title, m.genre, r.rating, r.updated_at
            FROM user_ratings r
            JOIN movies m ON m.id = r.movie_id
            WHERE r.user_id = $1
            ORDER BY r.rating DESC, r.updated_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn upsert_rating(
        &self,
        user_id: &str,
        movie_id: Uuid,
        rating: RatingValue,
    ) -> AppResult<UserRating> {
        let updated_at: DateTime<Utc> = sqlx::query_scalar(
            r#"
            INSERT INTO user_ratings (user_id, movie_id, rating, updated_at)
            VALUES ($1, $2, $3, now())
            ON CONFLICT (user_id, movie_id)
            DO UPDATE SET rating = EXCLUDED.rating, updated_at = EXCLUDED.updated_at
            RETURNING updated_at
            "#,
        )
        .bind(user_id)
        .bind(movie_id)
        .bind(rating.get())
        .fetch_one(&self.pool)
        .await?;

        Ok(UserRating {
            user_id: user_id.to_string(),
            movie_id,
            rating,
            updated_at,
        })
    }

    async fn get_preferences(&self, user_id: &str) -> AppResult<Option<UserPreferences>> {
        let genres: Option<Vec<String>> = sqlx::query_scalar(
            "SELECT favorite_genres FROM user_preferences WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(genres.map(|favorite_genres| UserPreferences {
            user_id: user_id.to_string(),
            favorite_genres,
        }))
    }

    async fn save_preferences(&self, preferences: &UserPreferences) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO user_preferences (user_id, favorite_genres, updated_at)
            VALUES ($1, $2, now())
            ON CONFLICT (user_id)
            DO UPDATE SET favorite_genres = EXCLUDED.favorite_genres,
                          updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(&preferences.user_id)
        .bind(&preferences.favorite_genres)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}
