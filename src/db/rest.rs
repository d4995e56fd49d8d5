//! Movie store backed by a hosted PostgREST-style data API
//!
//! Tables are addressed as `{base_url}/rest/v1/{table}` and filtered with
//! query operators (`user_id=eq.x`). Writes rely on the `Prefer` header for
//! merge-on-conflict upserts.
use chrono::{DateTime, Utc};
use reqwest::{Client as HttpClient, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    db::MovieStore,
    error::{AppError, AppResult},
    models::{Movie, RatedMovie, RatingValue, UserPreferences, UserRating},
};

const UPSERT_PREFER: &str = "resolution=merge-duplicates,return=representation";

#[derive(Clone)]
pub struct RestMovieStore {
    http_client: HttpClient,
    base_url: String,
    service_key: String,
}

/// Embedded movie columns; the API returns an object or a one-element array
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EmbeddedMovie {
    One(MovieSummary),
    Many(Vec<MovieSummary>),
}

#[derive(Debug, Clone, Deserialize)]
struct MovieSummary {
    title: String,
    genre: String,
}

impl EmbeddedMovie {
    fn into_summary(self) -> Option<MovieSummary> {
        match self {
            EmbeddedMovie::One(summary) => Some(summary),
            EmbeddedMovie::Many(list) => list.into_iter().next(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RatingRow {
    movie_id: Uuid,
    rating: i32,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    movies: Option<EmbeddedMovie>,
}

#[derive(Debug, Serialize)]
struct RatingUpsert<'a> {
    user_id: &'a str,
    movie_id: Uuid,
    rating: i32,
}

#[derive(Debug, Deserialize)]
struct PreferencesRow {
    #[serde(default)]
    favorite_genres: Option<Vec<String>>,
}

impl RestMovieStore {
    pub fn new(base_url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self {
            http_client: HttpClient::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_key: service_key.into(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> AppResult<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Internal(format!(
                "Data store returned status {}: {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }

    async fn get_rows<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, &str)],
    ) -> AppResult<Vec<T>> {
        let response = self
            .authorized(self.http_client.get(self.table_url(table)))
            .query(query)
            .send()
            .await?;

        Self::read_json(response).await
    }
}

#[async_trait::async_trait]
impl MovieStore for RestMovieStore {
    async fn list_movies(&self) -> AppResult<Vec<Movie>> {
        self.get_rows("movies", &[("select", "*"), ("order", "rating.desc")])
            .await
    }

    async fn get_movie(&self, id: Uuid) -> AppResult<Option<Movie>> {
        let filter = format!("eq.{}", id);
        let rows: Vec<Movie> = self
            .get_rows("movies", &[("select", "*"), ("id", filter.as_str())])
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn rating_history(&self, user_id: &str) -> AppResult<Vec<RatedMovie>> {
        let filter = format!("eq.{}", user_id);
        let rows: Vec<RatingRow> = self
            .get_rows(
                "user_ratings",
                &[
                    ("select", "*,movies(title,genre)"),
                    ("user_id", filter.as_str()),
                    ("order", "rating.desc"),
                ],
            )
            .await?;

        let mut history: Vec<RatedMovie> = rows
            .into_iter()
            .filter_map(|row| {
                let summary = row.movies.and_then(EmbeddedMovie::into_summary)?;
                Some(RatedMovie {
                    movie_id: row.movie_id,
                    title: summary.title,
                    genre: summary.genre,
                    rating: row.rating,
                    updated_at: row
                        .updated_at
                        .or(row.created_at)
                        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
                })
            })
            .collect();

        // Tie-break by recency locally; the timestamp column name varies
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
        let body = RatingUpsert {
            user_id,
            movie_id,
            rating: rating.get(),
        };

        let response = self
            .authorized(self.http_client.post(self.table_url("user_ratings")))
            .query(&[("on_conflict", "user_id,movie_id")])
            .header("Prefer", UPSERT_PREFER)
            .json(&body)
            .send()
            .await?;

        let rows: Vec<RatingRow> = Self::read_json(response).await?;
        let updated_at = rows
            .into_iter()
            .next()
            .and_then(|row| row.updated_at)
            .unwrap_or_else(Utc::now);

        tracing::debug!(user_id = %user_id, movie_id = %movie_id, "Rating upserted");

        Ok(UserRating {
            user_id: user_id.to_string(),
            movie_id,
            rating,
            updated_at,
        })
    }

    async fn get_preferences(&self, user_id: &str) -> AppResult<Option<UserPreferences>> {
        let filter = format!("eq.{}", user_id);
        let rows: Vec<PreferencesRow> = self
            .get_rows(
                "user_preferences",
                &[("select", "favorite_genres"), ("user_id", filter.as_str())],
            )
            .await?;

        Ok(rows.into_iter().next().map(|row| UserPreferences {
            user_id: user_id.to_string(),
            favorite_genres: row.favorite_genres.unwrap_or_default(),
        }))
    }

    async fn save_preferences(&self, preferences: &UserPreferences) -> AppResult<()> {
        let response = self
            .authorized(self.http_client.post(self.table_url("user_preferences")))
            .query(&[("on_conflict", "user_id")])
            .header("Prefer", UPSERT_PREFER)
            .json(preferences)
            .send()
            .await?;

        let _: Vec<serde_json::Value> = Self::read_json(response).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "rest"
    }
}
