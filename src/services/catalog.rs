use crate::{
    cached,
    db::{Cache, CacheKey, MovieStore},
    error::{AppError, AppResult},
    models::{Movie, MovieFilter},
};

/// Full catalog, through the cache when one is configured
async fn load_catalog(
    store: &dyn MovieStore,
    cache: Option<&Cache>,
    ttl: u64,
) -> AppResult<Vec<Movie>> {
    match cache {
        Some(cache) => cached!(cache, CacheKey::Catalog, ttl, store.list_movies()),
        None => store.list_movies().await,
    }
}

/// Catalog movies passing `filter`, highest rated first
pub async fn browse(
    store: &dyn MovieStore,
    cache: Option<&Cache>,
    ttl: u64,
    filter: &MovieFilter,
) -> AppResult<Vec<Movie>> {
    let movies = load_catalog(store, cache, ttl).await?;
    let total = movies.len();

    let movies: Vec<Movie> = movies.into_iter().filter(|m| filter.matches(m)).collect();

    tracing::debug!(
        total,
        returned = movies.len(),
        q = ?filter.q,
        genre = ?filter.genre,
        "Catalog browsed"
    );

    Ok(movies)
}

/// Distinct genres in order of first appearance in the catalog
pub async fn genres(
    store: &dyn MovieStore,
    cache: Option<&Cache>,
    ttl: u64,
) -> AppResult<Vec<String>> {
    match cache {
        Some(cache) => cached!(cache, CacheKey::Genres, ttl, async {
            let movies = load_catalog(store, Some(cache), ttl).await?;
            Ok::<_, AppError>(distinct_genres(&movies))
        }),
        None => {
            let movies = store.list_movies().await?;
            Ok(distinct_genres(&movies))
        }
    }
}

fn distinct_genres(movies: &[Movie]) -> Vec<String> {
    let mut genres: Vec<String> = Vec::new();
    for movie in movies {
        if !genres.contains(&movie.genre) {
            genres.push(movie.genre.clone());
        }
    }
    genres
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryStore, MockMovieStore};

    fn store() -> MemoryStore {
        MemoryStore::with_movies(vec![
            Movie::new("Nova", "Sci-Fi", 2021, 4.8),
            Movie::new("Echo", "Drama", 2018, 4.5),
            Movie::new("Orbit Nine", "Sci-Fi", 2012, 3.9),
        ])
    }

    #[tokio::test]
    async fn test_browse_without_filter_returns_everything() {
        let movies = browse(&store(), None, 60, &MovieFilter::default()).await.unwrap();
        assert_eq!(movies.len(), 3);
        assert_eq!(movies[0].title, "Nova");
    }

    #[tokio::test]
    async fn test_browse_filters_by_genre_and_query() {
        let filter = MovieFilter {
            q: Some("o".to_string()),
            genre: Some("Sci-Fi".to_string()),
        };
        let movies = browse(&store(), None, 60, &filter).await.unwrap();
        let titles: Vec<&str> = movies.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Nova", "Orbit Nine"]);
    }

    #[tokio::test]
    async fn test_genres_are_distinct_in_catalog_order() {
        let genres = genres(&store(), None, 60).await.unwrap();
        assert_eq!(genres, vec!["Sci-Fi", "Drama"]);
    }

    #[tokio::test]
    async fn test_unreachable_cache_falls_back_to_store() {
        // Nothing listens on port 1, so every cache read fails
        let client = redis::Client::open("redis://127.0.0.1:1").unwrap();
        let (cache, handle) = Cache::new(client);

        let movies = browse(&store(), Some(&cache), 60, &MovieFilter::default())
            .await
            .unwrap();
        let titles: Vec<&str> = movies.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Nova", "Echo", "Orbit Nine"]);

        let genres = genres(&store(), Some(&cache), 60).await.unwrap();
        assert_eq!(genres, vec!["Sci-Fi", "Drama"]);

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_store_errors_propagate() {
        let mut store = MockMovieStore::new();
        store
            .expect_list_movies()
            .returning(|| Err(crate::error::AppError::Internal("down".to_string())));

        let result = browse(&store, None, 60, &MovieFilter::default()).await;
        assert!(result.is_err());
    }
}
