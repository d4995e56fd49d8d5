use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Hosted rows may carry null text columns; treat them as empty
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A movie available in the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct Movie {
    /// Unique identifier for the movie
    pub id: Uuid,
    pub title: String,
    pub genre: String,
    /// Release year
    pub year: i32,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    /// Poster image reference
    #[serde(default, deserialize_with = "null_as_empty")]
    pub poster_url: String,
    /// Aggregate rating, 0 to 5
    pub rating: f64,
}

impl Movie {
    /// Creates a new movie with a fresh identifier
    pub fn new(
        title: impl Into<String>,
        genre: impl Into<String>,
        year: i32,
        rating: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            genre: genre.into(),
            year,
            description: String::new(),
            poster_url: String::new(),
            rating,
        }
    }

    /// Sets the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the poster reference
    pub fn with_poster(mut self, poster_url: impl Into<String>) -> Self {
        self.poster_url = poster_url.into();
        self
    }

    /// Case-insensitive check of the genre against any of the given genres
    pub fn genre_matches_any(&self, genres: &[String]) -> bool {
        let genre = self.genre.to_lowercase();
        genres
            .iter()
            .any(|g| !g.trim().is_empty() && genre.contains(&g.trim().to_lowercase()))
    }
}

/// Browse filter for the catalog listing
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct MovieFilter {
    /// Case-insensitive substring of the title or description
    #[serde(default)]
    pub q: Option<String>,
    /// Exact genre; "all" disables the filter
    #[serde(default)]
    pub genre: Option<String>,
}

impl MovieFilter {
    /// Whether a movie passes this filter
    pub fn matches(&self, movie: &Movie) -> bool {
        let text_ok = match self.q.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => {
                let q = q.to_lowercase();
                movie.title.to_lowercase().contains(&q)
                    || movie.description.to_lowercase().contains(&q)
            }
            _ => true,
        };

        let genre_ok = match self.genre.as_deref().map(str::trim) {
            Some(g) if !g.is_empty() && !g.eq_ignore_ascii_case("all") => movie.genre == g,
            _ => true,
        };

        text_ok && genre_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_serializes_with_store_field_names() {
        let movie = Movie::new("Nova", "Sci-Fi", 2021, 4.8).with_poster("/posters/nova.jpg");
        let json = serde_json::to_value(&movie).unwrap();
        assert_eq!(json["title"], "Nova");
        assert_eq!(json["poster_url"], "/posters/nova.jpg");
        assert_eq!(json["year"], 2021);
        assert_eq!(json["rating"], 4.8);
    }

    #[test]
    fn test_genre_matches_any_is_case_insensitive() {
        let movie = Movie::new("Nova", "Sci-Fi", 2021, 4.8);
        assert!(movie.genre_matches_any(&["sci-fi".to_string()]));
        assert!(movie.genre_matches_any(&["Drama".to_string(), "SCI".to_string()]));
        assert!(!movie.genre_matches_any(&["Drama".to_string()]));
        assert!(!movie.genre_matches_any(&[]));
        assert!(!movie.genre_matches_any(&["  ".to_string()]));
    }

    #[test]
    fn test_filter_by_title_and_genre() {
        let movie = Movie::new("The Long Night", "Drama", 2019, 4.1);

        let by_title = MovieFilter {
            q: Some("long".to_string()),
            genre: None,
        };
        assert!(by_title.matches(&movie));

        let all_genres = MovieFilter {
            q: None,
            genre: Some("all".to_string()),
        };
        assert!(all_genres.matches(&movie));

        let wrong_genre = MovieFilter {
            q: Some("long".to_string()),
            genre: Some("Comedy".to_string()),
        };
        assert!(!wrong_genre.matches(&movie));

        assert!(MovieFilter::default().matches(&movie));
    }

    #[test]
    fn test_filter_query_matches_description() {
        let movie =
            Movie::new("Orbit Nine", "Sci-Fi", 2012, 3.9).with_description("A heist in space");

        let by_description = MovieFilter {
            q: Some("HEIST".to_string()),
            genre: None,
        };
        assert!(by_description.matches(&movie));

        let no_match = MovieFilter {
            q: Some("romance".to_string()),
            genre: None,
        };
        assert!(!no_match.matches(&movie));
    }

    #[test]
    fn test_null_text_columns_decode_as_empty() {
        let movie: Movie = serde_json::from_value(serde_json::json!({
            "id": Uuid::nil(),
            "title": "Nova",
            "genre": "Sci-Fi",
            "year": 2021,
            "description": null,
            "poster_url": null,
            "rating": 4.8
        }))
        .unwrap();
        assert_eq!(movie.description, "");
        assert_eq!(movie.poster_url, "");

        let missing: Movie = serde_json::from_value(serde_json::json!({
            "id": Uuid::nil(),
            "title": "Echo",
            "genre": "Drama",
            "year": 2018,
            "rating": 4.5
        }))
        .unwrap();
        assert_eq!(missing.description, "");
    }
}
