use serde::{Deserialize, Serialize};

pub mod movie;
pub mod preferences;
pub mod rating;

pub use movie::{Movie, MovieFilter};
pub use preferences::UserPreferences;
pub use rating::{RatedMovie, RatingValue, UserRating};

/// Number of recommendations returned when the request does not say
pub const DEFAULT_LIMIT: usize = 5;

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

/// Request body for the recommendation endpoint
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    pub user_id: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

/// Response body for the recommendation endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationResponse {
    pub recommendations: Vec<Movie>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request: RecommendationRequest =
            serde_json::from_str(r#"{"userId":"user-1"}"#).unwrap();
        assert_eq!(request.user_id, "user-1");
        assert!(request.genres.is_empty());
        assert_eq!(request.limit, DEFAULT_LIMIT);
    }

    #[test]
    fn test_request_with_all_fields() {
        let request: RecommendationRequest = serde_json::from_str(
            r#"{"userId":"user-1","genres":["Sci-Fi","Drama"],"limit":6}"#,
        )
        .unwrap();
        assert_eq!(request.genres, vec!["Sci-Fi", "Drama"]);
        assert_eq!(request.limit, 6);
    }

    #[test]
    fn test_request_rejects_negative_limit() {
        let result = serde_json::from_str::<RecommendationRequest>(
            r#"{"userId":"user-1","limit":-1}"#,
        );
        assert!(result.is_err());
    }
}
