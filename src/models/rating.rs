use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// A validated user score between 1 and 5
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct RatingValue(i32);

impl RatingValue {
    pub const MIN: i32 = 1;
    pub const MAX: i32 = 5;

    pub fn new(value: i32) -> AppResult<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(AppError::InvalidInput(format!(
                "Rating must be between {} and {}, got {}",
                Self::MIN,
                Self::MAX,
                value
            )))
        }
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for RatingValue {
    type Error = AppError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RatingValue> for i32 {
    fn from(value: RatingValue) -> Self {
        value.0
    }
}

impl Display for RatingValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One user's score for one movie; unique per (user, movie)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserRating {
    pub user_id: String,
    pub movie_id: Uuid,
    pub rating: RatingValue,
    pub updated_at: DateTime<Utc>,
}

/// A rating joined with the title and genre of the rated movie
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct RatedMovie {
    pub movie_id: Uuid,
    pub title: String,
    pub genre: String,
    pub rating: i32,
    pub updated_at: DateTime<Utc>,
}

impl RatedMovie {
    /// Line used in the ratings summary handed to the generator
    pub fn summary_line(&self) -> String {
        format!("{} ({}) - Rating: {}/5", self.title, self.genre, self.rating)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_value_bounds() {
        assert!(RatingValue::new(1).is_ok());
        assert!(RatingValue::new(5).is_ok());
        assert!(matches!(RatingValue::new(0), Err(AppError::InvalidInput(_))));
        assert!(matches!(RatingValue::new(6), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_rating_value_deserialization_validates() {
        let ok: RatingValue = serde_json::from_str("4").unwrap();
        assert_eq!(ok.get(), 4);
        assert!(serde_json::from_str::<RatingValue>("9").is_err());
    }

    #[test]
    fn test_summary_line() {
        let rated = RatedMovie {
            movie_id: Uuid::new_v4(),
            title: "Nova".to_string(),
            genre: "Sci-Fi".to_string(),
            rating: 4,
            updated_at: Utc::now(),
        };
        assert_eq!(rated.summary_line(), "Nova (Sci-Fi) - Rating: 4/5");
    }
}
