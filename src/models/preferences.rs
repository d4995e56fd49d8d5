use serde::{Deserialize, Serialize};

/// Genres a user has marked as favorites
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct UserPreferences {
    pub user_id: String,
    pub favorite_genres: Vec<String>,
}

impl UserPreferences {
    /// Creates preferences, trimming genres and dropping blanks and duplicates
    pub fn new(user_id: impl Into<String>, genres: Vec<String>) -> Self {
        let mut favorite_genres: Vec<String> = Vec::with_capacity(genres.len());
        for genre in genres {
            let genre = genre.trim();
            if genre.is_empty() {
                continue;
            }
            // Keep the first spelling of a case-insensitive duplicate
            if !favorite_genres.iter().any(|g| g.eq_ignore_ascii_case(genre)) {
                favorite_genres.push(genre.to_string());
            }
        }

        Self {
            user_id: user_id.into(),
            favorite_genres,
        }
    }

    /// Empty preferences for a user that never saved any
    pub fn empty(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            favorite_genres: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_genres() {
        let prefs = UserPreferences::new(
            "user-1",
            vec![
                " Drama ".to_string(),
                "".to_string(),
                "drama".to_string(),
                "Sci-Fi".to_string(),
            ],
        );
        assert_eq!(prefs.favorite_genres, vec!["Drama", "Sci-Fi"]);
    }

    #[test]
    fn test_empty() {
        let prefs = UserPreferences::empty("user-1");
        assert_eq!(prefs.user_id, "user-1");
        assert!(prefs.favorite_genres.is_empty());
    }
}
