//! Hybrid recommendation selection
//!
//! A user's rating history and the catalog are summarized into a prompt, the
//! generator answers with titles, and those titles are matched back onto
//! the catalog. When the generator under-produces, unrated catalog movies
//! are backfilled in catalog order until the limit is met.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    db::MovieStore,
    error::{AppError, AppResult},
    models::{Movie, RatedMovie, RecommendationRequest},
    services::generation::TextGenerator,
};

/// Ratings summary used when the user has rated nothing
pub const NO_RATINGS_PLACEHOLDER: &str = "No ratings yet";

/// Genre line used when the request names no genres
pub const NO_GENRES_PLACEHOLDER: &str = "Not specified";

/// Maximum number of rated movies described in the prompt
pub const HISTORY_SUMMARY_CAP: usize = 10;

const SYSTEM_PROMPT: &str = "You are an expert movie recommendation engine. \
Analyze user preferences and suggest movies they'll love. \
Be concise and only return movie titles from the available list.";

/// How to fill the result when generated titles match too few movies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FallbackPolicy {
    /// Any unrated movie, in catalog order
    ///
    /// Mirrors the deployed behavior, whose genre filter always passes.
    #[default]
    AnyUnrated,
    /// Unrated movies in a requested genre first, then any unrated movie
    GenrePreferred,
}

impl FromStr for FallbackPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "any_unrated" => Ok(FallbackPolicy::AnyUnrated),
            "genre_preferred" => Ok(FallbackPolicy::GenrePreferred),
            other => Err(format!(
                "unknown fallback policy '{}', expected any_unrated or genre_preferred",
                other
            )),
        }
    }
}

impl TryFrom<String> for FallbackPolicy {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FallbackPolicy> for String {
    fn from(policy: FallbackPolicy) -> Self {
        policy.to_string()
    }
}

impl Display for FallbackPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FallbackPolicy::AnyUnrated => write!(f, "any_unrated"),
            FallbackPolicy::GenrePreferred => write!(f, "genre_preferred"),
        }
    }
}

/// Tunables for the selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorConfig {
    pub fallback_policy: FallbackPolicy,
    pub history_summary_cap: usize,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            fallback_policy: FallbackPolicy::default(),
            history_summary_cap: HISTORY_SUMMARY_CAP,
        }
    }
}

/// The two messages sent to the generator
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// Selects recommendations by blending rating history with generated titles
#[derive(Clone)]
pub struct RecommendationSelector {
    generator: Option<Arc<dyn TextGenerator>>,
    config: SelectorConfig,
}

impl RecommendationSelector {
    /// `generator` is `None` when no gateway credential is configured
    pub fn new(generator: Option<Arc<dyn TextGenerator>>, config: SelectorConfig) -> Self {
        Self { generator, config }
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    fn generator(&self) -> AppResult<&dyn TextGenerator> {
        self.generator.as_deref().ok_or_else(|| {
            AppError::Configuration("AI gateway API key is not configured".to_string())
        })
    }

    /// Picks up to `request.limit` unrated movies from `catalog`
    ///
    /// `history` must be the user's complete rating history, ordered as the
    /// store returns it; `catalog` must be ordered by descending aggregate
    /// rating. The result never contains a rated movie and its length is
    /// `min(limit, unrated movies in catalog)`.
    pub async fn select(
        &self,
        request: &RecommendationRequest,
        history: &[RatedMovie],
        catalog: &[Movie],
    ) -> AppResult<Vec<Movie>> {
        let generator = self.generator()?;
        let limit = request.limit;
        if limit == 0 {
            return Ok(Vec::new());
        }

        let prompt = build_prompt(
            &ratings_summary(history, self.config.history_summary_cap),
            &catalog_summary(catalog),
            &request.genres,
            limit,
        );

        let content = generator.complete(&prompt.system, &prompt.user).await?;
        let candidates = parse_titles(&content);

        tracing::info!(
            user_id = %request.user_id,
            generator = generator.name(),
            candidates = ?candidates,
            "AI recommended titles"
        );

        let rated: HashSet<Uuid> = history.iter().map(|r| r.movie_id).collect();
        let mut selected = match_candidates(catalog, &candidates, &rated, limit);
        let matched = selected.len();

        if selected.len() < limit {
            tracing::info!(
                user_id = %request.user_id,
                matched,
                policy = %self.config.fallback_policy,
                "Falling back to catalog backfill"
            );
            let extra = backfill(
                catalog,
                &rated,
                &selected,
                &request.genres,
                self.config.fallback_policy,
                limit - selected.len(),
            );
            selected.extend(extra);
        }

        selected.truncate(limit);

        tracing::info!(
            user_id = %request.user_id,
            matched,
            fallback = selected.len() - matched,
            total = selected.len(),
            "Final recommendations"
        );

        Ok(selected)
    }
}

/// Loads the user's history and the catalog, then runs the selector
pub async fn get_recommendations(
    store: &dyn MovieStore,
    selector: &RecommendationSelector,
    request: &RecommendationRequest,
) -> AppResult<Vec<Movie>> {
    // Fail on missing credentials before touching the store
    selector.generator()?;

    tracing::info!(
        user_id = %request.user_id,
        genres = ?request.genres,
        limit = request.limit,
        store = store.name(),
        "Generating recommendations"
    );

    let history = store.rating_history(&request.user_id).await?;
    let catalog = store.list_movies().await?;

    selector.select(request, &history, &catalog).await
}

/// One line per rated movie, capped, or the placeholder when there are none
pub fn ratings_summary(history: &[RatedMovie], cap: usize) -> String {
    if history.is_empty() || cap == 0 {
        return NO_RATINGS_PLACEHOLDER.to_string();
    }

    history
        .iter()
        .take(cap)
        .map(RatedMovie::summary_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// One line per catalog movie with genre, year and description
pub fn catalog_summary(catalog: &[Movie]) -> String {
    catalog
        .iter()
        .map(|m| format!("{} ({}, {}) - {}", m.title, m.genre, m.year, m.description))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_prompt(ratings: &str, catalog: &str, genres: &[String], limit: usize) -> Prompt {
    let genres = if genres.is_empty() {
        NO_GENRES_PLACEHOLDER.to_string()
    } else {
        genres.join(", ")
    };

    let user = format!(
        "User's rated movies:\n{ratings}\n\n\
         Favorite genres: {genres}\n\n\
         Available movies:\n{catalog}\n\n\
         Recommend {limit} movies from the available list that this user would enjoy. \
         Return ONLY the exact movie titles, one per line."
    );

    Prompt {
        system: SYSTEM_PROMPT.to_string(),
        user,
    }
}

/// Splits generator output into trimmed, non-empty candidate titles
pub fn parse_titles(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Loose title match: either string contains the other, ignoring case
///
/// Tolerates the generator adding numbering, years or quotes around a title.
pub fn title_matches(candidate: &str, title: &str) -> bool {
    let candidate = candidate.to_lowercase();
    let title = title.trim().to_lowercase();
    if candidate.is_empty() || title.is_empty() {
        return false;
    }
    candidate.contains(&title) || title.contains(&candidate)
}

/// Unrated catalog movies matched by any candidate, in catalog order
pub fn match_candidates(
    catalog: &[Movie],
    candidates: &[String],
    rated: &HashSet<Uuid>,
    limit: usize,
) -> Vec<Movie> {
    catalog
        .iter()
        .filter(|movie| !rated.contains(&movie.id))
        .filter(|movie| candidates.iter().any(|c| title_matches(c, &movie.title)))
        .take(limit)
        .cloned()
        .collect()
}

/// Up to `needed` unrated movies not already in `selected`
pub fn backfill(
    catalog: &[Movie],
    rated: &HashSet<Uuid>,
    selected: &[Movie],
    genres: &[String],
    policy: FallbackPolicy,
    needed: usize,
) -> Vec<Movie> {
    let taken: HashSet<Uuid> = selected.iter().map(|m| m.id).collect();
    let eligible = catalog
        .iter()
        .filter(|movie| !rated.contains(&movie.id) && !taken.contains(&movie.id));

    match policy {
        FallbackPolicy::AnyUnrated => eligible.take(needed).cloned().collect(),
        FallbackPolicy::GenrePreferred => {
            let (preferred, rest): (Vec<&Movie>, Vec<&Movie>) =
                eligible.partition(|movie| movie.genre_matches_any(genres));
            preferred
                .into_iter()
                .chain(rest)
                .take(needed)
                .cloned()
                .collect()
        }
    }
}
