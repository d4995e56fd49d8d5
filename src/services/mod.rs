pub mod catalog;
pub mod generation;
pub mod preferences;
pub mod ratings;
pub mod recommendations;

pub use generation::{GatewayClient, TextGenerator};
pub use recommendations::{FallbackPolicy, RecommendationSelector, SelectorConfig};
