use serde::Deserialize;
use std::time::Duration;

use crate::services::recommendations::{FallbackPolicy, SelectorConfig};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Credential for the text-generation gateway
    ///
    /// Left optional so the server still boots without it; every
    /// recommendation request then fails with a configuration error.
    #[serde(default)]
    pub ai_gateway_api_key: Option<String>,

    /// Base URL of the OpenAI-compatible chat completions gateway
    #[serde(default = "default_ai_gateway_url")]
    pub ai_gateway_url: String,

    /// Model requested from the gateway
    #[serde(default = "default_ai_model")]
    pub ai_model: String,

    /// Timeout for a single generation call, in seconds
    #[serde(default = "default_ai_timeout_secs")]
    pub ai_timeout_secs: u64,

    /// PostgreSQL connection URL; selects the Postgres store
    #[serde(default)]
    pub database_url: Option<String>,

    /// Hosted data store REST base URL; selects the REST store
    #[serde(default)]
    pub supabase_url: Option<String>,

    /// Service credential for the hosted data store
    #[serde(default)]
    pub supabase_service_role_key: Option<String>,

    /// Redis connection URL; enables the catalog cache
    #[serde(default)]
    pub redis_url: Option<String>,

    /// TTL for the cached catalog listing, in seconds
    #[serde(default = "default_catalog_cache_ttl_secs")]
    pub catalog_cache_ttl_secs: u64,

    /// How to backfill when generated titles under-produce
    #[serde(default)]
    pub fallback_policy: FallbackPolicy,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_ai_gateway_url() -> String {
    "https://ai.gateway.lovable.dev/v1".to_string()
}

fn default_ai_model() -> String {
    "google/gemini-2.5-flash".to_string()
}

fn default_ai_timeout_secs() -> u64 {
    30
}

fn default_catalog_cache_ttl_secs() -> u64 {
    300
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Timeout applied to each generation call
    pub fn ai_timeout(&self) -> Duration {
        Duration::from_secs(self.ai_timeout_secs)
    }

    /// Selector settings derived from this configuration
    pub fn selector_config(&self) -> SelectorConfig {
        SelectorConfig {
            fallback_policy: self.fallback_policy,
            ..SelectorConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_pairs(pairs: &[(&str, &str)]) -> Config {
        let vars = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()));
        envy::from_iter::<_, Config>(vars).unwrap()
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let config = from_pairs(&[]);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
        assert_eq!(config.ai_model, "google/gemini-2.5-flash");
        assert_eq!(config.ai_timeout(), Duration::from_secs(30));
        assert!(config.ai_gateway_api_key.is_none());
        assert!(config.database_url.is_none());
        assert_eq!(config.fallback_policy, FallbackPolicy::AnyUnrated);
    }

    #[test]
    fn test_reads_gateway_and_policy_settings() {
        let config = from_pairs(&[
            ("AI_GATEWAY_API_KEY", "secret"),
            ("AI_TIMEOUT_SECS", "5"),
            ("FALLBACK_POLICY", "genre_preferred"),
            ("PORT", "8080"),
        ]);
        assert_eq!(config.ai_gateway_api_key.as_deref(), Some("secret"));
        assert_eq!(config.ai_timeout(), Duration::from_secs(5));
        assert_eq!(config.port, 8080);
        assert_eq!(config.selector_config().fallback_policy, FallbackPolicy::GenrePreferred);
    }
}
