use std::sync::Arc;

use marquee_api::{
    config::Config,
    db::{self, Cache, MemoryStore, MovieStore, PgMovieStore, RestMovieStore},
    routes::{create_router, AppState},
    services::{GatewayClient, RecommendationSelector, TextGenerator},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let store = connect_store(&config).await?;
    tracing::info!(store = store.name(), "Movie store ready");

    let generator: Option<Arc<dyn TextGenerator>> = match &config.ai_gateway_api_key {
        Some(key) if !key.trim().is_empty() => Some(Arc::new(GatewayClient::new(
            key.clone(),
            config.ai_gateway_url.clone(),
            config.ai_model.clone(),
            config.ai_timeout(),
        ))),
        _ => {
            tracing::warn!("AI_GATEWAY_API_KEY is not set; recommendations will fail");
            None
        }
    };
    let selector = RecommendationSelector::new(generator, config.selector_config());

    let mut state = AppState::new(store, selector);
    let mut cache_writer = None;
    if let Some(redis_url) = &config.redis_url {
        let client = db::create_redis_client(redis_url)?;
        let (cache, handle) = Cache::new(client);
        state = state.with_cache(cache, config.catalog_cache_ttl_secs);
        cache_writer = Some(handle);
        tracing::info!("Catalog cache enabled");
    }

    let app = create_router(Arc::new(state));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_writer {
        handle.shutdown().await;
    }

    Ok(())
}

/// Picks the data backend from configuration, Postgres first
async fn connect_store(config: &Config) -> anyhow::Result<Arc<dyn MovieStore>> {
    if let Some(database_url) = &config.database_url {
        let pool = db::create_pool(database_url).await?;
        db::postgres::run_migrations(&pool).await?;
        return Ok(Arc::new(PgMovieStore::new(pool)));
    }

    match (&config.supabase_url, &config.supabase_service_role_key) {
        (Some(url), Some(key)) => Ok(Arc::new(RestMovieStore::new(url.clone(), key.clone()))),
        (Some(_), None) => Err(anyhow::anyhow!(
            "SUPABASE_URL is set but SUPABASE_SERVICE_ROLE_KEY is missing"
        )),
        _ => {
            tracing::warn!("No data store configured; serving an empty in-memory catalog");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
