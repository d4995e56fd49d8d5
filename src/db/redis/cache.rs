use redis::AsyncCommands;
use redis::Client;
use std::fmt::Display;
use tokio::sync::mpsc;

use crate::error::AppError;
use crate::error::AppResult;

/// Keys for values kept in Redis
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// The full catalog listing, highest rated first
    Catalog,
    /// Distinct catalog genres, in catalog order
    Genres,
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Catalog => write!(f, "catalog:all"),
            CacheKey::Genres => write!(f, "catalog:genres"),
        }
    }
}

/// Creates a Redis client for caching
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Message for asynchronous cache writes
struct CacheWriteMessage {
    key: String,
    value: String,
    ttl: u64,
}

/// Read-through cache for catalog listings
///
/// Reads hit Redis directly. Writes are queued to a background task so a
/// slow Redis never holds up a response.
#[derive(Clone)]
pub struct Cache {
    redis_client: Client,
    write_tx: mpsc::UnboundedSender<CacheWriteMessage>,
}

/// Handle for gracefully shutting down the cache writer
pub struct CacheWriterHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: tokio::task::JoinHandle<()>,
}

impl CacheWriterHandle {
    /// Signals the writer task and waits until queued writes are flushed
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Cache writer task panicked");
        }
        tracing::info!("Cache writer stopped");
    }
}

impl Cache {
    /// Creates a new Cache and spawns its background writer
    pub fn new(redis_client: Client) -> (Self, CacheWriterHandle) {
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let client = redis_client.clone();
        let task = tokio::spawn(async move {
            Self::cache_writer_task(client, write_rx, shutdown_rx).await;
        });

        let cache = Self {
            redis_client,
            write_tx,
        };

        (cache, CacheWriterHandle { shutdown_tx, task })
    }

    async fn cache_writer_task(
        client: Client,
        mut write_rx: mpsc::UnboundedReceiver<CacheWriteMessage>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        tracing::info!("Cache writer task started");

        loop {
            tokio::select! {
                Some(msg) = write_rx.recv() => {
                    let key = msg.key.clone();
                    if let Err(e) = Self::write_to_redis(&client, msg).await {
                        tracing::error!(error = %e, key = %key, "Failed to write to Redis cache");
                    }
                }
                _ = shutdown_rx.recv() => {
                    // Drain whatever is already queued, then stop
                    write_rx.close();
                    let mut flushed = 0usize;
                    while let Some(msg) = write_rx.recv().await {
                        if let Err(e) = Self::write_to_redis(&client, msg).await {
                            tracing::error!(error = %e, "Failed to flush cache write");
                        } else {
                            flushed += 1;
                        }
                    }

                    tracing::info!(flushed, "Cache writer task stopped");
                    break;
                }
            }
        }
    }

    async fn write_to_redis(client: &Client, msg: CacheWriteMessage) -> AppResult<()> {
        let mut conn = client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(msg.key, msg.value, msg.ttl).await?;
        Ok(())
    }

    /// Retrieves and deserializes a cached value, `None` on a miss
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> AppResult<Option<T>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let cached: Option<String> = conn.get(key.to_string()).await?;

        match cached {
            Some(json) => {
                let data = serde_json::from_str(&json).map_err(|e| {
                    AppError::Internal(format!("Cache deserialization error: {}", e))
                })?;
                Ok(Some(data))
            }
            None => Ok(None),
        }
    }

    /// Queues a value for writing without waiting on Redis
    pub fn set_in_background<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, "Cache serialization error");
                return;
            }
        };

        let msg = CacheWriteMessage {
            key: key.to_string(),
            value: json,
            ttl,
        };

        if let Err(e) = self.write_tx.send(msg) {
            tracing::error!(error = %e, "Failed to send cache write message");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_display() {
        assert_eq!(CacheKey::Catalog.to_string(), "catalog:all");
        assert_eq!(CacheKey::Genres.to_string(), "catalog:genres");
    }

    #[tokio::test]
    #[ignore = "requires a running Redis"]
    async fn test_set_in_background_flushes_on_shutdown() {
        let redis_url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());

        let client = create_redis_client(&redis_url).unwrap();
        let (cache, handle) = Cache::new(client.clone());

        let value = vec!["Nova".to_string(), "Echo".to_string()];
        cache.set_in_background(&CacheKey::Genres, &value, 60);
        handle.shutdown().await;

        let retrieved: Option<Vec<String>> = cache.get_from_cache(&CacheKey::Genres).await.unwrap();
        assert_eq!(retrieved, Some(value));

        let mut conn = client.get_multiplexed_async_connection().await.unwrap();
        let _: () = conn.del(CacheKey::Genres.to_string()).await.unwrap();
    }
}
