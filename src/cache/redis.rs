use redis::AsyncCommands;
use redis::Client;
use std::fmt::Display;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::AppResult;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    MovieDetails { id: u64, language: String },
    PopularMovies { page: u32, language: String },
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::MovieDetails { id, language } => write!(f, "movie:{}:{}", language, id),
            CacheKey::PopularMovies { page, language } => {
                write!(f, "popular:{}:{}", language, page)
            }
        }
    }
}

/// Opens a Redis client for the movie metadata cache
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

struct CacheWriteMessage {
    key: String,
    value: String,
    ttl: u64,
}

#[derive(Clone)]
struct RedisBackend {
    client: Client,
    write_tx: mpsc::UnboundedSender<CacheWriteMessage>,
}

/// Redis read-through cache. Reads hit Redis directly; writes are queued to a
/// background task so responses never wait on them.
///
/// A disabled cache misses on every read and drops every write.
#[derive(Clone)]
pub struct Cache {
    backend: Option<RedisBackend>,
}

/// Stops the background writer once queued writes are flushed
pub struct CacheWriterHandle {
    shutdown_tx: Option<mpsc::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl CacheWriterHandle {
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(()).await;
            tracing::info!("Cache writer shutdown signal sent");
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::error!(error = %e, "Cache writer task panicked");
            }
        }
    }
}

impl Cache {
    /// Cache backed by `redis_client`, with its writer task spawned
    pub fn new(redis_client: Client) -> (Self, CacheWriterHandle) {
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let client = redis_client.clone();
        let task = tokio::spawn(async move {
            Self::cache_writer_task(client, write_rx, shutdown_rx).await;
        });

        let cache = Self {
            backend: Some(RedisBackend {
                client: redis_client,
                write_tx,
            }),
        };

        let handle = CacheWriterHandle {
            shutdown_tx: Some(shutdown_tx),
            task: Some(task),
        };

        (cache, handle)
    }

    pub fn disabled() -> Self {
        Self { backend: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.backend.is_some()
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
                    if let Err(e) = Self::write_to_redis(&client, msg).await {
                        tracing::error!(error = %e, "Failed to write to Redis cache");
                    }
                }
                _ = shutdown_rx.recv() => {
                    write_rx.close();
                    let mut flushed = 0;
                    while let Some(msg) = write_rx.recv().await {
                        if let Err(e) = Self::write_to_redis(&client, msg).await {
                            tracing::error!(error = %e, "Failed to flush cache write during shutdown");
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

    async fn read_from_redis(client: &Client, key: &CacheKey) -> AppResult<Option<String>> {
        let mut conn = client.get_multiplexed_async_connection().await?;
        let cached: Option<String> = conn.get(key.to_string()).await?;
        Ok(cached)
    }

    /// Cached value for `key`. Redis failures and undecodable entries are
    /// logged and read as a miss.
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let backend = self.backend.as_ref()?;

        let json = match Self::read_from_redis(&backend.client, key).await {
            Ok(Some(json)) => json,
            Ok(None) => {
                tracing::debug!(key = %key, "Cache miss");
                return None;
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Redis read failed");
                return None;
            }
        };

        match serde_json::from_str(&json) {
            Ok(value) => {
                tracing::debug!(key = %key, "Cache hit");
                Some(value)
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Cache deserialization error");
                None
            }
        }
    }

    /// Queues `value` for writing without waiting on Redis
    pub fn set_in_background<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        let Some(backend) = &self.backend else {
            return;
        };

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

        if let Err(e) = backend.write_tx.send(msg) {
            tracing::error!(error = %e, "Failed to send cache write message");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn redis_url() -> String {
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string())
    }

    #[test]
    fn test_cache_key_display_movie_details() {
        let key = CacheKey::MovieDetails {
            id: 385687,
            language: "fr-FR".to_string(),
        };
        assert_eq!(key.to_string(), "movie:fr-FR:385687");
    }

    #[test]
    fn test_cache_key_display_popular() {
        let key = CacheKey::PopularMovies {
            page: 3,
            language: "en-US".to_string(),
        };
        assert_eq!(key.to_string(), "popular:en-US:3");
    }

    #[tokio::test]
    async fn test_disabled_cache_always_misses() {
        let cache = Cache::disabled();
        let key = CacheKey::PopularMovies {
            page: 1,
            language: "en-US".to_string(),
        };

        cache.set_in_background(&key, &vec!["ignored".to_string()], 60);
        let retrieved: Option<Vec<String>> = cache.get_from_cache(&key).await;

        assert!(!cache.is_enabled());
        assert_eq!(retrieved, None);
    }

    #[tokio::test]
    async fn test_unreachable_redis_reads_as_miss() {
        let client = create_redis_client("redis://127.0.0.1:1").unwrap();
        let (cache, handle) = Cache::new(client);

        let key = CacheKey::MovieDetails {
            id: 1,
            language: "fr-FR".to_string(),
        };
        let retrieved: Option<String> = cache.get_from_cache(&key).await;
        assert_eq!(retrieved, None);

        handle.shutdown().await;
    }

    #[tokio::test]
    #[ignore = "requires a running Redis"]
    async fn test_set_in_background_writes_to_cache() {
        let client = create_redis_client(&redis_url()).unwrap();
        let (cache, handle) = Cache::new(client.clone());

        let key = CacheKey::MovieDetails {
            id: 42,
            language: "test".to_string(),
        };
        let value = vec!["item1".to_string(), "item2".to_string()];
        cache.set_in_background(&key, &value, 60);

        handle.shutdown().await;

        let retrieved: Option<Vec<String>> = cache.get_from_cache(&key).await;
        assert_eq!(retrieved, Some(value));

        let mut conn = client.get_multiplexed_async_connection().await.unwrap();
        let _: () = conn.del(key.to_string()).await.unwrap();
    }
}
