use redis::AsyncCommands;
use redis::Client;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::error::AppError;
use crate::error::AppResult;
use crate::models::MovieId;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// TMDB movie details, per response language
    MovieDetails { id: MovieId, language: String },
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::MovieDetails { id, language } => {
                write!(f, "tmdb:movie:{}:{}", id, language.to_lowercase())
            }
        }
    }
}

/// Creates a Redis client for caching
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Upper bound on a single Redis round trip, connect included
pub const DEFAULT_CACHE_TIMEOUT: Duration = Duration::from_millis(250);

/// Runs a Redis operation, failing once `timeout` elapses
async fn with_deadline<T>(
    timeout: Duration,
    op: impl Future<Output = AppResult<T>>,
) -> AppResult<T> {
    match tokio::time::timeout(timeout, op).await {
        Ok(result) => result,
        Err(_) => Err(AppError::Internal(format!(
            "Redis did not respond within {}ms",
            timeout.as_millis()
        ))),
    }
}

/// Message for asynchronous cache writes
struct CacheWriteMessage {
    key: String,
    value: String,
    ttl: u64,
}

/// Cache handler for storing and retrieving metadata from Redis
#[derive(Clone)]
pub struct Cache {
    redis_client: Client,
    timeout: Duration,
    write_tx: mpsc::UnboundedSender<CacheWriteMessage>,
}

/// Handle for gracefully shutting down the cache writer
pub struct CacheWriterHandle {
    shutdown_tx: mpsc::Sender<()>,
    writer: tokio::task::JoinHandle<()>,
}

impl CacheWriterHandle {
    /// Signals the writer task and waits until pending writes are flushed
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        if let Err(e) = self.writer.await {
            tracing::error!(error = %e, "Cache writer task panicked");
        }
    }
}

impl Cache {
    /// Creates a new Cache instance with a background write task
    pub fn new(redis_client: Client) -> (Self, CacheWriterHandle) {
        Self::with_timeout(redis_client, DEFAULT_CACHE_TIMEOUT)
    }

    /// Like [`Cache::new`], bounding every read and write by `timeout`
    pub fn with_timeout(redis_client: Client, timeout: Duration) -> (Self, CacheWriterHandle) {
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let client = redis_client.clone();
        let writer = tokio::spawn(async move {
            Self::cache_writer_task(client, timeout, write_rx, shutdown_rx).await;
        });

        let cache = Self {
            redis_client,
            timeout,
            write_tx,
        };

        (cache, CacheWriterHandle { shutdown_tx, writer })
    }

    /// Writes queued messages to Redis until shutdown, then drains what is left
    async fn cache_writer_task(
        client: Client,
        timeout: Duration,
        mut write_rx: mpsc::UnboundedReceiver<CacheWriteMessage>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        tracing::info!("Cache writer task started");

        loop {
            tokio::select! {
                Some(msg) = write_rx.recv() => {
                    if let Err(e) = Self::write_to_redis(&client, timeout, msg).await {
                        tracing::error!(error = %e, "Failed to write to Redis cache");
                    }
                }
                _ = shutdown_rx.recv() => {
                    write_rx.close();
                    let mut flushed = 0usize;
                    while let Some(msg) = write_rx.recv().await {
                        if let Err(e) = Self::write_to_redis(&client, timeout, msg).await {
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

    async fn write_to_redis(
        client: &Client,
        timeout: Duration,
        msg: CacheWriteMessage,
    ) -> AppResult<()> {
        with_deadline(timeout, async move {
            let mut conn = client.get_multiplexed_async_connection().await?;
            let _: () = conn.set_ex(msg.key, msg.value, msg.ttl).await?;
            Ok(())
        })
        .await
    }

    /// Retrieves and deserializes a cached value, `None` on a miss
    ///
    /// Fails after the cache timeout when Redis is slow or unreachable.
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> AppResult<Option<T>> {
        let cached: Option<String> = with_deadline(self.timeout, async {
            let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
            let value: Option<String> = conn.get(key.to_string()).await?;
            Ok::<_, AppError>(value)
        })
        .await?;

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
    use crate::models::MovieMetadata;

    fn redis_url() -> String {
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string())
    }

    #[test]
    fn test_cache_key_display_movie_details() {
        let key = CacheKey::MovieDetails {
            id: MovieId(19995),
            language: "en-US".to_string(),
        };
        assert_eq!(key.to_string(), "tmdb:movie:19995:en-us");
    }

    #[test]
    fn test_cache_key_language_distinguishes_entries() {
        let en = CacheKey::MovieDetails {
            id: MovieId(1),
            language: "en-US".to_string(),
        };
        let fr = CacheKey::MovieDetails {
            id: MovieId(1),
            language: "fr-FR".to_string(),
        };
        assert_ne!(en.to_string(), fr.to_string());
    }

    fn details_key() -> CacheKey {
        CacheKey::MovieDetails {
            id: MovieId(19995),
            language: "en-US".to_string(),
        }
    }

    #[tokio::test]
    async fn test_read_from_unreachable_server_is_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = create_redis_client(&format!("redis://{}", addr)).unwrap();
        let (cache, _handle) = Cache::new(client);

        let result: AppResult<Option<MovieMetadata>> = cache.get_from_cache(&details_key()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_read_from_unresponsive_server_times_out() {
        // Connections complete in the backlog but nothing ever replies
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let client = create_redis_client(&format!("redis://{}", addr)).unwrap();
        let (cache, _handle) = Cache::with_timeout(client, Duration::from_millis(100));

        let start = std::time::Instant::now();
        let result: AppResult<Option<MovieMetadata>> = cache.get_from_cache(&details_key()).await;

        assert!(matches!(result, Err(AppError::Internal(msg)) if msg.contains("100ms")));
        assert!(start.elapsed() < Duration::from_secs(2));
        drop(listener);
    }

    #[tokio::test]
    #[ignore = "requires a running Redis"]
    async fn test_cache_miss() {
        let client = create_redis_client(&redis_url()).unwrap();
        let (cache, _handle) = Cache::new(client);

        let key = CacheKey::MovieDetails {
            id: MovieId(987_654_321),
            language: "xx-XX".to_string(),
        };
        let retrieved: Option<MovieMetadata> = cache.get_from_cache(&key).await.unwrap();

        assert_eq!(retrieved, None);
    }

    #[tokio::test]
    #[ignore = "requires a running Redis"]
    async fn test_shutdown_flushes_pending_writes() {
        let client = create_redis_client(&redis_url()).unwrap();
        let (cache, handle) = Cache::new(client.clone());

        let key = CacheKey::MovieDetails {
            id: MovieId(49026),
            language: "test".to_string(),
        };
        let value = MovieMetadata {
            title: Some("The Dark Knight Rises".to_string()),
            ..Default::default()
        };

        cache.set_in_background(&key, &value, 60);
        handle.shutdown().await;

        let retrieved: Option<MovieMetadata> = cache.get_from_cache(&key).await.unwrap();
        assert_eq!(retrieved, Some(value));

        let mut conn = client.get_multiplexed_async_connection().await.unwrap();
        let _: () = conn.del(key.to_string()).await.unwrap();
    }
}
