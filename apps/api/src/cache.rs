//! Rendered-page cache keyed by page path. Publish-time invalidation is
//! the freshness mechanism; the TTL only bounds staleness if an
//! invalidation was swallowed.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use redis::AsyncCommands;
use thiserror::Error;
use tracing::warn;

const CACHE_TTL_SECS: u64 = 3600;

#[derive(Debug, Error)]
#[error("Cache invalidation failed for `{path}`: {message}")]
pub struct InvalidationError {
    pub path: String,
    pub message: String,
}

/// Lookups and writes degrade to a cache miss on backend trouble; only
/// `invalidate` reports errors, and callers log and swallow them.
/// Staleness never fails a publish whose save succeeded.
#[async_trait]
pub trait RenderCache: Send + Sync {
    async fn get(&self, path: &str) -> Option<String>;
    async fn put(&self, path: &str, body: &str);
    async fn invalidate(&self, path: &str) -> Result<(), InvalidationError>;
}

/// Redis-backed cache for deployments with more than one instance.
pub struct RedisRenderCache {
    client: redis::Client,
}

impl RedisRenderCache {
    pub fn new(client: redis::Client) -> Self {
        RedisRenderCache { client }
    }

    fn key(path: &str) -> String {
        format!("render:{path}")
    }
}

#[async_trait]
impl RenderCache for RedisRenderCache {
    async fn get(&self, path: &str) -> Option<String> {
        let mut conn = match self.client.get_multiplexed_async_connection().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!("Redis unavailable, treating `{path}` as a cache miss: {e}");
                return None;
            }
        };
        match conn.get::<_, Option<String>>(Self::key(path)).await {
            Ok(body) => body,
            Err(e) => {
                warn!("Redis GET failed for `{path}`: {e}");
                None
            }
        }
    }

    async fn put(&self, path: &str, body: &str) {
        let mut conn = match self.client.get_multiplexed_async_connection().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!("Redis unavailable, skipping cache write for `{path}`: {e}");
                return;
            }
        };
        if let Err(e) = conn
            .set_ex::<_, _, ()>(Self::key(path), body, CACHE_TTL_SECS)
            .await
        {
            warn!("Redis SETEX failed for `{path}`: {e}");
        }
    }

    async fn invalidate(&self, path: &str) -> Result<(), InvalidationError> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| InvalidationError {
                path: path.to_string(),
                message: e.to_string(),
            })?;
        conn.del::<_, ()>(Self::key(path))
            .await
            .map_err(|e| InvalidationError {
                path: path.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }
}

/// Single-process fallback used in development and tests.
#[derive(Default)]
pub struct MemoryRenderCache {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryRenderCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RenderCache for MemoryRenderCache {
    async fn get(&self, path: &str) -> Option<String> {
        self.entries
            .lock()
            .expect("cache mutex poisoned")
            .get(path)
            .cloned()
    }

    async fn put(&self, path: &str, body: &str) {
        self.entries
            .lock()
            .expect("cache mutex poisoned")
            .insert(path.to_string(), body.to_string());
    }

    async fn invalidate(&self, path: &str) -> Result<(), InvalidationError> {
        self.entries
            .lock()
            .expect("cache mutex poisoned")
            .remove(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_cache_round_trip() {
        let cache = MemoryRenderCache::new();
        assert!(cache.get("/").await.is_none());
        cache.put("/", "body").await;
        assert_eq!(cache.get("/").await.as_deref(), Some("body"));
    }

    #[tokio::test]
    async fn test_memory_cache_invalidate_removes_entry() {
        let cache = MemoryRenderCache::new();
        cache.put("/projects", "body").await;
        cache.invalidate("/projects").await.unwrap();
        assert!(cache.get("/projects").await.is_none());
    }

    #[tokio::test]
    async fn test_invalidating_missing_path_is_ok() {
        let cache = MemoryRenderCache::new();
        assert!(cache.invalidate("/never-cached").await.is_ok());
    }

    #[test]
    fn test_redis_keys_are_prefixed() {
        assert_eq!(RedisRenderCache::key("/projects"), "render:/projects");
    }
}
