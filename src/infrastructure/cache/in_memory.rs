//! In-memory cache backing store using moka

use async_trait::async_trait;
use moka::future::Cache as MokaCache;

use crate::domain::cache::KeyValueStore;
use crate::domain::DomainError;

/// Configuration for the in-memory backing store
#[derive(Debug, Clone)]
pub struct InMemoryStoreConfig {
    /// Maximum number of entries before eviction kicks in
    pub max_capacity: u64,
}

impl Default for InMemoryStoreConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
        }
    }
}

impl InMemoryStoreConfig {
    pub fn with_max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = capacity;
        self
    }
}

/// Thread-safe in-memory key/value store backed by moka.
///
/// Per-key operations are atomic with respect to each other; expiry is not
/// handled here - the TTL envelope stamps and checks its own timestamps, this
/// store only bounds capacity.
#[derive(Debug)]
pub struct InMemoryStore {
    cache: MokaCache<String, String>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::with_config(InMemoryStoreConfig::default())
    }

    pub fn with_config(config: InMemoryStoreConfig) -> Self {
        Self {
            cache: MokaCache::builder()
                .max_capacity(config.max_capacity)
                .build(),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn read(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.cache.get(key).await)
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), DomainError> {
        self.cache.insert(key.to_string(), value.to_string()).await;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool, DomainError> {
        Ok(self.cache.remove(key).await.is_some())
    }

    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>, DomainError> {
        // Sync pending tasks so the iterator sees recent writes
        self.cache.run_pending_tasks().await;

        let cache = self.cache.clone();
        let prefix = prefix.to_string();

        // Iteration walks internal segments; keep it off the async workers
        tokio::task::spawn_blocking(move || {
            cache
                .iter()
                .filter_map(|(k, _)| {
                    let key: &str = k.as_ref();

                    if key.starts_with(&prefix) {
                        Some(key.to_string())
                    } else {
                        None
                    }
                })
                .collect()
        })
        .await
        .map_err(|e| DomainError::cache(format!("Failed to iterate cache keys: {}", e)))
    }

    async fn clear(&self) -> Result<(), DomainError> {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
        Ok(())
    }

    async fn len(&self) -> Result<usize, DomainError> {
        self.cache.run_pending_tasks().await;
        Ok(self.cache.entry_count() as usize)
    }
}
