//! Time-bounded cache envelope
//!
//! Wraps any [`KeyValueStore`] with per-entry expiry, canonical key
//! generation, and failure absorption. A broken backing store never blocks
//! the primary compute path - every cache failure is logged and degraded to
//! a miss (on reads) or a no-op (on writes), so callers lose the speed-up
//! and nothing else.
//!
//! Entry lifecycle: absent, set makes it fresh, the TTL elapsing makes it
//! stale, and the next get (or a clear) removes it.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::cache::{
    CacheKeyParams, Clock, DefaultKeyGenerator, KeyGenerator, KeyValueStore, SystemClock,
};

/// Default entry lifetime
pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);

/// Configuration for the TTL envelope
#[derive(Debug, Clone)]
pub struct TtlCacheConfig {
    /// Lifetime stamped onto new entries
    pub ttl: Duration,
    /// Disabled caches report every get as a miss and drop every set
    pub enabled: bool,
}

impl Default for TtlCacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            enabled: true,
        }
    }
}

impl TtlCacheConfig {
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Stored envelope around a cached payload
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEnvelope<T> {
    payload: T,
    /// Millis since epoch at set time
    created_at: u64,
    /// `created_at + ttl`
    expires_at: u64,
}

impl<T> CacheEnvelope<T> {
    fn is_expired(&self, now_millis: u64) -> bool {
        now_millis > self.expires_at
    }
}

/// TTL cache over a pluggable backing store
#[derive(Debug)]
pub struct TtlCache {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    key_generator: DefaultKeyGenerator,
    config: TtlCacheConfig,
}

impl TtlCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_config(store, TtlCacheConfig::default())
    }

    pub fn with_config(store: Arc<dyn KeyValueStore>, config: TtlCacheConfig) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            key_generator: DefaultKeyGenerator::hashed(),
            config,
        }
    }

    /// Swap the time source (tests use a manual clock)
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.config.ttl
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Canonical store key for a namespace and parameter set. Identical
    /// parameters always yield the identical key, whatever order the
    /// components were assembled in.
    pub fn make_key(&self, namespace: &str, params: &CacheKeyParams) -> String {
        self.key_generator.generate_with_namespace(namespace, params)
    }

    /// Cached payload, or `None` on miss, expiry, or any cache failure.
    /// Expired entries are evicted on first observation.
    pub async fn get<T: DeserializeOwned>(
        &self,
        namespace: &str,
        params: &CacheKeyParams,
    ) -> Option<T> {
        if !self.config.enabled {
            return None;
        }

        let key = self.make_key(namespace, params);

        let raw = match self.store.read(&key).await {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(key = %key, error = %e, "cache read failed, treating as miss");
                return None;
            }
        };

        let envelope: CacheEnvelope<T> = match serde_json::from_str(&raw) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(key = %key, error = %e, "undecodable cache entry, evicting");
                self.evict(&key).await;
                return None;
            }
        };

        if envelope.is_expired(self.clock.now_millis()) {
            debug!(key = %key, "cache entry expired, evicting");
            self.evict(&key).await;
            return None;
        }

        debug!(key = %key, "cache hit");
        Some(envelope.payload)
    }

    /// Stores a payload stamped with the configured TTL. Failures are logged
    /// and swallowed; the caller's result is already computed.
    pub async fn set<T: Serialize>(&self, namespace: &str, params: &CacheKeyParams, payload: &T) {
        if !self.config.enabled {
            return;
        }

        let key = self.make_key(namespace, params);
        let created_at = self.clock.now_millis();
        let envelope = CacheEnvelope {
            payload,
            created_at,
            expires_at: created_at + self.config.ttl.as_millis() as u64,
        };

        let raw = match serde_json::to_string(&envelope) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key = %key, error = %e, "failed to encode cache entry, skipping");
                return;
            }
        };

        if let Err(e) = self.store.write(&key, &raw).await {
            warn!(key = %key, error = %e, "cache write failed, skipping");
        }
    }

    /// Removes one entry, reporting whether it was present
    pub async fn remove(&self, namespace: &str, params: &CacheKeyParams) -> bool {
        let key = self.make_key(namespace, params);

        match self.store.read(&key).await {
            Ok(Some(_)) => {
                self.evict(&key).await;
                true
            }
            Ok(None) => false,
            Err(e) => {
                warn!(key = %key, error = %e, "cache remove failed");
                false
            }
        }
    }

    /// Removes every entry under `namespace`, or the whole cache when no
    /// namespace is given. Returns the number of entries removed.
    pub async fn clear(&self, namespace: Option<&str>) -> usize {
        match namespace {
            None => {
                let count = self.store.len().await.unwrap_or(0);

                if let Err(e) = self.store.clear().await {
                    warn!(error = %e, "cache clear failed");
                    return 0;
                }
                count
            }
            Some(namespace) => {
                let prefix = format!("{}:", namespace);
                let keys = match self.store.list_keys(&prefix).await {
                    Ok(keys) => keys,
                    Err(e) => {
                        warn!(namespace = %namespace, error = %e, "cache namespace clear failed");
                        return 0;
                    }
                };

                let mut removed = 0;
                for key in keys {
                    if self.store.remove(&key).await.unwrap_or(false) {
                        removed += 1;
                    }
                }
                removed
            }
        }
    }

    /// Approximate number of stored entries (diagnostic)
    pub async fn entry_count(&self) -> usize {
        self.store.len().await.unwrap_or(0)
    }

    /// Rough footprint in bytes: key and payload lengths summed. Diagnostic
    /// only; never part of any correctness decision.
    pub async fn estimate_size(&self) -> u64 {
        let keys = match self.store.list_keys("").await {
            Ok(keys) => keys,
            Err(_) => return 0,
        };

        let mut bytes = 0u64;
        for key in keys {
            bytes += key.len() as u64;

            if let Ok(Some(value)) = self.store.read(&key).await {
                bytes += value.len() as u64;
            }
        }
        bytes
    }

    async fn evict(&self, key: &str) {
        if let Err(e) = self.store.remove(key).await {
            warn!(key = %key, error = %e, "cache eviction failed");
        }
    }
}
