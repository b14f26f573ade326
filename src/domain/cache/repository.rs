//! Cache backing-store trait
//!
//! A plain persistent key/value surface. Expiry, key canonicalization, and
//! failure absorption all live a layer up in the TTL envelope; a backing
//! store only has to move strings and keep per-key operations atomic with
//! respect to each other. Entries are independent, so no cross-key
//! transaction is ever required.

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::DomainError;

/// Generic key/value surface backing the cache
#[async_trait]
pub trait KeyValueStore: Send + Sync + Debug {
    /// Reads the value stored under `key`
    async fn read(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Writes `value` under `key`, replacing any previous value
    async fn write(&self, key: &str, value: &str) -> Result<(), DomainError>;

    /// Removes `key`, reporting whether it was present
    async fn remove(&self, key: &str) -> Result<bool, DomainError>;

    /// All keys starting with `prefix`; an empty prefix lists every key
    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>, DomainError>;

    /// Removes every key
    async fn clear(&self) -> Result<(), DomainError>;

    /// Approximate number of stored keys
    async fn len(&self) -> Result<usize, DomainError> {
        Ok(self.list_keys("").await?.len())
    }
}
