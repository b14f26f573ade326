//! Cache key generation
//!
//! Keys must be canonical: two logically identical parameter sets must
//! produce the same key regardless of the order components were added in.
//! Components therefore live in a sorted map and the hash, if any, is taken
//! over the sorted join.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::hash::{Hash, Hasher};

/// Parameters a cache key is derived from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheKeyParams {
    /// Primary identifier (normalized query text, entry id, ...)
    primary: String,
    /// Secondary components, sorted by name
    components: BTreeMap<String, String>,
}

impl CacheKeyParams {
    pub fn new(primary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            components: BTreeMap::new(),
        }
    }

    pub fn with_component(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.components.insert(key.into(), value.into());
        self
    }

    pub fn primary(&self) -> &str {
        &self.primary
    }

    /// Canonical flat form: primary, then `name=value` pairs in name order
    fn canonical(&self) -> String {
        let mut parts = vec![self.primary.clone()];

        for (k, v) in &self.components {
            parts.push(format!("{}={}", k, v));
        }

        parts.join(":")
    }
}

/// Strategy for turning key parameters into a store key
pub trait KeyGenerator: Send + Sync + Debug {
    fn generate(&self, params: &CacheKeyParams) -> String;

    fn generate_with_namespace(&self, namespace: &str, params: &CacheKeyParams) -> String {
        format!("{}:{}", namespace, self.generate(params))
    }
}

/// Default generator: canonical join, optionally collapsed to a fixed-width
/// hash so arbitrary query text never leaks into store keys
#[derive(Debug, Clone, Default)]
pub struct DefaultKeyGenerator {
    use_hash: bool,
}

impl DefaultKeyGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hashed() -> Self {
        Self { use_hash: true }
    }

    fn hash_string(input: &str) -> u64 {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        input.hash(&mut hasher);
        hasher.finish()
    }
}

impl KeyGenerator for DefaultKeyGenerator {
    fn generate(&self, params: &CacheKeyParams) -> String {
        let canonical = params.canonical();

        if self.use_hash {
            format!("{:016x}", Self::hash_string(&canonical))
        } else {
            canonical
        }
    }
}
