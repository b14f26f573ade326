//! Idiom Search
//!
//! Search-and-rank core for a phrase-dictionary learning app, with support for:
//! - Multi-field candidate filtering over display form, transliterations,
//!   definition, and provenance
//! - Tiered relevance scoring with deterministic tie-breaks and pagination
//! - A transparent, time-bounded result cache over a pluggable backing store
//! - Superseded-query protection via monotonic sequence numbers
//!
//! This is a library boundary: it owns no network surface and stays agnostic
//! to how the record store and cache backing store are implemented.

pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::EngineConfig;

use std::sync::Arc;

use domain::entry::EntryStore;
use infrastructure::cache::{InMemoryStore, InMemoryStoreConfig, TtlCache, TtlCacheConfig};
use infrastructure::services::{SearchService, SearchServiceConfig, SearchSession};

/// Wires a [`SearchService`] over the given entry store, with an in-memory
/// cache backing store sized and timed per the configuration.
pub fn build_search_service(store: Arc<dyn EntryStore>, config: &EngineConfig) -> SearchService {
    let backing = InMemoryStore::with_config(
        InMemoryStoreConfig::default().with_max_capacity(config.cache.max_capacity),
    );

    let mut cache_config = TtlCacheConfig::default().with_ttl(config.cache.ttl());
    if !config.cache.enabled {
        cache_config = cache_config.disabled();
    }

    SearchService::with_config(
        store,
        TtlCache::with_config(Arc::new(backing), cache_config),
        SearchServiceConfig::default().with_fetch_timeout(config.search.fetch_timeout()),
    )
}

/// [`build_search_service`] plus the sequence guard for UI-driven callers
pub fn build_search_session(store: Arc<dyn EntryStore>, config: &EngineConfig) -> SearchSession {
    SearchSession::new(Arc::new(build_search_service(store, config)))
}
