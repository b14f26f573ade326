//! Search orchestration with a transparent result cache
//!
//! The pipeline per request: clamp and normalize the query, probe the cache,
//! on a miss fetch coarse candidates from the entry store (deadline-bound),
//! filter, score and rank them in memory over the entire candidate set, slice
//! the requested page, write it back to the cache, return it. A second
//! identical call inside the TTL window answers from the cache and never
//! touches the entry store.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info};

use crate::domain::cache::CacheKeyParams;
use crate::domain::entry::{EntryId, EntryStore, IdiomEntry};
use crate::domain::search::{
    paginate, rank, score, CandidatePredicate, Page, ScoredMatch, SearchQuery,
};
use crate::domain::DomainError;
use crate::infrastructure::cache::TtlCache;

/// Namespace for cached result pages
pub const SEARCH_NAMESPACE: &str = "search";
/// Namespace for cached single-entry lookups
pub const ENTRY_NAMESPACE: &str = "entry";

/// Configuration for the search service
#[derive(Debug, Clone)]
pub struct SearchServiceConfig {
    /// Upper bound on one entry-store call; the store is the only
    /// latency-bearing step in the pipeline
    pub fetch_timeout: Duration,
}

impl Default for SearchServiceConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(10),
        }
    }
}

impl SearchServiceConfig {
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }
}

/// Cache diagnostics
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub entries: usize,
    pub estimated_bytes: u64,
    pub enabled: bool,
}

/// Search-and-rank engine over a read-only entry store
#[derive(Debug)]
pub struct SearchService {
    store: Arc<dyn EntryStore>,
    cache: TtlCache,
    config: SearchServiceConfig,
}

impl SearchService {
    pub fn new(store: Arc<dyn EntryStore>, cache: TtlCache) -> Self {
        Self::with_config(store, cache, SearchServiceConfig::default())
    }

    pub fn with_config(
        store: Arc<dyn EntryStore>,
        cache: TtlCache,
        config: SearchServiceConfig,
    ) -> Self {
        Self {
            store,
            cache,
            config,
        }
    }

    /// Runs a search and returns one page of ranked entries.
    ///
    /// Unusable pagination values are silently clamped to defaults. An empty
    /// query matches everything, ordered purely by tie-break rules. The only
    /// error a caller must handle is [`DomainError::Store`].
    pub async fn search(&self, query: SearchQuery) -> Result<Page<IdiomEntry>, DomainError> {
        let query = query.clamped();
        let q = query.normalized();
        let params = Self::search_key_params(&query, &q);

        if let Some(page) = self.cache.get::<Page<IdiomEntry>>(SEARCH_NAMESPACE, &params).await {
            debug!(query = %q, page = query.page, "search served from cache");
            return Ok(page);
        }

        let predicate = CandidatePredicate::new(q.clone(), query.field_hint);
        let fetched = self.fetch_candidates(&predicate).await?;
        let fetched_count = fetched.len();

        // The store filter is coarse; the predicate re-applied here is the
        // authoritative candidacy test
        let mut matches: Vec<ScoredMatch> = fetched
            .into_iter()
            .filter(|entry| predicate.matches(entry))
            .map(|entry| {
                let relevance = score(&entry, &q, query.field_hint);
                ScoredMatch::new(entry, relevance)
            })
            .collect();

        rank(&mut matches);

        let ranked: Vec<IdiomEntry> = matches.into_iter().map(ScoredMatch::into_entry).collect();
        let page = paginate(ranked, query.page, query.page_size);

        info!(
            query = %q,
            fetched = fetched_count,
            total = page.total,
            page = page.page,
            "search computed"
        );

        self.cache.set(SEARCH_NAMESPACE, &params, &page).await;
        Ok(page)
    }

    /// Single-entry lookup with the same TTL policy as search results.
    /// Absence is `Ok(None)`, never an error.
    pub async fn get_by_id(&self, id: &EntryId) -> Result<Option<IdiomEntry>, DomainError> {
        let params = CacheKeyParams::new(id.as_str());

        if let Some(entry) = self.cache.get::<IdiomEntry>(ENTRY_NAMESPACE, &params).await {
            debug!(id = %id, "entry served from cache");
            return Ok(Some(entry));
        }

        let fetched = tokio::time::timeout(self.config.fetch_timeout, self.store.fetch_by_id(id))
            .await
            .map_err(|_| {
                error!(id = %id, "entry store lookup timed out");
                DomainError::store(format!("entry store lookup for '{}' timed out", id))
            })??;

        if let Some(entry) = &fetched {
            self.cache.set(ENTRY_NAMESPACE, &params, entry).await;
        }

        Ok(fetched)
    }

    /// Drops every cached result page (e.g. after a dictionary update)
    pub async fn invalidate_search_results(&self) -> usize {
        self.cache.clear(Some(SEARCH_NAMESPACE)).await
    }

    /// Drops one cached entry lookup
    pub async fn invalidate_entry(&self, id: &EntryId) -> bool {
        self.cache
            .remove(ENTRY_NAMESPACE, &CacheKeyParams::new(id.as_str()))
            .await
    }

    /// Drops the entire cache
    pub async fn clear_cache(&self) {
        self.cache.clear(None).await;
    }

    pub async fn cache_stats(&self) -> CacheStats {
        CacheStats {
            entries: self.cache.entry_count().await,
            estimated_bytes: self.cache.estimate_size().await,
            enabled: self.cache.is_enabled(),
        }
    }

    fn search_key_params(query: &SearchQuery, normalized: &str) -> CacheKeyParams {
        let mut params = CacheKeyParams::new(normalized)
            .with_component("page", query.page.to_string())
            .with_component("size", query.page_size.to_string());

        if let Some(hint) = query.field_hint {
            params = params.with_component("hint", hint.as_str());
        }

        params
    }

    async fn fetch_candidates(
        &self,
        predicate: &CandidatePredicate,
    ) -> Result<Vec<IdiomEntry>, DomainError> {
        tokio::time::timeout(
            self.config.fetch_timeout,
            self.store.fetch_candidates(predicate),
        )
        .await
        .map_err(|_| {
            error!("entry store fetch timed out");
            DomainError::store("entry store fetch timed out")
        })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::{ManualClock, MockKeyValueStore};
    use crate::domain::entry::MockEntryStore;
    use crate::domain::search::FieldHint;
    use crate::infrastructure::cache::{TtlCacheConfig, DEFAULT_TTL};

    fn entry(id: &str, display: &str) -> IdiomEntry {
        IdiomEntry::new(EntryId::new(id).unwrap(), display)
    }

    fn seed() -> Vec<IdiomEntry> {
        vec![
            entry("e1", "画龙点睛")
                .with_phonetic_primary("huà lóng diǎn jīng")
                .with_definition("the stroke that brings the dragon to life")
                .with_provenance("历代名画记"),
            entry("e2", "温故知新")
                .with_phonetic_primary("wēn gù zhī xīn")
                .with_definition("review the old to learn the new")
                .with_provenance("论语"),
        ]
    }

    struct Harness {
        service: SearchService,
        store: Arc<MockEntryStore>,
        clock: Arc<ManualClock>,
    }

    fn harness(entries: Vec<IdiomEntry>) -> Harness {
        let store = Arc::new(MockEntryStore::new().with_entries(entries));
        let clock = Arc::new(ManualClock::new(0));
        let cache = TtlCache::new(Arc::new(MockKeyValueStore::new())).with_clock(clock.clone());

        Harness {
            service: SearchService::new(store.clone(), cache),
            store,
            clock,
        }
    }

    #[tokio::test]
    async fn test_single_match_page() {
        // Scenario: two entries, query hits exactly one
        let h = harness(seed());

        let page = h.service.search(SearchQuery::new("龙")).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id().as_str(), "e1");
        assert_eq!(page.total, 1);
        assert_eq!(page.total_pages, 1);
        assert!(!page.has_more);
    }

    #[tokio::test]
    async fn test_empty_query_matches_all_and_paginates() {
        let entries: Vec<IdiomEntry> = (1..=45)
            .map(|i| entry(&format!("e{:02}", i), &format!("短语{:02}", i)))
            .collect();
        let h = harness(entries);

        let first = h
            .service
            .search(SearchQuery::new("").with_page_size(20))
            .await
            .unwrap();
        assert_eq!(first.items.len(), 20);
        assert_eq!(first.total, 45);
        assert_eq!(first.total_pages, 3);
        assert!(first.has_more);

        let last = h
            .service
            .search(SearchQuery::new("").with_page(3).with_page_size(20))
            .await
            .unwrap();
        assert_eq!(last.items.len(), 5);
        assert!(!last.has_more);
    }

    #[tokio::test]
    async fn test_scores_non_increasing_and_ties_deterministic() {
        let entries = vec![
            entry("b-2", "一龙"),
            entry("a-1", "一龙"), // homonym of b-2
            entry("c-3", "龙"),
            entry("d-4", "长长的龙的故事"),
        ];
        let h = harness(entries);

        let run = || h.service.search(SearchQuery::new("龙").with_page_size(10));

        let page = run().await.unwrap();
        let ids: Vec<&str> = page.items.iter().map(|e| e.id().as_str()).collect();

        // exact "龙" first, then the two homonyms (same score, same length)
        // in id order, then the longer contains-match
        assert_eq!(ids, vec!["c-3", "a-1", "b-2", "d-4"]);

        // reproducible across runs
        let again = run().await.unwrap();
        assert_eq!(page, again);
    }

    #[tokio::test]
    async fn test_second_identical_search_hits_cache_with_zero_fetches() {
        let h = harness(seed());

        let first = h.service.search(SearchQuery::new("龙")).await.unwrap();
        assert_eq!(h.store.candidate_fetches(), 1);

        let second = h.service.search(SearchQuery::new("龙")).await.unwrap();
        assert_eq!(h.store.candidate_fetches(), 1); // zero new fetches
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_expired_cache_refetches() {
        let h = harness(seed());

        h.service.search(SearchQuery::new("龙")).await.unwrap();
        assert_eq!(h.store.candidate_fetches(), 1);

        h.clock.advance(DEFAULT_TTL + Duration::from_secs(60));

        h.service.search(SearchQuery::new("龙")).await.unwrap();
        assert_eq!(h.store.candidate_fetches(), 2);
    }

    #[tokio::test]
    async fn test_different_pages_are_distinct_cache_entries() {
        let entries: Vec<IdiomEntry> = (1..=30)
            .map(|i| entry(&format!("e{:02}", i), &format!("短语{:02}", i)))
            .collect();
        let h = harness(entries);

        let p1 = h
            .service
            .search(SearchQuery::new("").with_page(1).with_page_size(10))
            .await
            .unwrap();
        let p2 = h
            .service
            .search(SearchQuery::new("").with_page(2).with_page_size(10))
            .await
            .unwrap();
        assert_ne!(p1.items, p2.items);
        assert_eq!(h.store.candidate_fetches(), 2);
    }

    #[tokio::test]
    async fn test_invalid_pagination_is_clamped_not_rejected() {
        let h = harness(seed());

        let page = h
            .service
            .search(SearchQuery::new("龙").with_page(0).with_page_size(0))
            .await
            .unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 20);
    }

    #[tokio::test]
    async fn test_field_hint_narrows_results() {
        let h = harness(seed());

        // "论语" only appears in provenance
        let hinted = h
            .service
            .search(SearchQuery::new("论语").with_field_hint(FieldHint::DisplayForm))
            .await
            .unwrap();
        assert!(hinted.is_empty());

        let provenance = h
            .service
            .search(SearchQuery::new("论语").with_field_hint(FieldHint::Provenance))
            .await
            .unwrap();
        assert_eq!(provenance.items.len(), 1);
        assert_eq!(provenance.items[0].id().as_str(), "e2");
    }

    #[tokio::test]
    async fn test_store_failure_propagates_as_store_error() {
        let store = Arc::new(MockEntryStore::new().with_error("record source unreachable"));
        let cache = TtlCache::new(Arc::new(MockKeyValueStore::new()));
        let service = SearchService::new(store, cache);

        let err = service.search(SearchQuery::new("龙")).await.unwrap_err();
        assert!(err.is_store());
    }

    #[tokio::test]
    async fn test_broken_cache_never_blocks_search() {
        let store = Arc::new(MockEntryStore::new().with_entries(seed()));
        let cache = TtlCache::new(Arc::new(
            MockKeyValueStore::new().with_error("backing store down"),
        ));
        let service = SearchService::new(store.clone(), cache);

        // both calls compute; the cache only removed the speed-up
        let first = service.search(SearchQuery::new("龙")).await.unwrap();
        let second = service.search(SearchQuery::new("龙")).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(store.candidate_fetches(), 2);
    }

    #[tokio::test]
    async fn test_get_by_id_round_trip_and_cache() {
        let h = harness(seed());
        let id = EntryId::new("e1").unwrap();

        let found = h.service.get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(found.display_form(), "画龙点睛");
        assert_eq!(h.store.id_fetches(), 1);

        // second lookup is served from cache
        h.service.get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(h.store.id_fetches(), 1);

        // after expiry the store is consulted again
        h.clock.advance(DEFAULT_TTL + Duration::from_secs(60));
        h.service.get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(h.store.id_fetches(), 2);
    }

    #[tokio::test]
    async fn test_get_by_id_absent_is_none() {
        let h = harness(seed());

        let missing = h
            .service
            .get_by_id(&EntryId::new("nope").unwrap())
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_invalidation_scopes() {
        let h = harness(seed());
        let id = EntryId::new("e1").unwrap();

        h.service.search(SearchQuery::new("龙")).await.unwrap();
        h.service.get_by_id(&id).await.unwrap();

        // dropping search results leaves entry lookups cached
        let removed = h.service.invalidate_search_results().await;
        assert_eq!(removed, 1);

        h.service.get_by_id(&id).await.unwrap();
        assert_eq!(h.store.id_fetches(), 1);

        h.service.search(SearchQuery::new("龙")).await.unwrap();
        assert_eq!(h.store.candidate_fetches(), 2);

        // clearing everything forces both paths to recompute
        h.service.clear_cache().await;
        h.service.get_by_id(&id).await.unwrap();
        assert_eq!(h.store.id_fetches(), 2);
    }

    #[tokio::test]
    async fn test_cache_stats() {
        let h = harness(seed());

        let empty = h.service.cache_stats().await;
        assert_eq!(empty.entries, 0);
        assert!(empty.enabled);

        h.service.search(SearchQuery::new("龙")).await.unwrap();
        let stats = h.service.cache_stats().await;
        assert_eq!(stats.entries, 1);
        assert!(stats.estimated_bytes > 0);
    }

    #[tokio::test]
    async fn test_disabled_cache_recomputes_every_time() {
        let store = Arc::new(MockEntryStore::new().with_entries(seed()));
        let cache = TtlCache::with_config(
            Arc::new(MockKeyValueStore::new()),
            TtlCacheConfig::default().disabled(),
        );
        let service = SearchService::new(store.clone(), cache);

        service.search(SearchQuery::new("龙")).await.unwrap();
        service.search(SearchQuery::new("龙")).await.unwrap();
        assert_eq!(store.candidate_fetches(), 2);
    }

    #[tokio::test]
    async fn test_equivalent_raw_queries_share_one_cache_entry() {
        let h = harness(seed());

        h.service.search(SearchQuery::new("  龙  ")).await.unwrap();
        h.service.search(SearchQuery::new("龙")).await.unwrap();

        // normalization happens before key derivation
        assert_eq!(h.store.candidate_fetches(), 1);
    }
}
