//! Entry store trait
//!
//! The read-only record source behind the search engine. The engine is
//! agnostic to where entries live; a store only has to answer the coarse
//! candidate predicate and point lookups. Ranking never happens here.

use async_trait::async_trait;

use super::{EntryId, IdiomEntry};
use crate::domain::search::CandidatePredicate;
use crate::domain::DomainError;

/// Repository trait for the dictionary record source
#[async_trait]
pub trait EntryStore: Send + Sync + std::fmt::Debug {
    /// All entries passing the coarse OR-of-contains predicate. A match-all
    /// predicate returns the full record set.
    async fn fetch_candidates(
        &self,
        predicate: &CandidatePredicate,
    ) -> Result<Vec<IdiomEntry>, DomainError>;

    /// Point lookup; absence is `Ok(None)`, not an error
    async fn fetch_by_id(&self, id: &EntryId) -> Result<Option<IdiomEntry>, DomainError>;
}

/// In-memory implementation of EntryStore
pub mod in_memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory entry store for tests, seeding, and development
    #[derive(Debug, Default)]
    pub struct InMemoryEntryStore {
        entries: Mutex<HashMap<String, IdiomEntry>>,
    }

    impl InMemoryEntryStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_entry(self, entry: IdiomEntry) -> Self {
            self.entries
                .lock()
                .unwrap()
                .insert(entry.id().to_string(), entry);
            self
        }

        pub fn with_entries(self, entries: Vec<IdiomEntry>) -> Self {
            let mut map = self.entries.lock().unwrap();

            for entry in entries {
                map.insert(entry.id().to_string(), entry);
            }
            drop(map);
            self
        }

        pub fn len(&self) -> usize {
            self.entries.lock().unwrap().len()
        }

        pub fn is_empty(&self) -> bool {
            self.entries.lock().unwrap().is_empty()
        }
    }

    #[async_trait]
    impl EntryStore for InMemoryEntryStore {
        async fn fetch_candidates(
            &self,
            predicate: &CandidatePredicate,
        ) -> Result<Vec<IdiomEntry>, DomainError> {
            Ok(self
                .entries
                .lock()
                .unwrap()
                .values()
                .filter(|e| predicate.matches(e))
                .cloned()
                .collect())
        }

        async fn fetch_by_id(&self, id: &EntryId) -> Result<Option<IdiomEntry>, DomainError> {
            Ok(self.entries.lock().unwrap().get(id.as_str()).cloned())
        }
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Mock entry store with error injection and fetch counting, so tests
    /// can assert how often the upstream source was actually hit
    #[derive(Debug, Default)]
    pub struct MockEntryStore {
        entries: Mutex<HashMap<String, IdiomEntry>>,
        error: Mutex<Option<String>>,
        candidate_fetches: AtomicUsize,
        id_fetches: AtomicUsize,
    }

    impl MockEntryStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_entry(self, entry: IdiomEntry) -> Self {
            self.entries
                .lock()
                .unwrap()
                .insert(entry.id().to_string(), entry);
            self
        }

        pub fn with_entries(self, entries: Vec<IdiomEntry>) -> Self {
            {
                let mut map = self.entries.lock().unwrap();
                for entry in entries {
                    map.insert(entry.id().to_string(), entry);
                }
            }
            self
        }

        pub fn with_error(self, error: impl Into<String>) -> Self {
            *self.error.lock().unwrap() = Some(error.into());
            self
        }

        pub fn candidate_fetches(&self) -> usize {
            self.candidate_fetches.load(Ordering::SeqCst)
        }

        pub fn id_fetches(&self) -> usize {
            self.id_fetches.load(Ordering::SeqCst)
        }

        fn check_error(&self) -> Result<(), DomainError> {
            if let Some(error) = self.error.lock().unwrap().clone() {
                return Err(DomainError::store(error));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl EntryStore for MockEntryStore {
        async fn fetch_candidates(
            &self,
            predicate: &CandidatePredicate,
        ) -> Result<Vec<IdiomEntry>, DomainError> {
            self.candidate_fetches.fetch_add(1, Ordering::SeqCst);
            self.check_error()?;

            Ok(self
                .entries
                .lock()
                .unwrap()
                .values()
                .filter(|e| predicate.matches(e))
                .cloned()
                .collect())
        }

        async fn fetch_by_id(&self, id: &EntryId) -> Result<Option<IdiomEntry>, DomainError> {
            self.id_fetches.fetch_add(1, Ordering::SeqCst);
            self.check_error()?;

            Ok(self.entries.lock().unwrap().get(id.as_str()).cloned())
        }
    }
}
