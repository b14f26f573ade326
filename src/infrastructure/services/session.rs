//! Superseded-query protection
//!
//! A user can issue a new search before the previous one resolves. Every
//! issued query gets a monotonically increasing sequence number; at
//! write-back time the highest sequence wins, and a response arriving for an
//! older sequence is discarded rather than applied, so a slow store call can
//! never overwrite newer results with stale ones.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::domain::entry::IdiomEntry;
use crate::domain::search::{Page, SearchQuery};
use crate::domain::DomainError;

use super::search_service::SearchService;

/// Result of a sequenced search. `page` is `None` when a newer query was
/// applied while this one was in flight.
#[derive(Debug)]
pub struct SearchOutcome {
    pub seq: u64,
    pub page: Option<Page<IdiomEntry>>,
}

impl SearchOutcome {
    pub fn is_stale(&self) -> bool {
        self.page.is_none()
    }
}

/// Issues sequence numbers and enforces highest-sequence-wins write-back
/// over a shared [`SearchService`]
#[derive(Debug)]
pub struct SearchSession {
    service: Arc<SearchService>,
    issued: AtomicU64,
    applied: AtomicU64,
}

impl SearchSession {
    pub fn new(service: Arc<SearchService>) -> Self {
        Self {
            service,
            issued: AtomicU64::new(0),
            applied: AtomicU64::new(0),
        }
    }

    pub fn service(&self) -> &SearchService {
        &self.service
    }

    /// Reserves the next sequence number. Callers driving their own
    /// concurrency pair this with [`run`](Self::run); [`search`](Self::search)
    /// does both.
    pub fn issue(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Runs a previously issued query and applies highest-sequence-wins.
    pub async fn run(&self, seq: u64, query: SearchQuery) -> Result<SearchOutcome, DomainError> {
        let page = self.service.search(query).await?;

        if self.try_apply(seq) {
            Ok(SearchOutcome {
                seq,
                page: Some(page),
            })
        } else {
            debug!(seq, "discarding superseded search response");
            Ok(SearchOutcome { seq, page: None })
        }
    }

    /// Issues and runs in one step
    pub async fn search(&self, query: SearchQuery) -> Result<SearchOutcome, DomainError> {
        let seq = self.issue();
        self.run(seq, query).await
    }

    /// Highest sequence applied so far
    pub fn last_applied(&self) -> u64 {
        self.applied.load(Ordering::SeqCst)
    }

    fn try_apply(&self, seq: u64) -> bool {
        let mut current = self.applied.load(Ordering::SeqCst);

        loop {
            if seq <= current {
                return false;
            }

            match self.applied.compare_exchange(
                current,
                seq,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return true,
                Err(observed) => current = observed,
            }
        }
    }
}
