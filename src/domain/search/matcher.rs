//! Coarse multi-field candidate filter
//!
//! The filter is an explicit array of per-field predicates evaluated in
//! memory against each entry, so it stays testable and independent of
//! whatever storage backs the entry store. It decides candidacy only; rank
//! comes from the scorer.

use serde::{Deserialize, Serialize};

use super::query::FieldHint;
use crate::domain::entry::IdiomEntry;

/// The searchable attributes of an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchField {
    DisplayForm,
    PhoneticPrimary,
    PhoneticSecondary,
    Definition,
    Provenance,
}

impl MatchField {
    fn extract<'a>(&self, entry: &'a IdiomEntry) -> &'a str {
        match self {
            Self::DisplayForm => entry.display_form(),
            Self::PhoneticPrimary => entry.phonetic_primary(),
            Self::PhoneticSecondary => entry.phonetic_secondary(),
            Self::Definition => entry.definition(),
            Self::Provenance => entry.provenance(),
        }
    }
}

/// A single containment test against one field
#[derive(Debug, Clone, Copy)]
pub struct FieldPredicate {
    field: MatchField,
}

impl FieldPredicate {
    pub fn field(&self) -> MatchField {
        self.field
    }

    /// Case-insensitive substring containment; `q` must already be normalized
    pub fn matches(&self, entry: &IdiomEntry, q: &str) -> bool {
        self.field.extract(entry).to_lowercase().contains(q)
    }
}

/// The predicate set a query runs against: every searchable field, or only
/// the hinted one (a phonetic hint covers both transliterations)
pub fn field_predicates(hint: Option<FieldHint>) -> Vec<FieldPredicate> {
    let fields: &[MatchField] = match hint {
        None => &[
            MatchField::DisplayForm,
            MatchField::PhoneticPrimary,
            MatchField::PhoneticSecondary,
            MatchField::Definition,
            MatchField::Provenance,
        ],
        Some(FieldHint::DisplayForm) => &[MatchField::DisplayForm],
        Some(FieldHint::Phonetic) => &[MatchField::PhoneticPrimary, MatchField::PhoneticSecondary],
        Some(FieldHint::Definition) => &[MatchField::Definition],
        Some(FieldHint::Provenance) => &[MatchField::Provenance],
    };

    fields.iter().map(|&field| FieldPredicate { field }).collect()
}

/// Whether an entry passes the coarse filter. An empty query matches
/// everything; otherwise at least one predicate must hold.
pub fn is_candidate(entry: &IdiomEntry, q: &str, hint: Option<FieldHint>) -> bool {
    if q.is_empty() {
        return true;
    }

    field_predicates(hint).iter().any(|p| p.matches(entry, q))
}

/// The coarse OR-of-contains filter handed to the entry store. Stores that
/// cannot evaluate it natively can call [`CandidatePredicate::matches`] on
/// each row; the service re-applies the same test in memory either way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidatePredicate {
    /// Normalized query text; empty means match-all
    query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field_hint: Option<FieldHint>,
}

impl CandidatePredicate {
    /// `query` must already be normalized (see [`super::query::normalize`])
    pub fn new(query: impl Into<String>, field_hint: Option<FieldHint>) -> Self {
        Self {
            query: query.into(),
            field_hint,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn field_hint(&self) -> Option<FieldHint> {
        self.field_hint
    }

    pub fn is_match_all(&self) -> bool {
        self.query.is_empty()
    }

    pub fn matches(&self, entry: &IdiomEntry) -> bool {
        is_candidate(entry, &self.query, self.field_hint)
    }
}
