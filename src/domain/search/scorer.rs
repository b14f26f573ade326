//! Relevance scoring
//!
//! A score is the sum of independent weighted contributions; an entry may
//! satisfy several at once. Within one field only the highest tier counts
//! (an exact display match does not also collect the prefix and contains
//! tiers), but different fields stack additively.

use std::collections::HashSet;

use unicode_segmentation::UnicodeSegmentation;

use super::matcher::is_candidate;
use super::query::FieldHint;
use crate::domain::entry::IdiomEntry;

pub const DISPLAY_EXACT: u32 = 1000;
pub const DISPLAY_PREFIX: u32 = 800;
pub const DISPLAY_CONTAINS: u32 = 600;

pub const PHONETIC_EXACT: u32 = 500;
pub const PHONETIC_PREFIX: u32 = 400;
pub const PHONETIC_CONTAINS: u32 = 300;

pub const DEFINITION_CONTAINS: u32 = 100;
/// Per distinct grapheme of the query found anywhere in the definition
pub const DEFINITION_OVERLAP_STEP: u32 = 50;

pub const PROVENANCE_CONTAINS: u32 = 50;

/// Added when the hinted field itself matched
pub const FIELD_HINT_BONUS: u32 = 200;

/// Per grapheme of the query, once the query is at least two graphemes long
pub const QUERY_LENGTH_STEP: u32 = 10;

/// Number of extended grapheme clusters in a string. Pagination-visible
/// "length" everywhere in the engine means this, not bytes.
pub fn grapheme_len(text: &str) -> usize {
    text.graphemes(true).count()
}

/// Highest applicable tier for one field: exact beats prefix beats contains.
fn containment_tier(field: &str, q: &str, exact: u32, prefix: u32, contains: u32) -> u32 {
    let field = field.to_lowercase();

    if field == q {
        exact
    } else if field.starts_with(q) {
        prefix
    } else if field.contains(q) {
        contains
    } else {
        0
    }
}

/// Distinct graphemes of `q` that individually appear in `text`
fn distinct_grapheme_overlap(q: &str, text: &str) -> u32 {
    let distinct: HashSet<&str> = q.graphemes(true).collect();

    distinct.into_iter().filter(|g| text.contains(g)).count() as u32
}

/// Relevance score for a candidate. `q` must already be normalized; an empty
/// query scores 0 (match-all ordering then falls back to tie-break rules).
pub fn score(entry: &IdiomEntry, q: &str, hint: Option<FieldHint>) -> u32 {
    if q.is_empty() {
        return 0;
    }

    let mut total = containment_tier(
        entry.display_form(),
        q,
        DISPLAY_EXACT,
        DISPLAY_PREFIX,
        DISPLAY_CONTAINS,
    );

    // Best of the two transliterations; they describe the same pronunciation
    let phonetic = containment_tier(
        entry.phonetic_primary(),
        q,
        PHONETIC_EXACT,
        PHONETIC_PREFIX,
        PHONETIC_CONTAINS,
    )
    .max(containment_tier(
        entry.phonetic_secondary(),
        q,
        PHONETIC_EXACT,
        PHONETIC_PREFIX,
        PHONETIC_CONTAINS,
    ));
    total += phonetic;

    let definition = entry.definition().to_lowercase();
    if definition.contains(q) {
        total += DEFINITION_CONTAINS + DEFINITION_OVERLAP_STEP * distinct_grapheme_overlap(q, &definition);
    }

    if entry.provenance().to_lowercase().contains(q) {
        total += PROVENANCE_CONTAINS;
    }

    if let Some(hint) = hint {
        if is_candidate(entry, q, Some(hint)) {
            total += FIELD_HINT_BONUS;
        }
    }

    // Length reward only sharpens an existing match; a zero-total entry is
    // not a candidate and must stay at zero
    let q_len = grapheme_len(q);
    if total > 0 && q_len >= 2 {
        total += QUERY_LENGTH_STEP * q_len as u32;
    }

    total
}
