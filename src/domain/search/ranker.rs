//! Deterministic total ordering of scored candidates

use super::scorer::grapheme_len;
use crate::domain::entry::IdiomEntry;

/// A candidate with its relevance score. Exists only for the duration of one
/// request; the display length is cached up front so the sort comparator
/// performs no per-comparison work beyond field reads.
#[derive(Debug, Clone)]
pub struct ScoredMatch {
    entry: IdiomEntry,
    score: u32,
    display_len: usize,
}

impl ScoredMatch {
    pub fn new(entry: IdiomEntry, score: u32) -> Self {
        let display_len = grapheme_len(entry.display_form());
        Self {
            entry,
            score,
            display_len,
        }
    }

    pub fn entry(&self) -> &IdiomEntry {
        &self.entry
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn display_len(&self) -> usize {
        self.display_len
    }

    pub fn into_entry(self) -> IdiomEntry {
        self.entry
    }
}

/// Orders candidates in place: score descending, then display form length
/// ascending (shorter phrases first), then display form lexicographic
/// ascending, then entry id ascending. The id step makes the order total
/// even between homonyms sharing identical display text.
pub fn rank(matches: &mut [ScoredMatch]) {
    matches.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.display_len.cmp(&b.display_len))
            .then_with(|| a.entry.display_form().cmp(b.entry.display_form()))
            .then_with(|| a.entry.id().cmp(b.entry.id()))
    });
}
