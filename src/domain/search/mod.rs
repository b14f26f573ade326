//! Search pipeline - normalization, candidate filtering, scoring, ranking,
//! pagination. Everything here is synchronous and allocation-local to one
//! request; the stages run in a fixed order and the ranker always sees the
//! entire filtered candidate set.

mod matcher;
mod paginator;
mod query;
mod ranker;
mod scorer;

pub use matcher::{field_predicates, is_candidate, CandidatePredicate, FieldPredicate, MatchField};
pub use paginator::{paginate, Page};
pub use query::{normalize, FieldHint, SearchQuery, DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
pub use ranker::{rank, ScoredMatch};
pub use scorer::{grapheme_len, score};
