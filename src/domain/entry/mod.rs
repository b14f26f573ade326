//! Entry domain - dictionary records and their read-only store

mod entity;
mod repository;

pub use entity::{EntryId, EntryValidationError, IdiomEntry};
pub use repository::in_memory::InMemoryEntryStore;
pub use repository::EntryStore;

#[cfg(test)]
pub use repository::mock::MockEntryStore;
