//! Cache infrastructure - backing stores and the TTL envelope

mod in_memory;
mod ttl;

pub use in_memory::{InMemoryStore, InMemoryStoreConfig};
pub use ttl::{TtlCache, TtlCacheConfig, DEFAULT_TTL};
