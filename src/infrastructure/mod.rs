//! Infrastructure layer - concrete stores, the TTL cache, and services

pub mod cache;
pub mod logging;
pub mod services;
