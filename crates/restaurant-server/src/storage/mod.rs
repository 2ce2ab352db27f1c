//! Storage layer
//!
//! Record stores: SQLite (embedded) or DashMap (in-memory).
//! Caches: DashMap (in-process) or Redis (shared).

pub mod db;
pub mod memory;
pub mod redis_cache;

pub use db::SqliteStore;
pub use memory::{MemoryCache, MemoryStore};
pub use redis_cache::RedisCache;
