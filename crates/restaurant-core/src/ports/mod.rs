//! Port traits (interfaces) for dependency injection

pub mod cache;
pub mod storage;

pub use cache::CacheStore;
pub use storage::{RecordStore, ScanFilter};
