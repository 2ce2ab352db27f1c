//! Restaurant Core Library
//!
//! Error taxonomy, the store/cache port traits, and the small pieces of
//! arithmetic the service relies on (cache keys, limits, rating means).

// Re-export pure types from restaurant-types
pub use restaurant_types::*;

pub mod error;
pub mod keys;
pub mod ports;
pub mod query;
pub mod rating;

pub use error::{RestaurantError, Result};
pub use ports::{CacheStore, RecordStore, ScanFilter};
pub use query::{clamp_limit, top_rated, DEFAULT_LIMIT, MAX_LIMIT};
