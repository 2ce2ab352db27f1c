//! Record store trait for persistence

use crate::Result;
use async_trait::async_trait;
use restaurant_types::Restaurant;

/// Attribute filter applied during a full scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanFilter {
    pub region: String,
    pub cuisine: Option<String>,
}

impl ScanFilter {
    pub fn region(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            cuisine: None,
        }
    }

    pub fn region_and_cuisine(region: impl Into<String>, cuisine: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            cuisine: Some(cuisine.into()),
        }
    }

    pub fn matches(&self, restaurant: &Restaurant) -> bool {
        restaurant.region == self.region
            && self
                .cuisine
                .as_ref()
                .map(|c| restaurant.cuisine == *c)
                .unwrap_or(true)
    }
}

/// Authoritative keyed store of restaurant records
///
/// Every method is an independent single-key (or single-query) call; callers
/// get no transactional guarantees across calls.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get(&self, name: &str) -> Result<Option<Restaurant>>;

    /// Insert a record. Existence is checked by the caller beforehand.
    async fn put(&self, restaurant: &Restaurant) -> Result<()>;

    /// Overwrite rating and count. Returns false when no record was updated.
    async fn update_rating(&self, name: &str, rating: f64, num_ratings: u32) -> Result<bool>;

    async fn delete(&self, name: &str) -> Result<()>;

    /// Secondary index lookup: highest rated first, at most `limit` rows
    async fn query_by_cuisine(&self, cuisine: &str, limit: usize) -> Result<Vec<Restaurant>>;

    /// Full scan filtered by attribute, in no particular order
    async fn scan(&self, filter: &ScanFilter) -> Result<Vec<Restaurant>>;

    async fn count(&self) -> Result<u64>;

    /// Short backend name for diagnostics
    fn backend(&self) -> &'static str;
}
