//! In-memory stores using DashMap
//!
//! `MemoryCache` is the in-process cache used when no Redis URL is
//! configured. `MemoryStore` stands in for the record table in tests and
//! throwaway deployments.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use restaurant_core::{
    top_rated, CacheStore, RecordStore, Restaurant, RestaurantError, Result, ScanFilter,
};
use std::sync::Arc;

/// Simple in-memory cache, entries live until deleted
pub struct MemoryCache {
    data: Arc<DashMap<String, Vec<u8>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self {
            data: Arc::new(DashMap::new()),
        }
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.data.get(key).map(|entry| entry.value().clone()))
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.data.insert(key.to_string(), value);
        Ok(())
    }

    async fn add(&self, key: &str, value: Vec<u8>) -> Result<bool> {
        match self.data.entry(key.to_string()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(value);
                Ok(true)
            }
        }
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.data.remove(key);
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

/// In-memory record table keyed by restaurant name
pub struct MemoryStore {
    rows: DashMap<String, Restaurant>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            rows: DashMap::new(),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn get(&self, name: &str) -> Result<Option<Restaurant>> {
        Ok(self.rows.get(name).map(|r| r.value().clone()))
    }

    async fn put(&self, restaurant: &Restaurant) -> Result<()> {
        match self.rows.entry(restaurant.name.clone()) {
            Entry::Occupied(_) => Err(RestaurantError::Conflict(restaurant.name.clone())),
            Entry::Vacant(slot) => {
                slot.insert(restaurant.clone());
                Ok(())
            }
        }
    }

    async fn update_rating(&self, name: &str, rating: f64, num_ratings: u32) -> Result<bool> {
        match self.rows.get_mut(name) {
            Some(mut row) => {
                row.rating = rating;
                row.num_ratings = num_ratings;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, name: &str) -> Result<()> {
        self.rows.remove(name);
        Ok(())
    }

    async fn query_by_cuisine(&self, cuisine: &str, limit: usize) -> Result<Vec<Restaurant>> {
        let matching = self
            .rows
            .iter()
            .filter(|r| r.cuisine == cuisine)
            .map(|r| r.value().clone())
            .collect();

        Ok(top_rated(matching, limit))
    }

    async fn scan(&self, filter: &ScanFilter) -> Result<Vec<Restaurant>> {
        Ok(self
            .rows
            .iter()
            .filter(|r| filter.matches(r.value()))
            .map(|r| r.value().clone())
            .collect())
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.rows.len() as u64)
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
