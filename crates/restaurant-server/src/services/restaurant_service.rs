//! Restaurant service: record store access with an optional read-through cache
//!
//! The store is authoritative. The cache is consulted first on reads and
//! filled after store hits; writes invalidate only the per-name entry.
//! Listing entries are never invalidated, so a cached top-N list can lag
//! behind later creates, ratings and deletes.

use restaurant_core::{
    clamp_limit, keys, rating, top_rated, CacheStore, CreateRestaurantRequest, RecordStore,
    Restaurant, RestaurantError, RestaurantView, Result, ScanFilter,
};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct RestaurantService {
    store: Arc<dyn RecordStore>,
    /// `None` when caching is switched off
    cache: Option<Arc<dyn CacheStore>>,
}

impl RestaurantService {
    pub fn new(store: Arc<dyn RecordStore>, cache: Option<Arc<dyn CacheStore>>) -> Self {
        Self { store, cache }
    }

    pub fn cache_enabled(&self) -> bool {
        self.cache.is_some()
    }

    pub fn store_backend(&self) -> &'static str {
        self.store.backend()
    }

    pub fn cache_backend(&self) -> Option<&'static str> {
        self.cache.as_ref().map(|c| c.backend())
    }

    pub async fn count(&self) -> Result<u64> {
        self.store.count().await
    }

    pub async fn create(&self, req: CreateRestaurantRequest) -> Result<()> {
        if self.store.get(&req.name).await?.is_some() {
            return Err(RestaurantError::Conflict(req.name));
        }

        let restaurant = Restaurant::new(req.name, req.cuisine, req.region);
        self.store.put(&restaurant).await?;
        info!("Created restaurant: {}", restaurant.name);

        // Only fill an empty slot, a concurrent reader may have cached already
        let key = keys::restaurant(&restaurant.name);
        self.cache_add(&key, &restaurant.view()).await?;

        Ok(())
    }

    pub async fn get(&self, name: &str) -> Result<RestaurantView> {
        let key = keys::restaurant(name);
        if let Some(view) = self.cache_get::<RestaurantView>(&key).await? {
            return Ok(view);
        }

        let restaurant = self
            .store
            .get(name)
            .await?
            .ok_or_else(|| RestaurantError::restaurant_not_found(name))?;

        let view = restaurant.view();
        self.cache_set(&key, &view).await?;

        Ok(view)
    }

    pub async fn delete(&self, name: &str) -> Result<()> {
        if self.store.get(name).await?.is_none() {
            return Err(RestaurantError::restaurant_not_found(name));
        }

        self.store.delete(name).await?;
        info!("Deleted restaurant: {}", name);

        let key = keys::restaurant(name);
        if self.cache_contains(&key).await? {
            self.cache_delete(&key).await?;
        }

        Ok(())
    }

    /// Fold a rating into the stored mean and return the updated restaurant
    pub async fn rate(&self, name: &str, submitted: f64) -> Result<RestaurantView> {
        let mut restaurant = self
            .store
            .get(name)
            .await?
            .ok_or_else(|| RestaurantError::restaurant_not_found(name))?;

        let (updated, count) =
            rating::add_rating(restaurant.rating, restaurant.num_ratings, submitted);

        // Read and write are separate calls; concurrent submissions can lose updates
        if !self.store.update_rating(name, updated, count).await? {
            return Err(RestaurantError::restaurant_not_found(name));
        }
        restaurant.rating = updated;
        restaurant.num_ratings = count;
        debug!("Rated {}: {} over {} ratings", name, updated, count);

        // Replace a cached entry so the submitter reads its own write
        let key = keys::restaurant(name);
        let view = restaurant.view();
        if self.cache_contains(&key).await? {
            self.cache_delete(&key).await?;
            self.cache_set(&key, &view).await?;
        }

        Ok(view)
    }

    pub async fn top_by_cuisine(
        &self,
        cuisine: &str,
        limit: Option<i64>,
    ) -> Result<Vec<RestaurantView>> {
        let limit = clamp_limit(limit);
        let key = keys::cuisine(cuisine, limit);
        if let Some(list) = self.cache_get::<Vec<RestaurantView>>(&key).await? {
            return Ok(list);
        }

        let rows = self.store.query_by_cuisine(cuisine, limit).await?;
        self.finish_listing(&key, rows, "No restaurants found for the specified cuisine")
            .await
    }

    /// Top rated restaurants in a region, optionally narrowed to one cuisine
    ///
    /// There is no region index, so this scans the whole table and ranks
    /// the matches in process.
    pub async fn top_by_region(
        &self,
        region: &str,
        cuisine: Option<&str>,
        limit: Option<i64>,
    ) -> Result<Vec<RestaurantView>> {
        let limit = clamp_limit(limit);
        let (key, filter, empty_message) = match cuisine {
            Some(c) => (
                keys::region_cuisine(region, c, limit),
                ScanFilter::region_and_cuisine(region, c),
                "No restaurants found for the specified region and cuisine",
            ),
            None => (
                keys::region(region, limit),
                ScanFilter::region(region),
                "No restaurants found for the specified region",
            ),
        };

        if let Some(list) = self.cache_get::<Vec<RestaurantView>>(&key).await? {
            return Ok(list);
        }

        let rows = top_rated(self.store.scan(&filter).await?, limit);
        self.finish_listing(&key, rows, empty_message).await
    }

    async fn finish_listing(
        &self,
        key: &str,
        rows: Vec<Restaurant>,
        empty_message: &str,
    ) -> Result<Vec<RestaurantView>> {
        // Empty results stay uncached so new matches show up on the next call
        if rows.is_empty() {
            return Err(RestaurantError::NotFound(empty_message.to_string()));
        }

        let list: Vec<RestaurantView> = rows.into_iter().map(RestaurantView::from).collect();
        self.cache_set(key, &list).await?;

        Ok(list)
    }

    async fn cache_get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(cache) = &self.cache else {
            return Ok(None);
        };

        match cache.get(key).await? {
            Some(data) => match serde_json::from_slice::<T>(&data) {
                Ok(value) => {
                    debug!("Cache hit: {}", key);
                    Ok(Some(value))
                }
                Err(e) => {
                    warn!("Ignoring undecodable cache entry {}: {}", key, e);
                    Ok(None)
                }
            },
            None => {
                debug!("Cache miss: {}", key);
                Ok(None)
            }
        }
    }

    /// Raw presence check, true even when the entry no longer decodes
    async fn cache_contains(&self, key: &str) -> Result<bool> {
        match &self.cache {
            Some(cache) => Ok(cache.get(key).await?.is_some()),
            None => Ok(false),
        }
    }

    async fn cache_set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        if let Some(cache) = &self.cache {
            cache.set(key, serde_json::to_vec(value)?).await?;
        }
        Ok(())
    }

    async fn cache_add<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        if let Some(cache) = &self.cache {
            cache.add(key, serde_json::to_vec(value)?).await?;
        }
        Ok(())
    }

    async fn cache_delete(&self, key: &str) -> Result<()> {
        if let Some(cache) = &self.cache {
            cache.delete(key).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryCache, MemoryStore};

    struct Fixture {
        store: Arc<MemoryStore>,
        cache: Arc<MemoryCache>,
        service: RestaurantService,
    }

    fn cached() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let cache = Arc::new(MemoryCache::new());
        let service = RestaurantService::new(store.clone(), Some(cache.clone()));
        Fixture {
            store,
            cache,
            service,
        }
    }

    fn uncached() -> (Arc<MemoryStore>, RestaurantService) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), RestaurantService::new(store, None))
    }

    fn create_req(name: &str, region: &str, cuisine: &str) -> CreateRestaurantRequest {
        CreateRestaurantRequest {
            name: name.into(),
            region: region.into(),
            cuisine: cuisine.into(),
        }
    }

    async fn cached_view(cache: &MemoryCache, key: &str) -> Option<RestaurantView> {
        cache
            .get(key)
            .await
            .unwrap()
            .map(|data| serde_json::from_slice(&data).unwrap())
    }

    #[tokio::test]
    async fn test_create_populates_cache() {
        let f = cached();
        f.service
            .create(create_req("R1", "North", "Italian"))
            .await
            .unwrap();

        let view = cached_view(&f.cache, "restaurant_R1").await.unwrap();
        assert_eq!(view.rating, 0.0);
        assert_eq!(view.cuisine, "Italian");
    }

    #[tokio::test]
    async fn test_create_does_not_clobber_cached_entry() {
        let f = cached();
        let stale = RestaurantView {
            name: "R1".into(),
            cuisine: "Thai".into(),
            rating: 3.0,
            region: "South".into(),
        };
        f.cache
            .set("restaurant_R1", serde_json::to_vec(&stale).unwrap())
            .await
            .unwrap();

        f.service
            .create(create_req("R1", "North", "Italian"))
            .await
            .unwrap();
        assert_eq!(cached_view(&f.cache, "restaurant_R1").await, Some(stale));
    }

    #[tokio::test]
    async fn test_duplicate_create_leaves_record_untouched() {
        let (store, service) = uncached();
        service
            .create(create_req("R1", "North", "Italian"))
            .await
            .unwrap();
        service.rate("R1", 5.0).await.unwrap();

        let err = service
            .create(create_req("R1", "South", "Thai"))
            .await
            .unwrap_err();
        assert!(matches!(err, RestaurantError::Conflict(_)));

        let r = store.get("R1").await.unwrap().unwrap();
        assert_eq!(r.region, "North");
        assert_eq!(r.num_ratings, 1);
    }

    #[tokio::test]
    async fn test_get_serves_cache_before_store() {
        let f = cached();
        f.service
            .create(create_req("R1", "North", "Italian"))
            .await
            .unwrap();

        // A writer that bypasses the cache leaves the cached entry stale
        f.store.update_rating("R1", 2.0, 1).await.unwrap();
        assert_eq!(f.service.get("R1").await.unwrap().rating, 0.0);
    }

    #[tokio::test]
    async fn test_get_fills_cache_on_store_hit() {
        let f = cached();
        f.store
            .put(&Restaurant::new("R1".into(), "Italian".into(), "North".into()))
            .await
            .unwrap();
        assert!(f.cache.is_empty());

        f.service.get("R1").await.unwrap();
        assert!(cached_view(&f.cache, "restaurant_R1").await.is_some());
    }

    #[tokio::test]
    async fn test_get_missing() {
        let f = cached();
        let err = f.service.get("nope").await.unwrap_err();
        assert!(matches!(err, RestaurantError::NotFound(_)));
        assert!(f.cache.is_empty());
    }

    #[tokio::test]
    async fn test_delete_invalidates_cache() {
        let f = cached();
        f.service
            .create(create_req("R1", "North", "Italian"))
            .await
            .unwrap();

        f.service.delete("R1").await.unwrap();
        assert!(cached_view(&f.cache, "restaurant_R1").await.is_none());
        assert!(matches!(
            f.service.get("R1").await.unwrap_err(),
            RestaurantError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_delete_missing() {
        let (_, service) = uncached();
        assert!(matches!(
            service.delete("nope").await.unwrap_err(),
            RestaurantError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_rate_refreshes_cached_entry() {
        let f = cached();
        f.service
            .create(create_req("R1", "North", "Italian"))
            .await
            .unwrap();

        f.service.rate("R1", 4.0).await.unwrap();
        f.service.rate("R1", 5.0).await.unwrap();

        let view = cached_view(&f.cache, "restaurant_R1").await.unwrap();
        assert_eq!(view.rating, 4.5);

        let stored = f.store.get("R1").await.unwrap().unwrap();
        assert_eq!(stored.rating, 4.5);
        assert_eq!(stored.num_ratings, 2);
    }

    #[tokio::test]
    async fn test_rate_does_not_fill_empty_cache_slot() {
        let f = cached();
        f.store
            .put(&Restaurant::new("R1".into(), "Italian".into(), "North".into()))
            .await
            .unwrap();

        f.service.rate("R1", 3.0).await.unwrap();
        assert!(f.cache.is_empty());
    }

    #[tokio::test]
    async fn test_rate_missing() {
        let (_, service) = uncached();
        assert!(matches!(
            service.rate("nope", 3.0).await.unwrap_err(),
            RestaurantError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_cuisine_listing_cached_per_limit() {
        let f = cached();
        for (name, region) in [("a", "North"), ("b", "South")] {
            f.service
                .create(create_req(name, region, "Italian"))
                .await
                .unwrap();
        }
        f.service.rate("b", 5.0).await.unwrap();

        let list = f.service.top_by_cuisine("Italian", None).await.unwrap();
        assert_eq!(list[0].name, "b");
        assert!(f.cache.get("cuisine_Italian_limit_10").await.unwrap().is_some());

        // Cached listings are served as-is even after the store changes
        f.service.rate("a", 5.0).await.unwrap();
        f.service.rate("a", 5.0).await.unwrap();
        f.service.delete("b").await.unwrap();
        let again = f.service.top_by_cuisine("Italian", None).await.unwrap();
        assert_eq!(again, list);

        // A different limit is a different entry
        let fresh = f.service.top_by_cuisine("Italian", Some(5)).await.unwrap();
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].name, "a");
    }

    #[tokio::test]
    async fn test_empty_listing_not_cached() {
        let f = cached();
        let err = f.service.top_by_cuisine("Thai", None).await.unwrap_err();
        assert!(matches!(err, RestaurantError::NotFound(_)));
        assert!(f.cache.is_empty());

        f.service
            .create(create_req("T1", "North", "Thai"))
            .await
            .unwrap();
        let list = f.service.top_by_cuisine("Thai", None).await.unwrap();
        assert_eq!(list.len(), 1);
    }

    #[tokio::test]
    async fn test_region_listing_filters_and_ranks() {
        let (_, service) = uncached();
        for (name, region, cuisine, rating) in [
            ("a", "North", "Italian", 2.0),
            ("b", "North", "Thai", 4.0),
            ("c", "North", "Italian", 3.0),
            ("d", "South", "Italian", 5.0),
        ] {
            service
                .create(create_req(name, region, cuisine))
                .await
                .unwrap();
            service.rate(name, rating).await.unwrap();
        }

        let north = service.top_by_region("North", None, None).await.unwrap();
        let names: Vec<_> = north.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c", "a"]);

        let north_italian = service
            .top_by_region("North", Some("Italian"), Some(1))
            .await
            .unwrap();
        assert_eq!(north_italian.len(), 1);
        assert_eq!(north_italian[0].name, "c");

        assert!(service.top_by_region("East", None, None).await.is_err());
    }

    #[tokio::test]
    async fn test_region_listing_cache_key() {
        let f = cached();
        f.service
            .create(create_req("a", "North", "Italian"))
            .await
            .unwrap();

        f.service
            .top_by_region("North", Some("Italian"), Some(500))
            .await
            .unwrap();
        assert!(f
            .cache
            .get("region_North_cuisine_Italian_limit_100")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_undecodable_cache_entry_is_a_miss() {
        let f = cached();
        f.service
            .create(create_req("R1", "North", "Italian"))
            .await
            .unwrap();
        f.cache
            .set("restaurant_R1", b"not json".to_vec())
            .await
            .unwrap();

        let view = f.service.get("R1").await.unwrap();
        assert_eq!(view.name, "R1");
        assert!(cached_view(&f.cache, "restaurant_R1").await.is_some());
    }

    #[tokio::test]
    async fn test_delete_clears_undecodable_entry() {
        let f = cached();
        f.service
            .create(create_req("R1", "North", "Italian"))
            .await
            .unwrap();
        f.cache
            .set("restaurant_R1", b"not json".to_vec())
            .await
            .unwrap();

        f.service.delete("R1").await.unwrap();
        assert_eq!(f.cache.get("restaurant_R1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_rate_replaces_undecodable_entry() {
        let f = cached();
        f.service
            .create(create_req("R1", "North", "Italian"))
            .await
            .unwrap();
        f.cache
            .set("restaurant_R1", b"not json".to_vec())
            .await
            .unwrap();

        f.service.rate("R1", 4.0).await.unwrap();
        let view = cached_view(&f.cache, "restaurant_R1").await.unwrap();
        assert_eq!(view.rating, 4.0);
    }

    #[tokio::test]
    async fn test_region_name_with_separator_gets_own_entry() {
        let f = cached();
        f.service
            .create(create_req("a", "North", "Italian"))
            .await
            .unwrap();

        f.service
            .top_by_region("North", Some("Italian"), None)
            .await
            .unwrap();
        assert_eq!(f.cache.len(), 2);

        let err = f
            .service
            .top_by_region("North_cuisine_Italian", None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, RestaurantError::NotFound(_)));
    }

    /// Record store whose rating writes always fail
    struct FailingRatingStore {
        inner: MemoryStore,
    }

    #[async_trait::async_trait]
    impl RecordStore for FailingRatingStore {
        async fn get(&self, name: &str) -> Result<Option<Restaurant>> {
            self.inner.get(name).await
        }

        async fn put(&self, restaurant: &Restaurant) -> Result<()> {
            self.inner.put(restaurant).await
        }

        async fn update_rating(&self, _name: &str, _rating: f64, _num_ratings: u32) -> Result<bool> {
            Err(RestaurantError::Store("write rejected".into()))
        }

        async fn delete(&self, name: &str) -> Result<()> {
            self.inner.delete(name).await
        }

        async fn query_by_cuisine(&self, cuisine: &str, limit: usize) -> Result<Vec<Restaurant>> {
            self.inner.query_by_cuisine(cuisine, limit).await
        }

        async fn scan(&self, filter: &ScanFilter) -> Result<Vec<Restaurant>> {
            self.inner.scan(filter).await
        }

        async fn count(&self) -> Result<u64> {
            self.inner.count().await
        }

        fn backend(&self) -> &'static str {
            "failing"
        }
    }

    #[tokio::test]
    async fn test_rate_store_failure_leaves_cache_untouched() {
        let cache = Arc::new(MemoryCache::new());
        let store = Arc::new(FailingRatingStore {
            inner: MemoryStore::new(),
        });
        let service = RestaurantService::new(store.clone(), Some(cache.clone()));
        service
            .create(create_req("R1", "North", "Italian"))
            .await
            .unwrap();

        let err = service.rate("R1", 4.0).await.unwrap_err();
        assert!(matches!(err, RestaurantError::Store(_)));
        assert!(err.is_upstream());

        let view = cached_view(&cache, "restaurant_R1").await.unwrap();
        assert_eq!(view.rating, 0.0);
        assert_eq!(store.inner.get("R1").await.unwrap().unwrap().num_ratings, 0);
    }

    #[tokio::test]
    async fn test_uncached_service_reports_backends() {
        let (_, service) = uncached();
        assert!(!service.cache_enabled());
        assert_eq!(service.store_backend(), "memory");
        assert_eq!(service.cache_backend(), None);
    }
}
