//! Redis-backed cache for multi-instance deployments

use anyhow::{Context, Result};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use restaurant_core::{CacheStore, RestaurantError};

pub struct RedisCache {
    conn: ConnectionManager,
}

impl RedisCache {
    pub async fn connect(redis_url: &str) -> Result<Self> {
        tracing::info!("Connecting to Redis cache at: {}", redis_url);

        let client = redis::Client::open(redis_url)
            .with_context(|| format!("Invalid Redis URL: {}", redis_url))?;
        let conn = ConnectionManager::new(client)
            .await
            .context("Failed to connect to Redis")?;

        Ok(Self { conn })
    }
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &str) -> restaurant_core::Result<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        conn.get(key).await.map_err(cache_error)
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> restaurant_core::Result<()> {
        let mut conn = self.conn.clone();
        conn.set(key, value).await.map_err(cache_error)
    }

    async fn add(&self, key: &str, value: Vec<u8>) -> restaurant_core::Result<bool> {
        let mut conn = self.conn.clone();
        conn.set_nx(key, value).await.map_err(cache_error)
    }

    async fn delete(&self, key: &str) -> restaurant_core::Result<()> {
        let mut conn = self.conn.clone();
        conn.del(key).await.map_err(cache_error)
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}

fn cache_error(e: redis::RedisError) -> RestaurantError {
    RestaurantError::Cache(e.to_string())
}
