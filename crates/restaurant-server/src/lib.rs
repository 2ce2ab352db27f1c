//! Restaurant Server
//!
//! REST service for restaurant records: create, fetch, delete, rate, and
//! top-rated listings by cuisine and region. Records live in a keyed store;
//! an optional cache sits in front of it for reads.

pub mod config;
pub mod error;
pub mod handlers;
pub mod services;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use restaurant_core::{CacheStore, RecordStore};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::{ServerConfig, StoreBackend};
use crate::services::RestaurantService;
use crate::storage::{MemoryCache, MemoryStore, RedisCache, SqliteStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<RestaurantService>,
}

impl AppState {
    pub fn new(service: RestaurantService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// Open the configured store and cache
    pub async fn from_config(config: &ServerConfig) -> Result<Self> {
        let store: Arc<dyn RecordStore> = match config.store {
            StoreBackend::Sqlite => Arc::new(
                SqliteStore::new(&config.database_path)
                    .await
                    .context("Failed to initialize database")?,
            ),
            StoreBackend::Memory => Arc::new(MemoryStore::new()),
        };
        info!("Record store initialized: {}", store.backend());

        let cache: Option<Arc<dyn CacheStore>> = if !config.use_cache {
            info!("Caching disabled");
            None
        } else if let Some(url) = &config.cache_url {
            Some(Arc::new(
                RedisCache::connect(url)
                    .await
                    .context("Failed to initialize cache")?,
            ))
        } else {
            Some(Arc::new(MemoryCache::new()))
        };
        if let Some(cache) = &cache {
            info!("Cache initialized: {}", cache.backend());
        }

        Ok(Self::new(RestaurantService::new(store, cache)))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::info))
        .route("/health", get(handlers::health))
        .merge(restaurant_routes())
        .layer(
            ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            ),
        )
        .with_state(state)
}

fn restaurant_routes() -> Router<AppState> {
    use handlers::restaurants;

    Router::new()
        .route("/restaurants", post(restaurants::create))
        .route("/restaurants/rating", post(restaurants::rate))
        .route(
            "/restaurants/:name",
            get(restaurants::get).delete(restaurants::delete),
        )
        .route("/restaurants/cuisine/:cuisine", get(restaurants::by_cuisine))
        .route("/restaurants/region/:region", get(restaurants::by_region))
        .route(
            "/restaurants/region/:region/cuisine/:cuisine",
            get(restaurants::by_region_and_cuisine),
        )
}
