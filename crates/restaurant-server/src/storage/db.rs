//! SQLite record store (embedded, no external dependencies)

use anyhow::{Context, Result};
use async_trait::async_trait;
use restaurant_core::{RecordStore, Restaurant, RestaurantError, ScanFilter};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::sync::Arc;

pub struct SqliteStore {
    pool: Arc<SqlitePool>,
}

impl SqliteStore {
    pub async fn new(database_path: &str) -> Result<Self> {
        tracing::info!("Opening SQLite database at: {}", database_path);

        // Create parent directory if needed
        if let Some(parent) = std::path::Path::new(database_path).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.with_context(|| {
                    format!("Failed to create database directory: {}", parent.display())
                })?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .with_context(|| {
                format!("Failed to connect to SQLite database at: {}", database_path)
            })?;

        Self::from_pool(pool).await
    }

    /// Private in-memory database, lives as long as the store
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;

        // Every connection to :memory: sees its own database, so pin one
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .context("Failed to open in-memory SQLite database")?;

        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> Result<Self> {
        tracing::info!("SQLite connection established, running migrations...");

        Self::run_migrations(&pool)
            .await
            .context("Failed to run database migrations")?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    async fn run_migrations(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS restaurants (
                name TEXT PRIMARY KEY,
                cuisine TEXT NOT NULL,
                region TEXT NOT NULL,
                rating REAL NOT NULL DEFAULT 0,
                num_ratings INTEGER NOT NULL DEFAULT 0
            )
            "#,
        )
        .execute(pool)
        .await?;

        // Secondary index backing the by-cuisine query
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_restaurants_cuisine_rating
            ON restaurants (cuisine, rating DESC)
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn get(&self, name: &str) -> restaurant_core::Result<Option<Restaurant>> {
        let row: Option<RestaurantRow> = sqlx::query_as(
            r#"
            SELECT name, cuisine, region, rating, num_ratings
            FROM restaurants WHERE name = ?1
            "#,
        )
        .bind(name)
        .fetch_optional(&*self.pool)
        .await
        .map_err(store_error)?;

        row.map(Restaurant::try_from).transpose()
    }

    async fn put(&self, restaurant: &Restaurant) -> restaurant_core::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO restaurants (name, cuisine, region, rating, num_ratings)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&restaurant.name)
        .bind(&restaurant.cuisine)
        .bind(&restaurant.region)
        .bind(restaurant.rating)
        .bind(i64::from(restaurant.num_ratings))
        .execute(&*self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                RestaurantError::Conflict(restaurant.name.clone())
            }
            other => store_error(other),
        })?;

        Ok(())
    }

    async fn update_rating(
        &self,
        name: &str,
        rating: f64,
        num_ratings: u32,
    ) -> restaurant_core::Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE restaurants SET rating = ?1, num_ratings = ?2
            WHERE name = ?3
            "#,
        )
        .bind(rating)
        .bind(i64::from(num_ratings))
        .bind(name)
        .execute(&*self.pool)
        .await
        .map_err(store_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, name: &str) -> restaurant_core::Result<()> {
        sqlx::query("DELETE FROM restaurants WHERE name = ?1")
            .bind(name)
            .execute(&*self.pool)
            .await
            .map_err(store_error)?;

        Ok(())
    }

    async fn query_by_cuisine(
        &self,
        cuisine: &str,
        limit: usize,
    ) -> restaurant_core::Result<Vec<Restaurant>> {
        let rows: Vec<RestaurantRow> = sqlx::query_as(
            r#"
            SELECT name, cuisine, region, rating, num_ratings
            FROM restaurants
            WHERE cuisine = ?1
            ORDER BY rating DESC
            LIMIT ?2
            "#,
        )
        .bind(cuisine)
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&*self.pool)
        .await
        .map_err(store_error)?;

        rows.into_iter().map(Restaurant::try_from).collect()
    }

    async fn scan(&self, filter: &ScanFilter) -> restaurant_core::Result<Vec<Restaurant>> {
        let rows: Vec<RestaurantRow> = match &filter.cuisine {
            Some(cuisine) => {
                sqlx::query_as(
                    r#"
                    SELECT name, cuisine, region, rating, num_ratings
                    FROM restaurants WHERE region = ?1 AND cuisine = ?2
                    "#,
                )
                .bind(&filter.region)
                .bind(cuisine)
                .fetch_all(&*self.pool)
                .await
            }
            None => {
                sqlx::query_as(
                    r#"
                    SELECT name, cuisine, region, rating, num_ratings
                    FROM restaurants WHERE region = ?1
                    "#,
                )
                .bind(&filter.region)
                .fetch_all(&*self.pool)
                .await
            }
        }
        .map_err(store_error)?;

        rows.into_iter().map(Restaurant::try_from).collect()
    }

    async fn count(&self) -> restaurant_core::Result<u64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM restaurants")
            .fetch_one(&*self.pool)
            .await
            .map_err(store_error)?;

        Ok(u64::try_from(count).unwrap_or(0))
    }

    fn backend(&self) -> &'static str {
        "sqlite"
    }
}

fn store_error(e: sqlx::Error) -> RestaurantError {
    RestaurantError::Store(e.to_string())
}

// Helper struct for sqlx query_as
#[derive(sqlx::FromRow)]
struct RestaurantRow {
    name: String,
    cuisine: String,
    region: String,
    rating: f64,
    num_ratings: i64,
}

impl TryFrom<RestaurantRow> for Restaurant {
    type Error = RestaurantError;

    fn try_from(r: RestaurantRow) -> restaurant_core::Result<Self> {
        let num_ratings = u32::try_from(r.num_ratings).map_err(|_| {
            RestaurantError::Store(format!(
                "Invalid num_ratings {} for {}",
                r.num_ratings, r.name
            ))
        })?;

        Ok(Restaurant {
            name: r.name,
            cuisine: r.cuisine,
            region: r.region,
            rating: r.rating,
            num_ratings,
        })
    }
}
