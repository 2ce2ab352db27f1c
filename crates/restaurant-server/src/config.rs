//! Server configuration, read once at startup from `RESTAURANTS_*` variables

use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;
use std::net::SocketAddr;

pub const ENV_PREFIX: &str = "RESTAURANTS";

/// Which record store backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Sqlite,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub bind_address: String,
    pub store: StoreBackend,
    pub database_path: String,
    /// Process-wide cache switch
    pub use_cache: bool,
    /// Redis URL; the in-process cache is used when unset
    pub cache_url: Option<String>,
}

impl ServerConfig {
    pub fn load() -> Result<Self> {
        Self::from_env(Environment::with_prefix(ENV_PREFIX))
    }

    fn from_env(env: Environment) -> Result<Self> {
        Config::builder()
            .set_default("bind_address", "0.0.0.0:8080")?
            .set_default("store", "sqlite")?
            .set_default("database_path", "data/restaurants.db")?
            .set_default("use_cache", false)?
            .add_source(env.try_parsing(true))
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind_address
            .parse()
            .with_context(|| format!("Failed to parse bind address: {}", self.bind_address))
    }
}
