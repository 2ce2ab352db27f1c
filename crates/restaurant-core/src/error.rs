//! Error types for the restaurant service

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RestaurantError>;

#[derive(Error, Debug)]
pub enum RestaurantError {
    #[error("Restaurant already exists: {0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RestaurantError {
    pub fn restaurant_not_found(name: &str) -> Self {
        RestaurantError::NotFound(format!("Restaurant not found: {}", name))
    }

    /// Store, cache and codec failures all surface to clients as a server error
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            RestaurantError::Store(_) | RestaurantError::Cache(_) | RestaurantError::Serialization(_)
        )
    }
}

impl From<serde_json::Error> for RestaurantError {
    fn from(e: serde_json::Error) -> Self {
        RestaurantError::Serialization(e.to_string())
    }
}
