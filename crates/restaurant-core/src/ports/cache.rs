//! Cache store trait

use crate::Result;
use async_trait::async_trait;

/// Non-authoritative keyed store holding encoded values
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Store only when the key is absent. Returns whether the value was written.
    async fn add(&self, key: &str, value: Vec<u8>) -> Result<bool>;

    async fn delete(&self, key: &str) -> Result<()>;

    /// Short backend name for diagnostics
    fn backend(&self) -> &'static str;
}
