use async_trait::async_trait;
use shared::errors::{Result, ServiceError};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::KvStore;

/// Process-local store with the same semantics as [`super::RedisStore`].
///
/// Integers are kept as their decimal text, the way Redis keeps them, so a
/// key written by `incr` reads back through `get` as `b"42"`.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn incr(&self, key: &str) -> Result<i64> {
        let mut entries = self.entries.write().await;

        let current = match entries.get(key) {
            Some(raw) => std::str::from_utf8(raw)
                .ok()
                .and_then(|s| s.parse::<i64>().ok())
                .ok_or_else(|| {
                    ServiceError::CorruptValue(format!("value at '{}' is not an integer", key))
                })?,
            None => 0,
        };

        let next = current
            .checked_add(1)
            .ok_or_else(|| ServiceError::CorruptValue(format!("value at '{}' overflowed", key)))?;

        entries.insert(key.to_string(), next.to_string().into_bytes());
        Ok(next)
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: &[u8],
    ) -> Result<bool> {
        let mut entries = self.entries.write().await;

        if entries.get(key).map(Vec::as_slice) != expected {
            return Ok(false);
        }

        entries.insert(key.to_string(), value.to_vec());
        Ok(true)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
