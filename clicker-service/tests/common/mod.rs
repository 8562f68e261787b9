#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use clicker_service::{router, AppState, KvStore, MemoryStore};
use shared::{Mode, Result, ScoreEntry, ServiceError};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const KNOWN_MODES: [&str; 3] = ["10sec", "30sec", "60sec"];

pub fn entry(username: &str, score: i64) -> ScoreEntry {
    ScoreEntry {
        username: username.to_string(),
        score,
    }
}

pub fn mode(name: &str) -> Mode {
    Mode::new(name).expect("valid mode")
}

pub fn create_test_app(store: Arc<dyn KvStore>) -> Router {
    let modes = KNOWN_MODES.iter().map(|m| mode(m)).collect();
    router(AppState::new(store, modes, 8, Duration::from_secs(5)))
}

/// Memory store whose reads stall for `read_delay`, optionally only for one
/// key, to widen the window between a read and the write that follows it.
pub struct DelayedStore {
    pub inner: MemoryStore,
    read_delay: Duration,
    only_key: Option<String>,
    pub reads: AtomicU32,
}

impl DelayedStore {
    pub fn new(inner: MemoryStore, read_delay: Duration) -> Self {
        Self {
            inner,
            read_delay,
            only_key: None,
            reads: AtomicU32::new(0),
        }
    }

    pub fn only_for(mut self, key: &str) -> Self {
        self.only_key = Some(key.to_string());
        self
    }
}

#[async_trait]
impl KvStore for DelayedStore {
    async fn incr(&self, key: &str) -> Result<i64> {
        self.inner.incr(key).await
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let delayed = self.only_key.as_deref().map_or(true, |k| k == key);
        if delayed {
            tokio::time::sleep(self.read_delay).await;
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.inner.set(key, value).await
    }

    async fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: &[u8],
    ) -> Result<bool> {
        self.inner.compare_and_swap(key, expected, value).await
    }

    async fn ping(&self) -> Result<()> {
        self.inner.ping().await
    }
}

/// Store that is always unreachable.
pub struct UnreachableStore;

#[async_trait]
impl KvStore for UnreachableStore {
    async fn incr(&self, _key: &str) -> Result<i64> {
        Err(ServiceError::StoreUnavailable("connection refused".to_string()))
    }

    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
        Err(ServiceError::StoreUnavailable("connection refused".to_string()))
    }

    async fn set(&self, _key: &str, _value: &[u8]) -> Result<()> {
        Err(ServiceError::StoreUnavailable("connection refused".to_string()))
    }

    async fn compare_and_swap(
        &self,
        _key: &str,
        _expected: Option<&[u8]>,
        _value: &[u8],
    ) -> Result<bool> {
        Err(ServiceError::StoreUnavailable("connection refused".to_string()))
    }

    async fn ping(&self) -> Result<()> {
        Err(ServiceError::StoreUnavailable("connection refused".to_string()))
    }
}

pub async fn seed_board(store: &MemoryStore, mode_name: &str, entries: &[ScoreEntry]) {
    let encoded = serde_json::to_vec(entries).expect("encodable entries");
    store
        .set(&format!("high_scores_{}", mode_name), &encoded)
        .await
        .expect("memory store write");
}
