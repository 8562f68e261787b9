use async_trait::async_trait;
use shared::errors::{Result, ServiceError};
use std::future::Future;
use std::time::Duration;
use tracing::error;

use super::KvStore;

/// Bounds every call on the wrapped store.
///
/// An elapsed deadline is reported as `StoreUnavailable`. A timed-out
/// compare-and-swap may still have been applied by the server; it is a single
/// atomic write either way.
pub struct TimeoutStore<S> {
    inner: S,
    timeout: Duration,
}

impl<S: KvStore> TimeoutStore<S> {
    pub fn new(inner: S, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    async fn bounded<T>(
        &self,
        op: &'static str,
        fut: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                error!(
                    op = op,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Store call timed out"
                );
                shared::record_counter("clicker.store.timeouts", 1);
                Err(ServiceError::StoreUnavailable(format!(
                    "{} timed out after {}ms",
                    op,
                    self.timeout.as_millis()
                )))
            }
        }
    }
}

#[async_trait]
impl<S: KvStore> KvStore for TimeoutStore<S> {
    async fn incr(&self, key: &str) -> Result<i64> {
        self.bounded("incr", self.inner.incr(key)).await
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.bounded("get", self.inner.get(key)).await
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.bounded("set", self.inner.set(key, value)).await
    }

    async fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: &[u8],
    ) -> Result<bool> {
        self.bounded(
            "compare_and_swap",
            self.inner.compare_and_swap(key, expected, value),
        )
        .await
    }

    async fn ping(&self) -> Result<()> {
        self.bounded("ping", self.inner.ping()).await
    }
}
