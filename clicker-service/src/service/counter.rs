use shared::{Result, ServiceError, VisitCount};
use std::sync::Arc;
use tracing::{debug, error};

use crate::store::KvStore;

pub const VISITS_KEY: &str = "visits";

#[derive(Clone)]
pub struct VisitCounter {
    store: Arc<dyn KvStore>,
}

impl VisitCounter {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Records one visit and returns the post-increment count.
    #[tracing::instrument(skip(self))]
    pub async fn increment(&self) -> Result<VisitCount> {
        let value = self.store.incr(VISITS_KEY).await?;

        let count = u64::try_from(value).map(VisitCount).map_err(|_| {
            error!(value = value, "Visit counter holds a negative value");
            ServiceError::CorruptValue(format!("'{}' is negative: {}", VISITS_KEY, value))
        })?;

        shared::record_counter("clicker.visits.increments", 1);
        shared::record_gauge("clicker.visits.total", count.value() as f64);
        debug!(visits = %count, "Visit recorded");

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_increments_are_sequential_from_existing_value() {
        let store = MemoryStore::new();
        store.set(VISITS_KEY, b"41").await.unwrap();
        let counter = VisitCounter::new(Arc::new(store));

        let mut seen = Vec::new();
        for _ in 0..5 {
            seen.push(counter.increment().await.unwrap().value());
        }
        assert_eq!(seen, vec![42, 43, 44, 45, 46]);
    }

    #[tokio::test]
    async fn test_first_visit_is_padded() {
        let counter = VisitCounter::new(Arc::new(MemoryStore::new()));
        assert_eq!(counter.increment().await.unwrap().to_string(), "0000001");
    }

    #[tokio::test]
    async fn test_large_value_is_not_truncated() {
        let store = MemoryStore::new();
        store.set(VISITS_KEY, b"12345677").await.unwrap();
        let counter = VisitCounter::new(Arc::new(store));

        assert_eq!(counter.increment().await.unwrap().to_string(), "12345678");
    }

    #[tokio::test]
    async fn test_negative_counter_is_reported() {
        let store = MemoryStore::new();
        store.set(VISITS_KEY, b"-10").await.unwrap();
        let counter = VisitCounter::new(Arc::new(store));

        assert!(matches!(
            counter.increment().await,
            Err(ServiceError::CorruptValue(_))
        ));
    }

    #[tokio::test]
    async fn test_concurrent_increments_are_not_lost() {
        let counter = VisitCounter::new(Arc::new(MemoryStore::new()));

        let handles: Vec<_> = (0..50)
            .map(|_| {
                let counter = counter.clone();
                tokio::spawn(async move { counter.increment().await.unwrap().value() })
            })
            .collect();

        let mut values = Vec::new();
        for handle in handles {
            values.push(handle.await.unwrap());
        }
        values.sort_unstable();
        assert_eq!(values, (1..=50).collect::<Vec<u64>>());
    }
}
