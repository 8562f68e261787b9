//! Key-value store seam.
//!
//! All counter and leaderboard state lives behind [`KvStore`]; services only
//! hold a handle to it and never cache values between requests.

pub mod memory;
pub mod redis_store;
pub mod timeout;

pub use memory::MemoryStore;
pub use redis_store::RedisStore;
pub use timeout::TimeoutStore;

use async_trait::async_trait;
use shared::Result;

#[async_trait]
pub trait KvStore: Send + Sync {
    /// Atomically adds one to the integer at `key` and returns the new value.
    /// A missing key counts as zero.
    async fn incr(&self, key: &str) -> Result<i64>;

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    async fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Writes `value` only if the current value equals `expected`
    /// (`None` meaning the key must be absent). Returns whether the write
    /// happened.
    async fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: &[u8],
    ) -> Result<bool>;

    async fn ping(&self) -> Result<()>;
}
