use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, RedisError, Script};
use shared::errors::{Result, ServiceError};
use std::sync::Arc;
use tracing::{debug, error};

use super::KvStore;

// ARGV[1] = "1" when a current value is expected, ARGV[2] = expected bytes,
// ARGV[3] = replacement. Runs atomically on the server, so it is safe over a
// multiplexed connection where WATCH/MULTI would not be.
const COMPARE_AND_SWAP_LUA: &str = r#"
local current = redis.call('GET', KEYS[1])
if ARGV[1] == '0' then
    if current then
        return 0
    end
elseif current ~= ARGV[2] then
    return 0
end
redis.call('SET', KEYS[1], ARGV[3])
return 1
"#;

#[derive(Clone)]
pub struct RedisStore {
    redis: Arc<ConnectionManager>,
    compare_and_swap: Arc<Script>,
}

impl RedisStore {
    pub fn new(redis: ConnectionManager) -> Self {
        Self {
            redis: Arc::new(redis),
            compare_and_swap: Arc::new(Script::new(COMPARE_AND_SWAP_LUA)),
        }
    }

    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).map_err(|e: RedisError| {
            error!(error = %e, "Invalid Redis URL");
            ServiceError::Internal(format!("Invalid REDIS_URL: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e: RedisError| {
            error!(error = %e, "Failed to connect to Redis");
            ServiceError::StoreUnavailable(e.to_string())
        })?;

        Ok(Self::new(manager))
    }
}

#[async_trait]
impl KvStore for RedisStore {
    async fn incr(&self, key: &str) -> Result<i64> {
        let mut conn = self.redis.as_ref().clone();

        let value: i64 = conn.incr(key, 1).await.map_err(|e: RedisError| {
            error!(key = key, error = %e, "Failed to increment key");
            ServiceError::from(e)
        })?;

        debug!(key = key, value = value, "Incremented key");
        Ok(value)
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.redis.as_ref().clone();

        let value: Option<Vec<u8>> = conn.get(key).await.map_err(|e: RedisError| {
            error!(key = key, error = %e, "Failed to read key");
            ServiceError::from(e)
        })?;

        Ok(value)
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut conn = self.redis.as_ref().clone();

        conn.set::<_, _, ()>(key, value)
            .await
            .map_err(|e: RedisError| {
                error!(key = key, error = %e, "Failed to write key");
                ServiceError::from(e)
            })?;

        Ok(())
    }

    async fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: &[u8],
    ) -> Result<bool> {
        let mut conn = self.redis.as_ref().clone();

        let (has_expected, expected) = match expected {
            Some(bytes) => ("1", bytes),
            None => ("0", &[][..]),
        };

        let swapped: i64 = self
            .compare_and_swap
            .key(key)
            .arg(has_expected)
            .arg(expected)
            .arg(value)
            .invoke_async(&mut conn)
            .await
            .map_err(|e: RedisError| {
                error!(key = key, error = %e, "Compare-and-swap script failed");
                ServiceError::from(e)
            })?;

        Ok(swapped == 1)
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.redis.as_ref().clone();

        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e: RedisError| {
                error!(error = %e, "Redis health check failed");
                ServiceError::from(e)
            })?;

        Ok(())
    }
}
