use shared::{Mode, Result, ScoreEntry, ServiceError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use crate::domain::{merge_into_top, WriteLanes};
use crate::store::KvStore;

pub const HIGH_SCORES_PREFIX: &str = "high_scores_";
pub const DEFAULT_MAX_RETRIES: u32 = 8;
pub const DEFAULT_LANE_TIMEOUT: Duration = Duration::from_secs(5);

const RETRY_BACKOFF_MS: u64 = 5;

pub fn leaderboard_key(mode: &Mode) -> String {
    format!("{}{}", HIGH_SCORES_PREFIX, mode.as_str())
}

/// Top-5 score tables, one per mode, persisted as JSON arrays.
///
/// Submissions for one mode are serialized through a per-mode write lane and
/// committed with a compare-and-swap against the bytes that were read, so
/// neither concurrent requests in this process nor other replicas sharing the
/// store can lose an update. Reads never take the lane.
#[derive(Clone)]
pub struct LeaderboardService {
    store: Arc<dyn KvStore>,
    lanes: Arc<WriteLanes>,
    max_retries: u32,
    lane_timeout: Duration,
}

impl LeaderboardService {
    pub fn new(store: Arc<dyn KvStore>, max_retries: u32) -> Self {
        Self {
            store,
            lanes: Arc::new(WriteLanes::new()),
            max_retries,
            lane_timeout: DEFAULT_LANE_TIMEOUT,
        }
    }

    /// Upper bound on how long a submission queues behind others for the
    /// same mode before giving up with `StoreUnavailable`.
    pub fn with_lane_timeout(mut self, lane_timeout: Duration) -> Self {
        self.lane_timeout = lane_timeout;
        self
    }

    /// Current top entries for `mode`, best first. Unknown modes are empty.
    pub async fn get_top(&self, mode: &Mode) -> Result<Vec<ScoreEntry>> {
        let key = leaderboard_key(mode);
        let (_, entries) = self.read(&key).await?;

        debug!(mode = %mode, entries = entries.len(), "Retrieved leaderboard");
        Ok(entries)
    }

    /// Merges `entry` into the mode's top-5 and returns the stored result.
    #[tracing::instrument(skip_all, fields(mode = %mode, username = %entry.username, score = entry.score))]
    pub async fn submit(&self, mode: &Mode, entry: ScoreEntry) -> Result<Vec<ScoreEntry>> {
        let start = Instant::now();
        let key = leaderboard_key(mode);

        let _lane = tokio::time::timeout(self.lane_timeout, self.lanes.acquire(&key))
            .await
            .map_err(|_| {
                error!(
                    timeout_ms = self.lane_timeout.as_millis() as u64,
                    "Timed out waiting for leaderboard write lane"
                );
                shared::record_counter("clicker.scores.lane_timeouts", 1);
                ServiceError::StoreUnavailable(format!(
                    "'{}' is busy, gave up after {}ms",
                    key,
                    self.lane_timeout.as_millis()
                ))
            })?;

        let mut attempt = 0;
        let top = loop {
            match self.try_submit(&key, entry.clone()).await {
                Ok(top) => break top,
                Err(ServiceError::ConflictingWrite(reason)) if attempt < self.max_retries => {
                    attempt += 1;
                    shared::record_counter("clicker.scores.conflicts", 1);
                    warn!(
                        attempt = attempt,
                        reason = %reason,
                        "Concurrent leaderboard write detected, retrying"
                    );
                    tokio::time::sleep(Duration::from_millis(RETRY_BACKOFF_MS * attempt as u64))
                        .await;
                }
                Err(ServiceError::ConflictingWrite(reason)) => {
                    error!(
                        attempts = attempt + 1,
                        reason = %reason,
                        "Giving up on leaderboard write"
                    );
                    return Err(ServiceError::StoreUnavailable(format!(
                        "could not commit '{}' after {} attempts",
                        key,
                        attempt + 1
                    )));
                }
                Err(e) => return Err(e),
            }
        };

        shared::record_counter("clicker.scores.submitted", 1);
        shared::record_timing("clicker.scores.submit_latency", start.elapsed().as_secs_f64());

        info!(
            retries = attempt,
            entries = top.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Score saved"
        );

        Ok(top)
    }

    async fn try_submit(&self, key: &str, entry: ScoreEntry) -> Result<Vec<ScoreEntry>> {
        let (raw, current) = self.read(key).await?;

        let updated = merge_into_top(current, entry);
        let encoded = serde_json::to_vec(&updated)
            .map_err(|e| ServiceError::Internal(format!("Failed to encode leaderboard: {}", e)))?;

        if self
            .store
            .compare_and_swap(key, raw.as_deref(), &encoded)
            .await?
        {
            Ok(updated)
        } else {
            Err(ServiceError::ConflictingWrite(format!(
                "'{}' changed since it was read",
                key
            )))
        }
    }

    async fn read(&self, key: &str) -> Result<(Option<Vec<u8>>, Vec<ScoreEntry>)> {
        let raw = self.store.get(key).await?;

        let entries = match raw.as_deref() {
            Some(bytes) => serde_json::from_slice(bytes).map_err(|e| {
                error!(key = key, error = %e, "Stored leaderboard is not valid JSON");
                ServiceError::CorruptValue(format!("'{}': {}", key, e))
            })?,
            None => Vec::new(),
        };

        Ok((raw, entries))
    }
}
