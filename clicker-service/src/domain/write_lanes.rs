use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::OwnedMutexGuard;

// Idle lanes are dropped once the map grows past this many keys.
const PRUNE_THRESHOLD: usize = 64;

/// One async mutex per key, so writers to the same key queue up while writers
/// to different keys run in parallel.
#[derive(Default)]
pub struct WriteLanes {
    lanes: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl WriteLanes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `key`. Access is held until the guard is
    /// dropped.
    pub async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let lane = {
            let mut lanes = self.lanes.lock().unwrap_or_else(|e| e.into_inner());

            if lanes.len() > PRUNE_THRESHOLD {
                lanes.retain(|_, lane| Arc::strong_count(lane) > 1);
            }

            lanes
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
                .clone()
        };

        lane.lock_owned().await
    }

    pub fn len(&self) -> usize {
        self.lanes.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
