use shared::Mode;
use std::sync::Arc;
use std::time::Duration;

use crate::service::{LeaderboardService, VisitCounter};
use crate::store::KvStore;

#[derive(Clone)]
pub struct AppState {
    pub counter: VisitCounter,
    pub leaderboard: LeaderboardService,
    pub store: Arc<dyn KvStore>,
    /// Modes rendered on the landing page, in display order.
    pub known_modes: Arc<Vec<Mode>>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn KvStore>,
        known_modes: Vec<Mode>,
        max_submit_retries: u32,
        lane_timeout: Duration,
    ) -> Self {
        Self {
            counter: VisitCounter::new(store.clone()),
            leaderboard: LeaderboardService::new(store.clone(), max_submit_retries)
                .with_lane_timeout(lane_timeout),
            store,
            known_modes: Arc::new(known_modes),
        }
    }
}
