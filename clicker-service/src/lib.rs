pub mod domain;
pub mod service;
pub mod store;
pub mod web;

pub use service::{LeaderboardService, VisitCounter};
pub use store::{KvStore, MemoryStore, RedisStore, TimeoutStore};
pub use web::{router, AppState};
