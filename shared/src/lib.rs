pub mod config;
pub mod errors;
pub mod telemetry;
pub mod types;

pub use config::{RedisConfig, ServiceConfig, StoreBackend, StoreConfig};
pub use errors::{Result, ServiceError};
pub use telemetry::{init_metrics, init_tracing, record_counter, record_gauge, record_timing, shutdown};
pub use types::{Mode, ScoreEntry, ScoreSubmission, Username, VisitCount};
