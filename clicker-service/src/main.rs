use anyhow::Context;
use clicker_service::{router, AppState, KvStore, MemoryStore, RedisStore, TimeoutStore};
use shared::config::{RedisConfig, ServiceConfig, StoreBackend, StoreConfig};
use shared::Mode;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let service_config = ServiceConfig::from_env(8000)?;
    let store_config = StoreConfig::from_env()?;

    shared::init_tracing("clicker-service")
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    shared::init_metrics(service_config.metrics_port)
        .map_err(|e| anyhow::anyhow!("Failed to initialize metrics: {}", e))?;

    tracing::info!("Clicker Service starting...");

    tracing::info!(
        port = service_config.port,
        metrics_port = service_config.metrics_port,
        known_modes = ?service_config.known_modes,
        backend = ?store_config.backend,
        store_timeout_ms = store_config.timeout_ms,
        max_submit_retries = store_config.max_submit_retries,
        lane_timeout_ms = store_config.lane_timeout_ms,
        "Configuration loaded"
    );

    let timeout = Duration::from_millis(store_config.timeout_ms);
    let store: Arc<dyn KvStore> = match store_config.backend {
        StoreBackend::Redis => {
            let redis_config = RedisConfig::from_env()?;
            tracing::info!("Connecting to Redis...");
            let redis = RedisStore::connect(&redis_config.url).await?;
            tracing::info!("Connected to Redis successfully");
            Arc::new(TimeoutStore::new(redis, timeout))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store, state will not survive a restart");
            Arc::new(TimeoutStore::new(MemoryStore::new(), timeout))
        }
    };

    store.ping().await.context("Store health check failed")?;
    tracing::info!("Store health check passed");

    let known_modes = service_config
        .known_modes
        .iter()
        .map(|m| Mode::new(m.as_str()))
        .collect::<Result<Vec<_>, _>>()
        .context("Invalid KNOWN_MODES")?;

    let state = AppState::new(
        store,
        known_modes,
        store_config.max_submit_retries,
        Duration::from_millis(store_config.lane_timeout_ms),
    );
    let app = router(state);

    let addr: SocketAddr = ([0, 0, 0, 0], service_config.port).into();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(addr = %addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
            }
            tracing::info!("Shutdown signal received");
        })
        .await
        .context("HTTP server error")?;

    shared::shutdown().await;
    tracing::info!("Clicker Service stopped");

    Ok(())
}
