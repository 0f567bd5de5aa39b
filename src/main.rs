use std::net::SocketAddr;
use std::sync::Arc;

use job_board_backend::{
    config::{get_config, init_config, StoreBackend},
    database::{
        pool::{create_pool, run_migrations},
        InMemoryStore, PgRecordStore, RecordStore,
    },
    routes::build_router,
    services::expiration_service::ExpirationScheduler,
    AppState,
};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
    init_config()?;
    let config = get_config();

    let store: Arc<dyn RecordStore> = match config.store_backend {
        StoreBackend::Postgres => {
            let pool = create_pool(config).await?;
            run_migrations(&pool).await?;
            Arc::new(PgRecordStore::new(pool))
        }
        StoreBackend::Memory => {
            warn!("Using the in-memory record store; data is lost on shutdown");
            Arc::new(InMemoryStore::new())
        }
    };

    let app_state = AppState::new(store, config);
    let scheduler = ExpirationScheduler::start(
        app_state.expiration_service.clone(),
        &config.expiration_sweep_cron,
    )
    .await?;

    let app = build_router(app_state);

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.shutdown().await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = ?e, "Failed to listen for shutdown signal");
    }
}
