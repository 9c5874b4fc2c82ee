//! Deskbook Server: seat reservation coordination service.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use deskbook_api::{AppState, build_app, serve};
use deskbook_core::config::AppConfig;
use deskbook_core::error::AppError;
use deskbook_database::{DatabasePool, ReservationStore};
use deskbook_lock::{LockManager, SeatLockStoreDispatch};
use deskbook_service::{BookingPolicy, ReservationService, catalog};

#[tokio::main]
async fn main() {
    let env = std::env::var("DESKBOOK_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Deskbook v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Reservation store ────────────────────────────────
    tracing::info!("Connecting to database...");
    let db_pool = DatabasePool::connect(&config.database).await?;
    let store: Arc<dyn ReservationStore> = Arc::new(db_pool.reservations());

    // ── Step 2: Seat lock store ──────────────────────────────────
    tracing::info!(backend = ?config.lock.backend, "Initializing seat lock store...");
    let lock_store = SeatLockStoreDispatch::from_config(&config.lock).await?;
    let locks = Arc::new(LockManager::new(Arc::new(lock_store), &config.lock));

    // ── Step 3: Seat catalog ─────────────────────────────────────
    let catalog = catalog::from_config(&config.catalog)?;

    // ── Step 4: Reservation coordinator ──────────────────────────
    let reservations = Arc::new(ReservationService::new(
        Arc::clone(&store),
        Arc::clone(&locks),
        catalog,
        BookingPolicy::new(&config.booking),
    ));

    // ── Step 5: HTTP server ──────────────────────────────────────
    let state = AppState::new(locks, reservations, store);
    let app = build_app(state, &config.server);
    let result = serve(app, &config.server).await;

    tracing::info!("Closing database pool...");
    db_pool.close().await;
    tracing::info!("Deskbook shutdown complete");

    result
}
