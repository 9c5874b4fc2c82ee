//! Embedded reservation schema migrations.

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::info;

use deskbook_core::error::{AppError, ErrorKind};

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Apply every migration under `migrations/` that the database has not seen.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    info!(known = MIGRATOR.iter().count(), "Applying reservation schema");

    MIGRATOR.run(pool).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Internal,
            format!("Failed to apply reservation schema: {e}"),
            e,
        )
    })?;

    info!("Reservation schema is up to date");
    Ok(())
}
