//! PostgreSQL reservation store.
//!
//! Overlap safety has two layers. Each checked write runs in a transaction
//! that locks the affected row and tests for overlap before writing, and
//! the `reservations_no_overlap` exclusion constraint rejects whatever a
//! concurrent transaction slips past that test. Both surface as
//! `ErrorKind::Conflict`.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;

use deskbook_core::error::{AppError, ErrorKind};
use deskbook_core::result::AppResult;
use deskbook_core::types::{PageRequest, ReservationId, SeatId, TimeRange, UserId};
use deskbook_entity::reservation::{NewReservation, Reservation, ReservationFilter, ReservationPatch};

use crate::store::ReservationStore;

/// SQLSTATE for `exclusion_violation`.
const EXCLUSION_VIOLATION: &str = "23P01";
/// SQLSTATE for `serialization_failure`.
const SERIALIZATION_FAILURE: &str = "40001";

const OVERLAP_QUERY: &str = "SELECT EXISTS (\
     SELECT 1 FROM reservations \
     WHERE seat_id = $1 AND NOT is_canceled \
       AND starts_at < $3 AND ends_at > $2 \
       AND ($4::uuid IS NULL OR id <> $4))";

/// Reservation store backed by the `reservations` table.
#[derive(Debug, Clone)]
pub struct PgReservationRepository {
    pool: PgPool,
}

impl PgReservationRepository {
    /// Create a new reservation repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn begin(&self) -> AppResult<Transaction<'static, Postgres>> {
        self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Internal, "Failed to begin transaction", e)
        })
    }

    async fn lock_row(
        tx: &mut Transaction<'static, Postgres>,
        id: ReservationId,
    ) -> AppResult<Reservation> {
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Internal, "Failed to load reservation", e))?
            .ok_or_else(|| AppError::not_found(format!("reservation {id} not found")))
    }

    async fn overlaps_in(
        tx: &mut Transaction<'static, Postgres>,
        seat_id: SeatId,
        range: &TimeRange,
        exclude: Option<ReservationId>,
    ) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(OVERLAP_QUERY)
            .bind(seat_id)
            .bind(range.start())
            .bind(range.end())
            .bind(exclude)
            .fetch_one(&mut **tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Internal, "Failed to check overlap", e))
    }
}

fn overlap_conflict(seat_id: SeatId) -> AppError {
    AppError::conflict(format!(
        "seat {seat_id} is already reserved in the requested interval"
    ))
}

/// Map a write failure, turning constraint and serialization races into
/// `Conflict`.
fn write_error(err: sqlx::Error, seat_id: SeatId, context: &str) -> AppError {
    let raced = match &err {
        sqlx::Error::Database(db) => matches!(
            db.code().as_deref(),
            Some(EXCLUSION_VIOLATION | SERIALIZATION_FAILURE)
        ),
        _ => false,
    };
    if raced {
        debug!(seat_id = %seat_id, "Concurrent reservation write rejected by database");
        return overlap_conflict(seat_id);
    }
    AppError::with_source(ErrorKind::Internal, context.to_string(), err)
}

fn check_owner(reservation: &Reservation, required_owner: Option<UserId>) -> AppResult<()> {
    match required_owner {
        Some(owner) if reservation.client_id != owner => Err(AppError::permission_denied(format!(
            "reservation {} belongs to another client",
            reservation.id
        ))),
        _ => Ok(()),
    }
}

#[async_trait]
impl ReservationStore for PgReservationRepository {
    async fn insert_checked(&self, new: NewReservation) -> AppResult<Reservation> {
        let seat_id = new.seat_id;
        let mut tx = self.begin().await?;

        if Self::overlaps_in(&mut tx, seat_id, &new.range, None).await? {
            return Err(overlap_conflict(seat_id));
        }

        let row = new.into_reservation(Utc::now());
        let reservation = sqlx::query_as::<_, Reservation>(
            "INSERT INTO reservations \
             (id, client_id, seat_id, starts_at, ends_at, is_canceled, is_visited, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
        )
        .bind(row.id)
        .bind(row.client_id)
        .bind(row.seat_id)
        .bind(row.starts_at)
        .bind(row.ends_at)
        .bind(row.is_canceled)
        .bind(row.is_visited)
        .bind(row.created_at)
        .bind(row.updated_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| write_error(e, seat_id, "Failed to insert reservation"))?;

        tx.commit()
            .await
            .map_err(|e| write_error(e, seat_id, "Failed to commit reservation"))?;
        Ok(reservation)
    }

    async fn update_checked(
        &self,
        id: ReservationId,
        patch: &ReservationPatch,
        required_owner: Option<UserId>,
    ) -> AppResult<Reservation> {
        let mut tx = self.begin().await?;
        let current = Self::lock_row(&mut tx, id).await?;
        check_owner(&current, required_owner)?;

        let merged = patch.apply(&current, Utc::now())?;
        if merged.is_active()
            && Self::overlaps_in(&mut tx, merged.seat_id, &merged.range()?, Some(id)).await?
        {
            return Err(overlap_conflict(merged.seat_id));
        }

        let updated = sqlx::query_as::<_, Reservation>(
            "UPDATE reservations SET client_id = $2, seat_id = $3, starts_at = $4, ends_at = $5, \
             is_canceled = $6, is_visited = $7, updated_at = $8 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(merged.client_id)
        .bind(merged.seat_id)
        .bind(merged.starts_at)
        .bind(merged.ends_at)
        .bind(merged.is_canceled)
        .bind(merged.is_visited)
        .bind(merged.updated_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| write_error(e, merged.seat_id, "Failed to update reservation"))?;

        tx.commit()
            .await
            .map_err(|e| write_error(e, merged.seat_id, "Failed to commit reservation update"))?;
        Ok(updated)
    }

    async fn delete(&self, id: ReservationId, required_owner: Option<UserId>) -> AppResult<()> {
        let mut tx = self.begin().await?;
        let current = Self::lock_row(&mut tx, id).await?;
        check_owner(&current, required_owner)?;

        sqlx::query("DELETE FROM reservations WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Internal, "Failed to delete reservation", e))?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Internal, "Failed to commit reservation delete", e)
        })
    }

    async fn find_by_id(&self, id: ReservationId) -> AppResult<Option<Reservation>> {
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Internal, "Failed to find reservation", e))
    }

    async fn exists(&self, id: ReservationId) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM reservations WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Internal, "Failed to check reservation", e))
    }

    async fn list(&self, filter: &ReservationFilter, page: &PageRequest) -> AppResult<Vec<Reservation>> {
        sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations \
             WHERE ($1::uuid IS NULL OR client_id = $1) \
               AND ($2::uuid IS NULL OR seat_id = $2) \
               AND ($3::timestamptz IS NULL OR (starts_at < $4 AND ends_at > $3)) \
               AND ($5::bool IS NULL OR is_visited = $5) \
               AND ($6::bool IS NULL OR is_canceled = $6) \
             ORDER BY starts_at ASC, id ASC LIMIT $7 OFFSET $8",
        )
        .bind(filter.client_id)
        .bind(filter.seat_id)
        .bind(filter.range.map(|r| r.start()))
        .bind(filter.range.map(|r| r.end()))
        .bind(filter.visited)
        .bind(filter.canceled)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Internal, "Failed to list reservations", e))
    }

    async fn is_overlapping(
        &self,
        seat_id: SeatId,
        range: &TimeRange,
        exclude: Option<ReservationId>,
    ) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(OVERLAP_QUERY)
            .bind(seat_id)
            .bind(range.start())
            .bind(range.end())
            .bind(exclude)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Internal, "Failed to check overlap", e))
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Internal, "Database health check failed", e))
    }
}
