//! Reservation coordinator.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use deskbook_core::error::AppError;
use deskbook_core::result::AppResult;
use deskbook_core::traits::SeatCatalog;
use deskbook_core::types::{DateQuery, PageRequest, ReservationId, SeatId, TimeRange, UserId};
use deskbook_database::store::ReservationStore;
use deskbook_entity::reservation::{NewReservation, Reservation, ReservationFilter, ReservationPatch};
use deskbook_lock::LockManager;

use super::policy::BookingPolicy;
use crate::availability::AvailabilityChecker;
use crate::context::RequestContext;

/// Request to book a seat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReservationRequest {
    /// The client the seat is booked for.
    pub client_id: UserId,
    /// The seat to book.
    pub seat_id: SeatId,
    /// Inclusive start.
    pub starts_at: DateTime<Utc>,
    /// Exclusive end.
    pub ends_at: DateTime<Utc>,
}

/// Validates, authorizes and persists reservations.
///
/// Creation requires the requester to hold the seat lock; the lock is
/// released once the reservation is stored.
#[derive(Debug, Clone)]
pub struct ReservationService {
    /// Durable reservation record.
    store: Arc<dyn ReservationStore>,
    /// Seat lock manager.
    locks: Arc<LockManager>,
    /// External seat catalog.
    catalog: Arc<dyn SeatCatalog>,
    /// Overlap pre-check.
    availability: AvailabilityChecker,
    /// Opening hours and duration limits.
    policy: BookingPolicy,
}

impl ReservationService {
    /// Creates a new reservation service.
    pub fn new(
        store: Arc<dyn ReservationStore>,
        locks: Arc<LockManager>,
        catalog: Arc<dyn SeatCatalog>,
        policy: BookingPolicy,
    ) -> Self {
        Self {
            availability: AvailabilityChecker::new(Arc::clone(&store)),
            store,
            locks,
            catalog,
            policy,
        }
    }

    /// The availability checker sharing this service's store.
    pub fn availability(&self) -> &AvailabilityChecker {
        &self.availability
    }

    async fn ensure_seat_exists(&self, seat_id: SeatId) -> AppResult<()> {
        if self.catalog.seat_exists(seat_id).await? {
            Ok(())
        } else {
            Err(AppError::seat_not_found(format!("seat {seat_id} does not exist")))
        }
    }

    async fn load_accessible(&self, ctx: &RequestContext, id: ReservationId) -> AppResult<Reservation> {
        let reservation = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("reservation {id} not found")))?;

        if !ctx.may_access(reservation.client_id) {
            return Err(AppError::permission_denied(
                "only the owner or an administrator may access this reservation",
            ));
        }
        Ok(reservation)
    }

    /// Book a seat the requester currently holds a lock on.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        req: CreateReservationRequest,
    ) -> AppResult<Reservation> {
        let range = TimeRange::new(req.starts_at, req.ends_at)?;
        self.policy.check(&range)?;

        if !ctx.may_access(req.client_id) {
            return Err(AppError::permission_denied(
                "clients may only reserve seats for themselves",
            ));
        }

        if !self.locks.is_held_by(req.seat_id, ctx.user_id).await? {
            return Err(AppError::not_owner(format!(
                "seat {} must be locked by the requester before booking",
                req.seat_id
            )));
        }

        self.ensure_seat_exists(req.seat_id).await?;
        self.availability.ensure_available(req.seat_id, &range, None).await?;

        let reservation = self
            .store
            .insert_checked(NewReservation {
                client_id: req.client_id,
                seat_id: req.seat_id,
                range,
            })
            .await?;

        info!(
            reservation_id = %reservation.id,
            seat_id = %reservation.seat_id,
            client_id = %reservation.client_id,
            starts_at = %reservation.starts_at,
            ends_at = %reservation.ends_at,
            "Reservation created"
        );

        if let Err(e) = self.locks.release(req.seat_id, ctx.user_id).await {
            warn!(
                seat_id = %req.seat_id,
                user_id = %ctx.user_id,
                error = %e,
                "Failed to release seat lock after booking; it will expire"
            );
        }

        Ok(reservation)
    }

    /// Merge `patch` into a reservation the requester may access.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: ReservationId,
        patch: ReservationPatch,
    ) -> AppResult<Reservation> {
        let current = self.load_accessible(ctx, id).await?;

        if !ctx.is_admin() && patch.client_id.is_some_and(|c| c != current.client_id) {
            return Err(AppError::permission_denied(
                "only administrators may reassign a reservation",
            ));
        }

        if patch.moves_booking() {
            let range = TimeRange::new(
                patch.starts_at.unwrap_or(current.starts_at),
                patch.ends_at.unwrap_or(current.ends_at),
            )?;
            self.policy.check(&range)?;
        }

        if let Some(seat_id) = patch.seat_id.filter(|s| *s != current.seat_id) {
            self.ensure_seat_exists(seat_id).await?;
        }

        let updated = self.store.update_checked(id, &patch, ctx.owner_guard()).await?;
        info!(reservation_id = %id, user_id = %ctx.user_id, "Reservation updated");
        Ok(updated)
    }

    /// Mark a reservation canceled, freeing its interval.
    pub async fn cancel(&self, ctx: &RequestContext, id: ReservationId) -> AppResult<Reservation> {
        let updated = self
            .store
            .update_checked(id, &ReservationPatch::cancel(), ctx.owner_guard())
            .await?;
        info!(reservation_id = %id, user_id = %ctx.user_id, "Reservation canceled");
        Ok(updated)
    }

    /// Record that the client showed up.
    pub async fn visit(&self, ctx: &RequestContext, id: ReservationId) -> AppResult<Reservation> {
        let updated = self
            .store
            .update_checked(id, &ReservationPatch::visit(), ctx.owner_guard())
            .await?;
        info!(reservation_id = %id, user_id = %ctx.user_id, "Reservation visited");
        Ok(updated)
    }

    /// Permanently remove a reservation.
    pub async fn delete(&self, ctx: &RequestContext, id: ReservationId) -> AppResult<()> {
        self.store.delete(id, ctx.owner_guard()).await?;
        info!(reservation_id = %id, user_id = %ctx.user_id, "Reservation deleted");
        Ok(())
    }

    /// Fetch one reservation the requester may access.
    pub async fn get_by_id(&self, ctx: &RequestContext, id: ReservationId) -> AppResult<Reservation> {
        self.load_accessible(ctx, id).await
    }

    /// List reservations matching `filter`.
    pub async fn list(&self, filter: &ReservationFilter, page: PageRequest) -> AppResult<Vec<Reservation>> {
        self.store.list(filter, &page).await
    }

    /// Reservations of one seat.
    pub async fn get_by_seat(&self, seat_id: SeatId, page: PageRequest) -> AppResult<Vec<Reservation>> {
        self.list(&ReservationFilter::by_seat(seat_id), page).await
    }

    /// Reservations of one client.
    pub async fn get_by_client(&self, client_id: UserId, page: PageRequest) -> AppResult<Vec<Reservation>> {
        self.list(&ReservationFilter::by_client(client_id), page).await
    }

    /// Reservations overlapping a calendar year, month or day.
    pub async fn get_by_date_range(&self, date: DateQuery, page: PageRequest) -> AppResult<Vec<Reservation>> {
        let range = date.to_range()?;
        self.list(&ReservationFilter::by_range(range), page).await
    }

    /// Visited reservations overlapping a calendar year, month or day.
    pub async fn get_visited_by_date(&self, date: DateQuery, page: PageRequest) -> AppResult<Vec<Reservation>> {
        let range = date.to_range()?;
        self.list(&ReservationFilter::by_range(range).visited(true), page)
            .await
    }
}
