//! Seat availability checks against confirmed reservations.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use deskbook_core::error::AppError;
use deskbook_core::result::AppResult;
use deskbook_core::types::{ReservationId, SeatId, TimeRange};
use deskbook_database::store::ReservationStore;

/// Answers whether a seat is free over an interval.
///
/// This is an early answer for callers; the store repeats the same test
/// inside its write, so a `false` here is not a reservation.
#[derive(Debug, Clone)]
pub struct AvailabilityChecker {
    store: Arc<dyn ReservationStore>,
}

impl AvailabilityChecker {
    /// Creates a new availability checker.
    pub fn new(store: Arc<dyn ReservationStore>) -> Self {
        Self { store }
    }

    /// Whether any active reservation of `seat_id`, other than `exclude`,
    /// overlaps `[starts_at, ends_at)`.
    pub async fn is_overlapping(
        &self,
        seat_id: SeatId,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
        exclude: Option<ReservationId>,
    ) -> AppResult<bool> {
        let range = TimeRange::new(starts_at, ends_at)?;
        self.store.is_overlapping(seat_id, &range, exclude).await
    }

    /// Fail with `Conflict` when the interval is taken.
    pub async fn ensure_available(
        &self,
        seat_id: SeatId,
        range: &TimeRange,
        exclude: Option<ReservationId>,
    ) -> AppResult<()> {
        if self.store.is_overlapping(seat_id, range, exclude).await? {
            return Err(AppError::conflict(format!(
                "seat {seat_id} is already reserved in the requested interval"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use deskbook_core::error::ErrorKind;
    use deskbook_core::types::UserId;
    use deskbook_database::MemoryReservationStore;
    use deskbook_entity::reservation::NewReservation;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, h, m, 0).unwrap()
    }

    #[tokio::test]
    async fn test_overlap_and_exclusion() {
        let store = Arc::new(MemoryReservationStore::new());
        let seat = SeatId::new();
        let booked = store
            .insert_checked(NewReservation {
                client_id: UserId::new(),
                seat_id: seat,
                range: TimeRange::new(at(10, 0), at(11, 0)).unwrap(),
            })
            .await
            .unwrap();
        let checker = AvailabilityChecker::new(store);

        assert!(checker.is_overlapping(seat, at(10, 30), at(11, 30), None).await.unwrap());
        assert!(!checker.is_overlapping(seat, at(11, 0), at(12, 0), None).await.unwrap());
        assert!(!checker.is_overlapping(seat, at(9, 0), at(10, 0), None).await.unwrap());
        assert!(
            !checker
                .is_overlapping(seat, at(10, 30), at(11, 30), Some(booked.id))
                .await
                .unwrap()
        );

        let range = TimeRange::new(at(10, 45), at(11, 15)).unwrap();
        let err = checker.ensure_available(seat, &range, None).await.unwrap_err();
        assert!(err.is(ErrorKind::Conflict));
    }

    #[tokio::test]
    async fn test_inverted_interval_is_invalid() {
        let checker = AvailabilityChecker::new(Arc::new(MemoryReservationStore::new()));
        let err = checker
            .is_overlapping(SeatId::new(), at(11, 0), at(10, 0), None)
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::InvalidArgument));
    }
}
