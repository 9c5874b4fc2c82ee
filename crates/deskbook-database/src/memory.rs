//! In-memory reservation store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use deskbook_core::error::AppError;
use deskbook_core::result::AppResult;
use deskbook_core::types::{PageRequest, ReservationId, SeatId, TimeRange, UserId};
use deskbook_entity::reservation::{NewReservation, Reservation, ReservationFilter, ReservationPatch};

use crate::store::ReservationStore;

/// Reservation store kept in process memory.
///
/// Every write holds the map's write guard across its overlap check and
/// mutation, which serializes conflicting writers.
#[derive(Debug, Clone, Default)]
pub struct MemoryReservationStore {
    inner: Arc<RwLock<HashMap<ReservationId, Reservation>>>,
}

impl MemoryReservationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn has_overlap(
    rows: &HashMap<ReservationId, Reservation>,
    seat_id: SeatId,
    range: &TimeRange,
    exclude: Option<ReservationId>,
) -> bool {
    rows.values().any(|r| r.blocks(seat_id, range, exclude))
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
impl ReservationStore for MemoryReservationStore {
    async fn insert_checked(&self, new: NewReservation) -> AppResult<Reservation> {
        let mut rows = self.inner.write().await;
        if has_overlap(&rows, new.seat_id, &new.range, None) {
            return Err(AppError::conflict(format!(
                "seat {} is already reserved in the requested interval",
                new.seat_id
            )));
        }

        let reservation = new.into_reservation(Utc::now());
        rows.insert(reservation.id, reservation.clone());
        debug!(reservation_id = %reservation.id, seat_id = %reservation.seat_id, "Reservation stored");
        Ok(reservation)
    }

    async fn update_checked(
        &self,
        id: ReservationId,
        patch: &ReservationPatch,
        required_owner: Option<UserId>,
    ) -> AppResult<Reservation> {
        let mut rows = self.inner.write().await;
        let current = rows
            .get(&id)
            .ok_or_else(|| AppError::not_found(format!("reservation {id} not found")))?;
        check_owner(current, required_owner)?;

        let merged = patch.apply(current, Utc::now())?;
        if merged.is_active() && has_overlap(&rows, merged.seat_id, &merged.range()?, Some(id)) {
            return Err(AppError::conflict(format!(
                "seat {} is already reserved in the requested interval",
                merged.seat_id
            )));
        }

        rows.insert(id, merged.clone());
        Ok(merged)
    }

    async fn delete(&self, id: ReservationId, required_owner: Option<UserId>) -> AppResult<()> {
        let mut rows = self.inner.write().await;
        let current = rows
            .get(&id)
            .ok_or_else(|| AppError::not_found(format!("reservation {id} not found")))?;
        check_owner(current, required_owner)?;
        rows.remove(&id);
        Ok(())
    }

    async fn find_by_id(&self, id: ReservationId) -> AppResult<Option<Reservation>> {
        Ok(self.inner.read().await.get(&id).cloned())
    }

    async fn exists(&self, id: ReservationId) -> AppResult<bool> {
        Ok(self.inner.read().await.contains_key(&id))
    }

    async fn list(&self, filter: &ReservationFilter, page: &PageRequest) -> AppResult<Vec<Reservation>> {
        let rows = self.inner.read().await;
        let mut matching: Vec<Reservation> = rows.values().filter(|r| filter.matches(r)).cloned().collect();
        matching.sort_by(|a, b| a.starts_at.cmp(&b.starts_at).then(a.id.cmp(&b.id)));
        Ok(page.apply(matching))
    }

    async fn is_overlapping(
        &self,
        seat_id: SeatId,
        range: &TimeRange,
        exclude: Option<ReservationId>,
    ) -> AppResult<bool> {
        Ok(has_overlap(&*self.inner.read().await, seat_id, range, exclude))
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone};
    use deskbook_core::error::ErrorKind;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, h, m, 0).unwrap()
    }

    fn new_booking(client_id: UserId, seat_id: SeatId, from: (u32, u32), to: (u32, u32)) -> NewReservation {
        NewReservation {
            client_id,
            seat_id,
            range: TimeRange::new(at(from.0, from.1), at(to.0, to.1)).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_overlap_rejected_adjacent_allowed() {
        let store = MemoryReservationStore::new();
        let seat = SeatId::new();
        store
            .insert_checked(new_booking(UserId::new(), seat, (10, 0), (11, 0)))
            .await
            .unwrap();

        let err = store
            .insert_checked(new_booking(UserId::new(), seat, (10, 30), (11, 30)))
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Conflict));

        store
            .insert_checked(new_booking(UserId::new(), seat, (11, 0), (12, 0)))
            .await
            .unwrap();
        store
            .insert_checked(new_booking(UserId::new(), SeatId::new(), (10, 0), (11, 0)))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_canceled_frees_interval() {
        let store = MemoryReservationStore::new();
        let seat = SeatId::new();
        let owner = UserId::new();
        let first = store
            .insert_checked(new_booking(owner, seat, (10, 0), (11, 0)))
            .await
            .unwrap();

        store
            .update_checked(first.id, &ReservationPatch::cancel(), Some(owner))
            .await
            .unwrap();

        let range = TimeRange::new(at(10, 0), at(11, 0)).unwrap();
        assert!(!store.is_overlapping(seat, &range, None).await.unwrap());
        store
            .insert_checked(new_booking(UserId::new(), seat, (10, 0), (11, 0)))
            .await
            .unwrap();

        let reinstate = ReservationPatch {
            is_canceled: Some(false),
            ..ReservationPatch::default()
        };
        let err = store.update_checked(first.id, &reinstate, None).await.unwrap_err();
        assert!(err.is(ErrorKind::Conflict));
    }

    #[tokio::test]
    async fn test_update_excludes_self_from_overlap() {
        let store = MemoryReservationStore::new();
        let seat = SeatId::new();
        let r = store
            .insert_checked(new_booking(UserId::new(), seat, (10, 0), (11, 0)))
            .await
            .unwrap();

        let extend = ReservationPatch {
            ends_at: Some(at(11, 30)),
            ..ReservationPatch::default()
        };
        let updated = store.update_checked(r.id, &extend, None).await.unwrap();
        assert_eq!(updated.ends_at, at(11, 30));
        assert_eq!(updated.starts_at, at(10, 0));
    }

    #[tokio::test]
    async fn test_owner_guard_and_missing() {
        let store = MemoryReservationStore::new();
        let owner = UserId::new();
        let r = store
            .insert_checked(new_booking(owner, SeatId::new(), (10, 0), (11, 0)))
            .await
            .unwrap();

        let err = store.delete(r.id, Some(UserId::new())).await.unwrap_err();
        assert!(err.is(ErrorKind::PermissionDenied));
        assert!(store.exists(r.id).await.unwrap());

        store.delete(r.id, Some(owner)).await.unwrap();
        assert!(!store.exists(r.id).await.unwrap());

        let err = store.delete(r.id, None).await.unwrap_err();
        assert!(err.is(ErrorKind::NotFound));
        let err = store
            .update_checked(r.id, &ReservationPatch::visit(), None)
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::NotFound));
    }

    #[tokio::test]
    async fn test_list_filters_and_pages() {
        let store = MemoryReservationStore::new();
        let client = UserId::new();
        for hour in [9, 13, 11] {
            store
                .insert_checked(new_booking(client, SeatId::new(), (hour, 0), (hour + 1, 0)))
                .await
                .unwrap();
        }
        store
            .insert_checked(new_booking(UserId::new(), SeatId::new(), (9, 0), (10, 0)))
            .await
            .unwrap();

        let mine = store
            .list(&ReservationFilter::by_client(client), &PageRequest::new(2, 0))
            .await
            .unwrap();
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].starts_at, at(9, 0));
        assert_eq!(mine[1].starts_at, at(11, 0));

        let rest = store
            .list(&ReservationFilter::by_client(client), &PageRequest::new(2, 2))
            .await
            .unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].starts_at, at(13, 0));
    }

    #[tokio::test]
    async fn test_concurrent_inserts_admit_one() {
        let store = MemoryReservationStore::new();
        let seat = SeatId::new();

        let attempts = (0..16).map(|i| {
            let store = store.clone();
            let start = i % 2;
            async move {
                store
                    .insert_checked(new_booking(UserId::new(), seat, (10, start * 15), (11, 0)))
                    .await
            }
        });
        let results = futures::future::join_all(attempts).await;

        let stored = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(stored, 1);
        assert!(
            results
                .iter()
                .filter_map(|r| r.as_ref().err())
                .all(|e| e.is(ErrorKind::Conflict))
        );
    }
}
