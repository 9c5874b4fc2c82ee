//! In-memory seat lock store using a Tokio mutex for single-node deployments.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use deskbook_core::error::AppError;
use deskbook_core::result::AppResult;
use deskbook_core::types::{SeatId, UserId};
use deskbook_entity::lock::SeatLock;

use crate::store::SeatLockStore;

#[derive(Debug, Clone, Copy)]
struct Hold {
    user_id: UserId,
    deadline: Instant,
}

/// Both directions of every lock, mutated together under one guard.
#[derive(Debug, Default)]
struct Table {
    seats: HashMap<SeatId, Hold>,
    users: HashMap<UserId, SeatId>,
}

impl Table {
    /// Current holder of `seat_id`, dropping the entry if it has lapsed.
    fn holder(&mut self, seat_id: SeatId, now: Instant) -> Option<Hold> {
        let hold = *self.seats.get(&seat_id)?;
        if hold.deadline <= now {
            self.seats.remove(&seat_id);
            if self.users.get(&hold.user_id) == Some(&seat_id) {
                self.users.remove(&hold.user_id);
            }
            return None;
        }
        Some(hold)
    }

    /// Seat held by `user_id`, if the seat side still points back.
    fn held_by(&mut self, user_id: UserId, now: Instant) -> Option<(SeatId, Hold)> {
        let seat_id = *self.users.get(&user_id)?;
        match self.holder(seat_id, now) {
            Some(hold) if hold.user_id == user_id => Some((seat_id, hold)),
            _ => {
                self.users.remove(&user_id);
                None
            }
        }
    }

    /// Drop every lapsed hold and any user entry no longer backed by its seat.
    fn prune(&mut self, now: Instant) {
        self.seats.retain(|_, hold| hold.deadline > now);
        let seats = &self.seats;
        self.users
            .retain(|user_id, seat_id| seats.get(seat_id).is_some_and(|h| h.user_id == *user_id));
    }

    fn put(&mut self, seat_id: SeatId, user_id: UserId, deadline: Instant) {
        self.seats.insert(seat_id, Hold { user_id, deadline });
        self.users.insert(user_id, seat_id);
    }

    fn drop_lock(&mut self, seat_id: SeatId, user_id: UserId) {
        self.seats.remove(&seat_id);
        self.users.remove(&user_id);
    }
}

/// In-memory lock store. Suitable for single-node deployments only.
///
/// Deadlines run on the Tokio clock, so tests can pause and advance time.
/// Wall-clock `expires_at` values are projected from an anchor taken at
/// construction.
#[derive(Debug, Clone)]
pub struct MemorySeatLockStore {
    table: Arc<Mutex<Table>>,
    anchor: (Instant, DateTime<Utc>),
}

impl MemorySeatLockStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            table: Arc::new(Mutex::new(Table::default())),
            anchor: (Instant::now(), Utc::now()),
        }
    }

    fn wall_clock(&self, at: Instant) -> DateTime<Utc> {
        let (anchor_instant, anchor_wall) = self.anchor;
        let elapsed = at.saturating_duration_since(anchor_instant);
        chrono::TimeDelta::from_std(elapsed)
            .ok()
            .and_then(|d| anchor_wall.checked_add_signed(d))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    fn lock_info(&self, seat_id: SeatId, hold: Hold) -> SeatLock {
        SeatLock {
            seat_id,
            user_id: hold.user_id,
            expires_at: self.wall_clock(hold.deadline),
        }
    }
}

impl Default for MemorySeatLockStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SeatLockStore for MemorySeatLockStore {
    async fn acquire(&self, seat_id: SeatId, user_id: UserId, ttl: Duration) -> AppResult<SeatLock> {
        let mut table = self.table.lock().await;
        let now = Instant::now();
        table.prune(now);

        match table.holder(seat_id, now) {
            Some(hold) if hold.user_id != user_id => {
                return Err(AppError::conflict(format!(
                    "seat {seat_id} is locked by another user"
                )));
            }
            _ => {}
        }
        match table.held_by(user_id, now) {
            Some((held_seat, _)) if held_seat != seat_id => {
                return Err(AppError::conflict(format!(
                    "user {user_id} already holds seat {held_seat}"
                )));
            }
            _ => {}
        }

        let hold = Hold {
            user_id,
            deadline: now + ttl,
        };
        table.put(seat_id, user_id, hold.deadline);
        debug!(seat_id = %seat_id, user_id = %user_id, ttl_ms = ttl.as_millis() as u64, "Memory seat lock written");
        Ok(self.lock_info(seat_id, hold))
    }

    async fn renew(&self, seat_id: SeatId, user_id: UserId, ttl: Duration) -> AppResult<SeatLock> {
        let mut table = self.table.lock().await;
        let now = Instant::now();

        match table.holder(seat_id, now) {
            Some(hold) if hold.user_id == user_id => {
                let hold = Hold {
                    user_id,
                    deadline: now + ttl,
                };
                table.put(seat_id, user_id, hold.deadline);
                Ok(self.lock_info(seat_id, hold))
            }
            _ => Err(AppError::not_owner(format!(
                "user {user_id} does not hold seat {seat_id}"
            ))),
        }
    }

    async fn release(&self, seat_id: SeatId, user_id: UserId) -> AppResult<()> {
        let mut table = self.table.lock().await;
        match table.holder(seat_id, Instant::now()) {
            None => Ok(()),
            Some(hold) if hold.user_id == user_id => {
                table.drop_lock(seat_id, user_id);
                Ok(())
            }
            Some(_) => Err(AppError::not_owner(format!(
                "seat {seat_id} is locked by another user"
            ))),
        }
    }

    async fn by_seat(&self, seat_id: SeatId) -> AppResult<Option<SeatLock>> {
        let mut table = self.table.lock().await;
        let now = Instant::now();
        let Some(hold) = table.holder(seat_id, now) else {
            return Ok(None);
        };
        let agrees = table.users.get(&hold.user_id) == Some(&seat_id);
        Ok(agrees.then(|| self.lock_info(seat_id, hold)))
    }

    async fn by_user(&self, user_id: UserId) -> AppResult<Option<SeatLock>> {
        let mut table = self.table.lock().await;
        Ok(table
            .held_by(user_id, Instant::now())
            .map(|(seat_id, hold)| self.lock_info(seat_id, hold)))
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
