//! Redis-based seat lock store using Lua scripts for atomicity.
//!
//! Suitable for multi-node deployments. Each script writes or reads both
//! directions of a lock in a single server-side step, and both keys always
//! carry the same `PX` expiry.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use redis::Client;
use redis::aio::ConnectionManager;
use tracing::{error, info};

use deskbook_core::error::{AppError, ErrorKind};
use deskbook_core::result::AppResult;
use deskbook_core::types::{SeatId, UserId};
use deskbook_entity::lock::SeatLock;

use crate::keys::LockKeys;
use crate::store::SeatLockStore;

/// Atomic acquire.
///
/// KEYS[1] = seat key
/// KEYS[2] = user key
/// ARGV[1] = user id
/// ARGV[2] = seat id
/// ARGV[3] = ttl in milliseconds
///
/// Returns `{code, detail}`:
///   1 = written (fresh or refreshed)
///  -1 = seat held by `detail`
///  -2 = user already holds seat `detail`
const ACQUIRE_SCRIPT: &str = r#"
    local holder = redis.call('GET', KEYS[1])
    if holder and holder ~= ARGV[1] then
        return {-1, holder}
    end

    local held = redis.call('GET', KEYS[2])
    if held and held ~= ARGV[2] then
        return {-2, held}
    end

    redis.call('SET', KEYS[1], ARGV[1], 'PX', ARGV[3])
    redis.call('SET', KEYS[2], ARGV[2], 'PX', ARGV[3])
    return {1, ''}
"#;

/// Atomic renew. Same KEYS/ARGV as acquire.
///
/// Returns 1 when extended, 0 when `ARGV[1]` is not the holder.
const RENEW_SCRIPT: &str = r#"
    if redis.call('GET', KEYS[1]) ~= ARGV[1] then
        return 0
    end

    redis.call('PEXPIRE', KEYS[1], ARGV[3])
    redis.call('SET', KEYS[2], ARGV[2], 'PX', ARGV[3])
    return 1
"#;

/// Atomic release. KEYS as acquire, ARGV[1] = user id, ARGV[2] = seat id.
///
/// Returns 1 when removed, 0 when nothing was held, -1 when another user
/// holds the seat.
const RELEASE_SCRIPT: &str = r#"
    local holder = redis.call('GET', KEYS[1])
    if not holder then
        return 0
    end
    if holder ~= ARGV[1] then
        return -1
    end

    redis.call('DEL', KEYS[1])
    if redis.call('GET', KEYS[2]) == ARGV[2] then
        redis.call('DEL', KEYS[2])
    end
    return 1
"#;

/// Consistent lookup from one side of a lock.
///
/// KEYS[1] = key being looked up (seat or user key)
/// ARGV[1] = prefix of the opposite-direction keys
/// ARGV[2] = id the opposite key must point back to
///
/// Returns `{counterpart id, remaining ttl ms}` or nil when the lock is
/// absent, expired or only half present.
const LOOKUP_SCRIPT: &str = r#"
    local other = redis.call('GET', KEYS[1])
    if not other then
        return false
    end
    if redis.call('GET', ARGV[1] .. other) ~= ARGV[2] then
        return false
    end

    local ttl = redis.call('PTTL', KEYS[1])
    if ttl <= 0 then
        return false
    end
    return {other, ttl}
"#;

/// Redis-based seat lock store for multi-node deployments.
#[derive(Clone)]
pub struct RedisSeatLockStore {
    conn: ConnectionManager,
    keys: LockKeys,
}

impl std::fmt::Debug for RedisSeatLockStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisSeatLockStore")
            .field("keys", &self.keys)
            .finish_non_exhaustive()
    }
}

impl RedisSeatLockStore {
    /// Connect to Redis and build a store writing keys under `key_prefix`.
    pub async fn connect(redis_url: &str, key_prefix: &str) -> AppResult<Self> {
        let client = Client::open(redis_url).map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, "Invalid Redis URL for lock store", e)
        })?;

        let conn = ConnectionManager::new(client).await.map_err(map_err)?;

        info!(key_prefix = %key_prefix, "Redis seat lock store connected");
        Ok(Self {
            conn,
            keys: LockKeys::new(key_prefix),
        })
    }

    async fn lookup(&self, key: String, back_prefix: &str, back_id: String) -> AppResult<Option<(String, i64)>> {
        let mut conn = self.conn.clone();
        redis::Script::new(LOOKUP_SCRIPT)
            .key(key)
            .arg(back_prefix)
            .arg(back_id)
            .invoke_async(&mut conn)
            .await
            .map_err(map_err)
    }
}

fn map_err(e: redis::RedisError) -> AppError {
    AppError::with_source(ErrorKind::Internal, format!("Redis lock store error: {e}"), e)
}

fn ttl_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX)
}

fn expires_in(ttl: Duration) -> chrono::DateTime<Utc> {
    let now = Utc::now();
    chrono::TimeDelta::from_std(ttl)
        .ok()
        .and_then(|d| now.checked_add_signed(d))
        .unwrap_or(chrono::DateTime::<Utc>::MAX_UTC)
}

fn parse_id<T: FromStr>(raw: &str, what: &str) -> AppResult<T> {
    raw.parse()
        .map_err(|_| AppError::internal(format!("Corrupt {what} id in lock store: {raw}")))
}

#[async_trait]
impl SeatLockStore for RedisSeatLockStore {
    async fn acquire(&self, seat_id: SeatId, user_id: UserId, ttl: Duration) -> AppResult<SeatLock> {
        let mut conn = self.conn.clone();

        let (code, detail): (i64, String) = redis::Script::new(ACQUIRE_SCRIPT)
            .key(self.keys.seat(seat_id))
            .key(self.keys.user(user_id))
            .arg(user_id.to_string())
            .arg(seat_id.to_string())
            .arg(ttl_millis(ttl))
            .invoke_async(&mut conn)
            .await
            .map_err(map_err)?;

        match code {
            1 => Ok(SeatLock {
                seat_id,
                user_id,
                expires_at: expires_in(ttl),
            }),
            -1 => Err(AppError::conflict(format!(
                "seat {seat_id} is locked by another user"
            ))),
            -2 => Err(AppError::conflict(format!(
                "user {user_id} already holds seat {detail}"
            ))),
            other => {
                error!(result = other, "Unexpected acquire script result");
                Err(AppError::internal(format!(
                    "Unexpected seat lock acquire result: {other}"
                )))
            }
        }
    }

    async fn renew(&self, seat_id: SeatId, user_id: UserId, ttl: Duration) -> AppResult<SeatLock> {
        let mut conn = self.conn.clone();

        let extended: i64 = redis::Script::new(RENEW_SCRIPT)
            .key(self.keys.seat(seat_id))
            .key(self.keys.user(user_id))
            .arg(user_id.to_string())
            .arg(seat_id.to_string())
            .arg(ttl_millis(ttl))
            .invoke_async(&mut conn)
            .await
            .map_err(map_err)?;

        if extended == 1 {
            Ok(SeatLock {
                seat_id,
                user_id,
                expires_at: expires_in(ttl),
            })
        } else {
            Err(AppError::not_owner(format!(
                "user {user_id} does not hold seat {seat_id}"
            )))
        }
    }

    async fn release(&self, seat_id: SeatId, user_id: UserId) -> AppResult<()> {
        let mut conn = self.conn.clone();

        let removed: i64 = redis::Script::new(RELEASE_SCRIPT)
            .key(self.keys.seat(seat_id))
            .key(self.keys.user(user_id))
            .arg(user_id.to_string())
            .arg(seat_id.to_string())
            .invoke_async(&mut conn)
            .await
            .map_err(map_err)?;

        match removed {
            -1 => Err(AppError::not_owner(format!(
                "seat {seat_id} is locked by another user"
            ))),
            _ => Ok(()),
        }
    }

    async fn by_seat(&self, seat_id: SeatId) -> AppResult<Option<SeatLock>> {
        let found = self
            .lookup(self.keys.seat(seat_id), self.keys.user_prefix(), seat_id.to_string())
            .await?;
        let Some((raw_user, ttl_ms)) = found else {
            return Ok(None);
        };
        Ok(Some(SeatLock {
            seat_id,
            user_id: parse_id(&raw_user, "user")?,
            expires_at: expires_in(Duration::from_millis(ttl_ms.max(0) as u64)),
        }))
    }

    async fn by_user(&self, user_id: UserId) -> AppResult<Option<SeatLock>> {
        let found = self
            .lookup(self.keys.user(user_id), self.keys.seat_prefix(), user_id.to_string())
            .await?;
        let Some((raw_seat, ttl_ms)) = found else {
            return Ok(None);
        };
        Ok(Some(SeatLock {
            seat_id: parse_id(&raw_seat, "seat")?,
            user_id,
            expires_at: expires_in(Duration::from_millis(ttl_ms.max(0) as u64)),
        }))
    }

    async fn health_check(&self) -> AppResult<bool> {
        let mut conn = self.conn.clone();
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(map_err)?;
        Ok(pong == "PONG")
    }
}
