//! Request DTOs with input validation.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use deskbook_core::error::AppError;
use deskbook_core::result::AppResult;
use deskbook_core::types::{DateQuery, PageRequest, SeatId, UserId};
use deskbook_entity::reservation::{ReservationFilter, ReservationPatch};

/// Run `validator` checks, mapping failures to `InvalidArgument`.
pub fn validated<T: Validate>(value: T) -> AppResult<T> {
    value
        .validate()
        .map_err(|e| AppError::invalid_argument(e.to_string()))?;
    Ok(value)
}

fn ordered(starts_at: DateTime<Utc>, ends_at: DateTime<Utc>) -> Result<(), ValidationError> {
    if starts_at >= ends_at {
        return Err(ValidationError::new("interval")
            .with_message(Cow::Borrowed("`starts_at` must be earlier than `ends_at`")));
    }
    Ok(())
}

/// Body of lock acquire and renew requests. May be empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct LockRequest {
    /// Requested lock lifetime; the server default applies when absent.
    #[validate(range(min = 1, message = "ttl_seconds must be positive"))]
    pub ttl_seconds: Option<u64>,
}

/// Create reservation request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_create_interval"))]
pub struct CreateReservationBody {
    /// Client to book for; defaults to the requester.
    pub client_id: Option<Uuid>,
    /// Seat to book.
    pub seat_id: Uuid,
    /// Inclusive start.
    pub starts_at: DateTime<Utc>,
    /// Exclusive end.
    pub ends_at: DateTime<Utc>,
}

fn validate_create_interval(body: &CreateReservationBody) -> Result<(), ValidationError> {
    ordered(body.starts_at, body.ends_at)
}

/// Partial update request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_update_interval"))]
pub struct UpdateReservationBody {
    /// Reassign to another client (administrators only).
    pub client_id: Option<Uuid>,
    /// Move to another seat.
    pub seat_id: Option<Uuid>,
    /// New start.
    pub starts_at: Option<DateTime<Utc>>,
    /// New end.
    pub ends_at: Option<DateTime<Utc>>,
    /// Cancel or reinstate.
    pub is_canceled: Option<bool>,
    /// Mark attendance.
    pub is_visited: Option<bool>,
}

fn validate_update_interval(body: &UpdateReservationBody) -> Result<(), ValidationError> {
    match (body.starts_at, body.ends_at) {
        (Some(starts_at), Some(ends_at)) => ordered(starts_at, ends_at),
        _ => Ok(()),
    }
}

impl UpdateReservationBody {
    /// Convert to a store patch.
    pub fn into_patch(self) -> ReservationPatch {
        ReservationPatch {
            client_id: self.client_id.map(UserId::from_uuid),
            seat_id: self.seat_id.map(SeatId::from_uuid),
            starts_at: self.starts_at,
            ends_at: self.ends_at,
            is_canceled: self.is_canceled,
            is_visited: self.is_visited,
        }
    }
}

/// Query string of `GET /api/reservations`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ListReservationsQuery {
    /// Only this client's reservations.
    pub client_id: Option<Uuid>,
    /// Only this seat's reservations.
    pub seat_id: Option<Uuid>,
    /// Calendar year.
    pub year: Option<i32>,
    /// Month within `year`.
    #[validate(range(min = 1, max = 12))]
    pub month: Option<u32>,
    /// Day within `month`.
    #[validate(range(min = 1, max = 31))]
    pub day: Option<u32>,
    /// Attendance flag.
    pub visited: Option<bool>,
    /// Cancellation flag.
    pub canceled: Option<bool>,
    /// Page size.
    pub limit: Option<u32>,
    /// Items to skip.
    pub offset: Option<u64>,
}

impl ListReservationsQuery {
    /// Build the store filter, resolving the calendar selector if given.
    pub fn filter(&self) -> AppResult<ReservationFilter> {
        let range = match self.year {
            Some(year) => Some(
                DateQuery {
                    year,
                    month: self.month,
                    day: self.day,
                }
                .to_range()?,
            ),
            None if self.month.is_some() || self.day.is_some() => {
                return Err(AppError::invalid_argument("month and day require year"));
            }
            None => None,
        };

        Ok(ReservationFilter {
            client_id: self.client_id.map(UserId::from_uuid),
            seat_id: self.seat_id.map(SeatId::from_uuid),
            range,
            visited: self.visited,
            canceled: self.canceled,
        })
    }

    /// Pagination window.
    pub fn page(&self) -> PageRequest {
        PageRequest::from_parts(self.limit, self.offset)
    }
}

/// Query string of `GET /api/reservations/visited`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VisitedQuery {
    /// Calendar year.
    pub year: i32,
    /// Month within `year`.
    #[validate(range(min = 1, max = 12))]
    pub month: Option<u32>,
    /// Day within `month`.
    #[validate(range(min = 1, max = 31))]
    pub day: Option<u32>,
    /// Page size.
    pub limit: Option<u32>,
    /// Items to skip.
    pub offset: Option<u64>,
}

impl VisitedQuery {
    /// The calendar selector.
    pub fn date(&self) -> DateQuery {
        DateQuery {
            year: self.year,
            month: self.month,
            day: self.day,
        }
    }

    /// Pagination window.
    pub fn page(&self) -> PageRequest {
        PageRequest::from_parts(self.limit, self.offset)
    }
}
