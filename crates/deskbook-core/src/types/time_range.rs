//! Half-open time intervals and calendar date queries.
//!
//! Every interval in Deskbook is `[start, end)`: two ranges that only share
//! a boundary instant do not overlap, so back-to-back bookings are allowed.

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::result::AppResult;

/// A validated half-open interval `[start, end)` with `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTimeRange")]
pub struct TimeRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

/// Unchecked wire form of [`TimeRange`].
#[derive(Deserialize)]
struct RawTimeRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RawTimeRange> for TimeRange {
    type Error = AppError;

    fn try_from(raw: RawTimeRange) -> AppResult<Self> {
        Self::new(raw.start, raw.end)
    }
}

impl TimeRange {
    /// Create a range, rejecting empty or inverted intervals.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> AppResult<Self> {
        if start >= end {
            return Err(AppError::invalid_argument(format!(
                "starts_at ({start}) must be earlier than ends_at ({end})"
            )));
        }
        Ok(Self { start, end })
    }

    /// Inclusive start instant.
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Exclusive end instant.
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Length of the interval.
    pub fn duration(&self) -> chrono::TimeDelta {
        self.end - self.start
    }

    /// Half-open overlap test: `self.start < other.end && self.end > other.start`.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        overlaps(self.start, self.end, other.start, other.end)
    }
}

/// Half-open overlap predicate on raw instants.
pub fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && a_end > b_start
}

/// Calendar selector: a whole year, a month of a year, or a single day (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateQuery {
    /// Calendar year.
    pub year: i32,
    /// Month `1..=12`; required when `day` is given.
    pub month: Option<u32>,
    /// Day of month `1..=31`.
    pub day: Option<u32>,
}

impl DateQuery {
    /// A single calendar day.
    pub fn day(year: i32, month: u32, day: u32) -> Self {
        Self {
            year,
            month: Some(month),
            day: Some(day),
        }
    }

    /// Resolve the selector to the half-open UTC range it covers.
    pub fn to_range(&self) -> AppResult<TimeRange> {
        let invalid = || AppError::invalid_argument(format!("invalid date: {self:?}"));

        let (start, end) = match (self.month, self.day) {
            (Some(month), Some(day)) => {
                let start = NaiveDate::from_ymd_opt(self.year, month, day).ok_or_else(invalid)?;
                let end = start.checked_add_days(Days::new(1)).ok_or_else(invalid)?;
                (start, end)
            }
            (Some(month), None) => {
                let start = NaiveDate::from_ymd_opt(self.year, month, 1).ok_or_else(invalid)?;
                let end = if start.month() == 12 {
                    NaiveDate::from_ymd_opt(self.year + 1, 1, 1)
                } else {
                    NaiveDate::from_ymd_opt(self.year, start.month() + 1, 1)
                }
                .ok_or_else(invalid)?;
                (start, end)
            }
            (None, None) => {
                let start = NaiveDate::from_ymd_opt(self.year, 1, 1).ok_or_else(invalid)?;
                let end = NaiveDate::from_ymd_opt(self.year + 1, 1, 1).ok_or_else(invalid)?;
                (start, end)
            }
            (None, Some(_)) => {
                return Err(AppError::invalid_argument("day requires month"));
            }
        };

        TimeRange::new(midnight(start), midnight(end))
    }
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}
