//! Opening hours and duration limits for reservations.

use chrono::{DateTime, TimeDelta, Timelike, Utc};

use deskbook_core::config::BookingConfig;
use deskbook_core::error::AppError;
use deskbook_core::result::AppResult;
use deskbook_core::types::TimeRange;

/// Business-hours policy applied to every created or moved reservation.
///
/// Start and end hours must fall within `[opening_hour, closing_hour)` UTC on
/// the same calendar day.
#[derive(Debug, Clone)]
pub struct BookingPolicy {
    opening_hour: u32,
    closing_hour: u32,
    min_duration: TimeDelta,
    max_duration: TimeDelta,
}

impl BookingPolicy {
    /// Build the policy from configuration.
    pub fn new(config: &BookingConfig) -> Self {
        Self {
            opening_hour: config.opening_hour,
            closing_hour: config.closing_hour,
            min_duration: TimeDelta::minutes(config.min_duration_minutes),
            max_duration: TimeDelta::hours(config.max_duration_hours),
        }
    }

    fn is_open_at(&self, at: DateTime<Utc>) -> bool {
        (self.opening_hour..self.closing_hour).contains(&at.hour())
    }

    /// Reject intervals outside opening hours or the duration limits.
    pub fn check(&self, range: &TimeRange) -> AppResult<()> {
        let (starts_at, ends_at) = (range.start(), range.end());

        if !self.is_open_at(starts_at) {
            return Err(AppError::invalid_argument(format!(
                "starts_at must be between {:02}:00 and {:02}:00 UTC",
                self.opening_hour, self.closing_hour
            )));
        }
        if !self.is_open_at(ends_at) {
            return Err(AppError::invalid_argument(format!(
                "ends_at must be between {:02}:00 and {:02}:00 UTC",
                self.opening_hour, self.closing_hour
            )));
        }
        if starts_at.date_naive() != ends_at.date_naive() {
            return Err(AppError::invalid_argument(
                "starts_at and ends_at must fall on the same day",
            ));
        }

        let duration = range.duration();
        if duration < self.min_duration {
            return Err(AppError::invalid_argument(format!(
                "reservation must last at least {} minutes",
                self.min_duration.num_minutes()
            )));
        }
        if duration >= self.max_duration {
            return Err(AppError::invalid_argument(format!(
                "reservation must be shorter than {} hours",
                self.max_duration.num_hours()
            )));
        }
        Ok(())
    }
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self::new(&BookingConfig::default())
    }
}
