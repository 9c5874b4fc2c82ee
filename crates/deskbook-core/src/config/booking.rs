//! Booking window policy.

use serde::{Deserialize, Serialize};

/// Limits applied to every reservation interval (hours are UTC).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfig {
    /// Earliest hour a reservation may start or end.
    #[serde(default = "default_opening_hour")]
    pub opening_hour: u32,
    /// Hour at which the coworking closes; start and end hours must be below it.
    #[serde(default = "default_closing_hour")]
    pub closing_hour: u32,
    /// Shortest allowed reservation.
    #[serde(default = "default_min_duration")]
    pub min_duration_minutes: i64,
    /// Reservations must be strictly shorter than this.
    #[serde(default = "default_max_duration")]
    pub max_duration_hours: i64,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            opening_hour: default_opening_hour(),
            closing_hour: default_closing_hour(),
            min_duration_minutes: default_min_duration(),
            max_duration_hours: default_max_duration(),
        }
    }
}

fn default_opening_hour() -> u32 {
    8
}

fn default_closing_hour() -> u32 {
    21
}

fn default_min_duration() -> i64 {
    15
}

fn default_max_duration() -> i64 {
    13
}
