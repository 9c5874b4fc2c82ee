//! Seat catalog clients.
//!
//! The coworking catalog owns seat metadata. Deskbook only asks whether a
//! seat exists before persisting a reservation for it.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, info, warn};

use deskbook_core::config::CatalogConfig;
use deskbook_core::error::{AppError, ErrorKind};
use deskbook_core::result::AppResult;
use deskbook_core::traits::SeatCatalog;
use deskbook_core::types::SeatId;

/// Build the catalog selected by configuration: HTTP when `base_url` is
/// set, otherwise the static list.
pub fn from_config(config: &CatalogConfig) -> AppResult<Arc<dyn SeatCatalog>> {
    if config.is_remote() {
        info!(base_url = %config.base_url, "Using HTTP seat catalog");
        Ok(Arc::new(HttpSeatCatalog::new(config)?))
    } else {
        info!(seats = config.static_seats.len(), "Using static seat catalog");
        Ok(Arc::new(StaticSeatCatalog::new(
            config.static_seats.iter().copied().map(SeatId::from_uuid),
        )))
    }
}

/// Catalog client speaking `GET {base_url}/seats/{id}`.
#[derive(Debug, Clone)]
pub struct HttpSeatCatalog {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSeatCatalog {
    /// Create a client with the configured request timeout.
    pub fn new(config: &CatalogConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build catalog client", e)
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn seat_url(&self, seat_id: SeatId) -> String {
        format!("{}/seats/{seat_id}", self.base_url)
    }
}

#[async_trait]
impl SeatCatalog for HttpSeatCatalog {
    async fn seat_exists(&self, seat_id: SeatId) -> AppResult<bool> {
        let url = self.seat_url(seat_id);
        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!(seat_id = %seat_id, error = %e, "Seat catalog unreachable");
            AppError::with_source(ErrorKind::Internal, "Seat catalog request failed", e)
        })?;

        let status = response.status();
        debug!(seat_id = %seat_id, status = %status, "Seat catalog answered");
        match status {
            s if s.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            other => Err(AppError::internal(format!(
                "Seat catalog returned unexpected status {other} for seat {seat_id}"
            ))),
        }
    }
}

/// Fixed set of seats, for development and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticSeatCatalog {
    seats: HashSet<SeatId>,
}

impl StaticSeatCatalog {
    /// A catalog containing exactly `seats`.
    pub fn new(seats: impl IntoIterator<Item = SeatId>) -> Self {
        Self {
            seats: seats.into_iter().collect(),
        }
    }
}

#[async_trait]
impl SeatCatalog for StaticSeatCatalog {
    async fn seat_exists(&self, seat_id: SeatId) -> AppResult<bool> {
        Ok(self.seats.contains(&seat_id))
    }
}
