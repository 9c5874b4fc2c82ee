//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use deskbook_api::{AppState, build_app};
use deskbook_core::config::{LockConfig, ServerConfig};
use deskbook_core::types::SeatId;
use deskbook_database::{MemoryReservationStore, ReservationStore};
use deskbook_lock::{LockManager, MemorySeatLockStore};
use deskbook_service::{BookingPolicy, ReservationService, StaticSeatCatalog};

/// Test application context backed by in-memory stores.
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Seats known to the catalog
    pub seats: Vec<Uuid>,
}

impl TestApp {
    /// Create a new test application with three catalog seats.
    pub fn new() -> Self {
        let seats: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();

        let store: Arc<dyn ReservationStore> = Arc::new(MemoryReservationStore::new());
        let locks = Arc::new(LockManager::new(
            Arc::new(MemorySeatLockStore::new()),
            &LockConfig::default(),
        ));
        let catalog = Arc::new(StaticSeatCatalog::new(
            seats.iter().copied().map(SeatId::from_uuid),
        ));
        let reservations = Arc::new(ReservationService::new(
            Arc::clone(&store),
            Arc::clone(&locks),
            catalog,
            BookingPolicy::default(),
        ));

        let state = AppState::new(locks, reservations, store);
        let router = build_app(state, &ServerConfig::default());

        Self { router, seats }
    }

    /// Seat `n` of the catalog.
    pub fn seat(&self, n: usize) -> Uuid {
        self.seats[n]
    }

    /// Send a request as `user` (with optional role) and parse the JSON reply.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        user: Option<Uuid>,
        role: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(user) = user {
            req = req.header("x-user-id", user.to_string());
        }
        if let Some(role) = role {
            req = req.header("x-user-role", role);
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Shorthand for a client request.
    pub async fn as_client(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        user: Uuid,
    ) -> TestResponse {
        self.request(method, path, body, Some(user), None).await
    }

    /// Lock `seat` for `user`, asserting success.
    pub async fn lock_seat(&self, seat: Uuid, user: Uuid) {
        let response = self
            .as_client("POST", &format!("/api/locks/seats/{seat}"), None, user)
            .await;
        assert_eq!(response.status, StatusCode::OK, "lock failed: {}", response.body);
    }

    /// Lock and book `seat` for `user` on 2030-03-11 between the given hours.
    pub async fn book(&self, seat: Uuid, user: Uuid, from: &str, to: &str) -> TestResponse {
        self.lock_seat(seat, user).await;
        self.as_client(
            "POST",
            "/api/reservations",
            Some(serde_json::json!({
                "seat_id": seat,
                "starts_at": at(from),
                "ends_at": at(to),
            })),
            user,
        )
        .await
    }
}

/// RFC 3339 timestamp on the fixed test day.
pub fn at(hhmm: &str) -> String {
    format!("2030-03-11T{hhmm}:00Z")
}

/// Test response wrapper
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The `data` payload of a success response.
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    /// The `error` code of a failure response.
    pub fn error(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}
