//! Integration tests for the reservation endpoints.

mod helpers;

use helpers::at;
use http::StatusCode;
use uuid::Uuid;

#[tokio::test]
async fn test_create_reservation() {
    let app = helpers::TestApp::new();
    let (seat, user) = (app.seat(0), Uuid::new_v4());

    let response = app.book(seat, user, "10:00", "11:00").await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.data()["client_id"], user.to_string());
    assert_eq!(response.data()["seat_id"], seat.to_string());
    assert_eq!(response.data()["starts_at"], at("10:00"));
    assert_eq!(response.data()["is_canceled"], false);

    // Booking consumes the lock.
    let lock = app
        .request("GET", &format!("/api/locks/seats/{seat}"), None, None, None)
        .await;
    assert_eq!(lock.data()["held"], false);
}

#[tokio::test]
async fn test_create_requires_lock() {
    let app = helpers::TestApp::new();
    let user = Uuid::new_v4();

    let response = app
        .as_client(
            "POST",
            "/api/reservations",
            Some(serde_json::json!({
                "seat_id": app.seat(0),
                "starts_at": at("10:00"),
                "ends_at": at("11:00"),
            })),
            user,
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.error(), "NOT_OWNER");
}

#[tokio::test]
async fn test_overlap_and_adjacency() {
    let app = helpers::TestApp::new();
    let seat = app.seat(0);

    let (first_client, second_client) = (Uuid::new_v4(), Uuid::new_v4());

    let first = app.book(seat, first_client, "10:00", "11:00").await;
    assert_eq!(first.status, StatusCode::CREATED);

    let straddle = app.book(seat, second_client, "10:30", "11:30").await;
    assert_eq!(straddle.status, StatusCode::CONFLICT);
    assert_eq!(straddle.error(), "CONFLICT");

    // The rejected client keeps the seat lock.
    let lock = app
        .request("GET", &format!("/api/locks/seats/{seat}"), None, None, None)
        .await;
    assert_eq!(lock.data()["lock"]["user_id"], second_client.to_string());
    let intruder = app
        .as_client("POST", &format!("/api/locks/seats/{seat}"), None, Uuid::new_v4())
        .await;
    assert_eq!(intruder.status, StatusCode::CONFLICT);

    let adjacent = app.book(seat, second_client, "11:00", "12:00").await;
    assert_eq!(adjacent.status, StatusCode::CREATED);
    assert_eq!(adjacent.data()["client_id"], second_client.to_string());

    // Same interval on another seat is fine.
    let other_seat = app.book(app.seat(1), Uuid::new_v4(), "10:00", "11:00").await;
    assert_eq!(other_seat.status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_create_validation() {
    let app = helpers::TestApp::new();

    let inverted = app.book(app.seat(0), Uuid::new_v4(), "11:00", "10:00").await;
    assert_eq!(inverted.status, StatusCode::BAD_REQUEST);

    let after_hours = app.book(app.seat(1), Uuid::new_v4(), "21:30", "22:00").await;
    assert_eq!(after_hours.status, StatusCode::BAD_REQUEST);

    let unknown_seat = app.book(Uuid::new_v4(), Uuid::new_v4(), "10:00", "11:00").await;
    assert_eq!(unknown_seat.status, StatusCode::NOT_FOUND);
    assert_eq!(unknown_seat.error(), "SEAT_NOT_FOUND");
}

#[tokio::test]
async fn test_malformed_input_uses_error_envelope() {
    let app = helpers::TestApp::new();
    let user = Uuid::new_v4();

    let missing_seat = app
        .as_client(
            "POST",
            "/api/reservations",
            Some(serde_json::json!({ "starts_at": at("10:00"), "ends_at": at("11:00") })),
            user,
        )
        .await;
    assert_eq!(missing_seat.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing_seat.error(), "INVALID_ARGUMENT");

    let bad_id = app
        .as_client("GET", "/api/reservations/42", None, user)
        .await;
    assert_eq!(bad_id.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_id.error(), "INVALID_ARGUMENT");

    let bad_query = app
        .request("GET", "/api/reservations?year=soon", None, None, None)
        .await;
    assert_eq!(bad_query.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_query.error(), "INVALID_ARGUMENT");
}

#[tokio::test]
async fn test_client_cannot_book_for_others() {
    let app = helpers::TestApp::new();
    let (seat, user) = (app.seat(0), Uuid::new_v4());
    app.lock_seat(seat, user).await;

    let response = app
        .as_client(
            "POST",
            "/api/reservations",
            Some(serde_json::json!({
                "client_id": Uuid::new_v4(),
                "seat_id": seat,
                "starts_at": at("10:00"),
                "ends_at": at("11:00"),
            })),
            user,
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_get_permissions() {
    let app = helpers::TestApp::new();
    let owner = Uuid::new_v4();
    let created = app.book(app.seat(0), owner, "10:00", "11:00").await;
    let id = created.data()["id"].as_str().unwrap().to_string();
    let path = format!("/api/reservations/{id}");

    let own = app.as_client("GET", &path, None, owner).await;
    assert_eq!(own.status, StatusCode::OK);

    let stranger = app.as_client("GET", &path, None, Uuid::new_v4()).await;
    assert_eq!(stranger.status, StatusCode::FORBIDDEN);

    let admin = app
        .request("GET", &path, None, Some(Uuid::new_v4()), Some("admin"))
        .await;
    assert_eq!(admin.status, StatusCode::OK);

    let missing = app
        .as_client("GET", &format!("/api/reservations/{}", Uuid::new_v4()), None, owner)
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cancel_frees_interval() {
    let app = helpers::TestApp::new();
    let seat = app.seat(0);
    let owner = Uuid::new_v4();

    let created = app.book(seat, owner, "10:00", "11:00").await;
    let id = created.data()["id"].as_str().unwrap().to_string();

    let canceled = app
        .as_client("POST", &format!("/api/reservations/{id}/cancel"), None, owner)
        .await;
    assert_eq!(canceled.status, StatusCode::OK);
    assert_eq!(canceled.data()["is_canceled"], true);

    let rebooked = app.book(seat, Uuid::new_v4(), "10:00", "11:00").await;
    assert_eq!(rebooked.status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_update_reservation() {
    let app = helpers::TestApp::new();
    let seat = app.seat(0);
    let owner = Uuid::new_v4();

    let first = app.book(seat, owner, "10:00", "11:00").await;
    let id = first.data()["id"].as_str().unwrap().to_string();
    let path = format!("/api/reservations/{id}");
    app.book(seat, Uuid::new_v4(), "12:00", "13:00").await;

    // Extending into the next booking conflicts.
    let clash = app
        .as_client(
            "PATCH",
            &path,
            Some(serde_json::json!({ "ends_at": at("12:30") })),
            owner,
        )
        .await;
    assert_eq!(clash.status, StatusCode::CONFLICT);

    // Moving within its own slot does not conflict with itself.
    let moved = app
        .as_client(
            "PATCH",
            &path,
            Some(serde_json::json!({ "starts_at": at("10:30"), "ends_at": at("12:00") })),
            owner,
        )
        .await;
    assert_eq!(moved.status, StatusCode::OK);
    assert_eq!(moved.data()["ends_at"], at("12:00"));

    let stranger = app
        .as_client(
            "PATCH",
            &path,
            Some(serde_json::json!({ "is_visited": true })),
            Uuid::new_v4(),
        )
        .await;
    assert_eq!(stranger.status, StatusCode::FORBIDDEN);

    let reassign = app
        .as_client(
            "PATCH",
            &path,
            Some(serde_json::json!({ "client_id": Uuid::new_v4() })),
            owner,
        )
        .await;
    assert_eq!(reassign.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_visit_and_visited_query() {
    let app = helpers::TestApp::new();
    let owner = Uuid::new_v4();

    let visited = app.book(app.seat(0), owner, "09:00", "10:00").await;
    app.book(app.seat(1), Uuid::new_v4(), "09:00", "10:00").await;
    let id = visited.data()["id"].as_str().unwrap().to_string();

    let response = app
        .as_client("POST", &format!("/api/reservations/{id}/visit"), None, owner)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["is_visited"], true);

    let day = app
        .request(
            "GET",
            "/api/reservations/visited?year=2030&month=3&day=11",
            None,
            None,
            None,
        )
        .await;
    assert_eq!(day.status, StatusCode::OK);
    let items = day.data().as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], id);

    let other_day = app
        .request(
            "GET",
            "/api/reservations/visited?year=2030&month=3&day=12",
            None,
            None,
            None,
        )
        .await;
    assert!(other_day.data().as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_list_filters_and_paging() {
    let app = helpers::TestApp::new();
    let seat = app.seat(0);
    let client = Uuid::new_v4();

    for (from, to) in [("08:00", "09:00"), ("09:00", "10:00"), ("10:00", "11:00")] {
        let response = app.book(seat, client, from, to).await;
        assert_eq!(response.status, StatusCode::CREATED);
    }
    app.book(app.seat(1), Uuid::new_v4(), "08:00", "09:00").await;

    let by_seat = app
        .request("GET", &format!("/api/reservations?seat_id={seat}"), None, None, None)
        .await;
    let items = by_seat.data().as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["starts_at"], at("08:00"));

    let by_client = app
        .request(
            "GET",
            &format!("/api/reservations?client_id={client}&limit=2&offset=1"),
            None,
            None,
            None,
        )
        .await;
    let items = by_client.data().as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["starts_at"], at("09:00"));

    let by_day = app
        .request("GET", "/api/reservations?year=2030&month=3&day=11", None, None, None)
        .await;
    assert_eq!(by_day.data().as_array().unwrap().len(), 4);

    let bad = app
        .request("GET", "/api/reservations?month=3", None, None, None)
        .await;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_reservation() {
    let app = helpers::TestApp::new();
    let owner = Uuid::new_v4();
    let created = app.book(app.seat(0), owner, "10:00", "11:00").await;
    let id = created.data()["id"].as_str().unwrap().to_string();
    let path = format!("/api/reservations/{id}");

    let stranger = app.as_client("DELETE", &path, None, Uuid::new_v4()).await;
    assert_eq!(stranger.status, StatusCode::FORBIDDEN);

    let deleted = app.as_client("DELETE", &path, None, owner).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let gone = app.as_client("GET", &path, None, owner).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}
