//! Integration tests for the seat lock endpoints.

mod helpers;

use http::StatusCode;
use uuid::Uuid;

#[tokio::test]
async fn test_acquire_and_status() {
    let app = helpers::TestApp::new();
    let (seat, user) = (app.seat(0), Uuid::new_v4());

    let response = app
        .as_client("POST", &format!("/api/locks/seats/{seat}"), None, user)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["seat_id"], seat.to_string());
    assert_eq!(response.data()["user_id"], user.to_string());
    assert!(response.data()["expires_at"].is_string());

    let by_seat = app
        .request("GET", &format!("/api/locks/seats/{seat}"), None, None, None)
        .await;
    assert_eq!(by_seat.status, StatusCode::OK);
    assert_eq!(by_seat.data()["held"], true);
    assert_eq!(by_seat.data()["lock"]["user_id"], user.to_string());

    let by_user = app
        .request("GET", &format!("/api/locks/users/{user}"), None, None, None)
        .await;
    assert_eq!(by_user.data()["held"], true);
    assert_eq!(by_user.data()["lock"]["seat_id"], seat.to_string());
}

#[tokio::test]
async fn test_seat_contention() {
    let app = helpers::TestApp::new();
    let seat = app.seat(0);
    let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());

    app.lock_seat(seat, alice).await;

    let response = app
        .as_client("POST", &format!("/api/locks/seats/{seat}"), None, bob)
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.error(), "CONFLICT");

    // Re-acquiring your own lock refreshes it.
    let response = app
        .as_client("POST", &format!("/api/locks/seats/{seat}"), None, alice)
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_one_seat_per_user() {
    let app = helpers::TestApp::new();
    let user = Uuid::new_v4();

    app.lock_seat(app.seat(0), user).await;

    let response = app
        .as_client("POST", &format!("/api/locks/seats/{}", app.seat(1)), None, user)
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_renew_requires_holder() {
    let app = helpers::TestApp::new();
    let seat = app.seat(0);
    let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());

    app.lock_seat(seat, alice).await;

    let renewed = app
        .as_client(
            "PUT",
            &format!("/api/locks/seats/{seat}"),
            Some(serde_json::json!({ "ttl_seconds": 120 })),
            alice,
        )
        .await;
    assert_eq!(renewed.status, StatusCode::OK);

    let stolen = app
        .as_client("PUT", &format!("/api/locks/seats/{seat}"), None, bob)
        .await;
    assert_eq!(stolen.status, StatusCode::CONFLICT);
    assert_eq!(stolen.error(), "NOT_OWNER");
}

#[tokio::test]
async fn test_ttl_bounds() {
    let app = helpers::TestApp::new();
    let user = Uuid::new_v4();
    let path = format!("/api/locks/seats/{}", app.seat(0));

    let zero = app
        .as_client("POST", &path, Some(serde_json::json!({ "ttl_seconds": 0 })), user)
        .await;
    assert_eq!(zero.status, StatusCode::BAD_REQUEST);

    let huge = app
        .as_client(
            "POST",
            &path,
            Some(serde_json::json!({ "ttl_seconds": 86_400 })),
            user,
        )
        .await;
    assert_eq!(huge.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_release() {
    let app = helpers::TestApp::new();
    let seat = app.seat(0);
    let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
    let path = format!("/api/locks/seats/{seat}");

    app.lock_seat(seat, alice).await;

    let foreign = app.as_client("DELETE", &path, None, bob).await;
    assert_eq!(foreign.status, StatusCode::CONFLICT);

    let own = app.as_client("DELETE", &path, None, alice).await;
    assert_eq!(own.status, StatusCode::NO_CONTENT);

    // Releasing again is a no-op.
    let again = app.as_client("DELETE", &path, None, alice).await;
    assert_eq!(again.status, StatusCode::NO_CONTENT);

    let status = app.request("GET", &path, None, None, None).await;
    assert_eq!(status.data()["held"], false);

    app.lock_seat(seat, bob).await;
}

#[tokio::test]
async fn test_requires_identity() {
    let app = helpers::TestApp::new();
    let path = format!("/api/locks/seats/{}", app.seat(0));

    let anonymous = app.request("POST", &path, None, None, None).await;
    assert_eq!(anonymous.status, StatusCode::FORBIDDEN);

    let malformed = app
        .request("POST", "/api/locks/seats/not-a-uuid", None, Some(Uuid::new_v4()), None)
        .await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
    assert_eq!(malformed.error(), "INVALID_ARGUMENT");
}

#[tokio::test]
async fn test_health() {
    let app = helpers::TestApp::new();
    let response = app.request("GET", "/api/health", None, None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["status"], "ok");
    assert_eq!(response.data()["lock_store"], true);
}
