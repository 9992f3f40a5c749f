//! End-to-end tests for the axum API.
//!
//! These tests use mock repositories - no database required.
//! Run with: `cargo test --features mocks --test e2e_axum`

#![cfg(feature = "mocks")]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use eventdesk::actions::{SeedAdminAction, SeedRolesAction};
use eventdesk::api::axum::{AppState, router};
use eventdesk::jwt::{JwtConfig, JwtService};
use eventdesk::{
    MockEventRepository, MockRegistrationRepository, MockRoleRepository, MockUserRepository,
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

const SECRET: &str = "an-e2e-test-secret-that-is-long-enough";
const ADMIN_EMAIL: &str = "admin@test.com";
const ADMIN_PASSWORD: &str = "admin1234";

async fn create_app() -> Router {
    let users = MockUserRepository::new();
    let roles = MockRoleRepository::new();
    let events = MockEventRepository::new();
    let registrations = MockRegistrationRepository::for_events(&events);

    SeedRolesAction::new(roles.clone()).execute().await.unwrap();
    SeedAdminAction::new(users.clone(), roles.clone())
        .execute(ADMIN_EMAIL, ADMIN_PASSWORD)
        .await
        .unwrap();

    router(AppState {
        user_repo: users,
        role_repo: roles,
        event_repo: events,
        registration_repo: registrations,
        jwt: JwtService::new(JwtConfig::new(SECRET).unwrap()),
    })
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn register(app: &Router, email: &str) -> (String, i64) {
    let (status, body) = send(
        app,
        "POST",
        "/auth/register",
        None,
        Some(json!({
            "email": email,
            "password": "password123",
            "firstName": "Test",
            "lastName": "User"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    (
        body["access_token"].as_str().unwrap().to_owned(),
        body["user"]["id"].as_i64().unwrap(),
    )
}

async fn login(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["access_token"].as_str().unwrap().to_owned()
}

async fn create_event(app: &Router, token: &str, title: &str, max: Option<i64>) -> i64 {
    let mut body = json!({
        "title": title,
        "description": "An evening of talks",
        "location": "Main hall",
        "date": "2030-06-01T18:00:00Z"
    });
    if let Some(max) = max {
        body["maxParticipants"] = json!(max);
    }

    let (status, body) = send(app, "POST", "/events", Some(token), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_register_returns_token_and_profile() {
    let app = create_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(json!({
            "email": "  New.User@Example.com ",
            "password": "password123",
            "firstName": "New",
            "lastName": "User"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["access_token"].as_str().is_some());
    assert_eq!(body["user"]["email"], "new.user@example.com");
    assert_eq!(body["user"]["firstName"], "New");
    assert_eq!(body["user"]["roles"], json!(["USER"]));
    assert!(body["user"].get("hashedPassword").is_none());
}

#[tokio::test]
async fn test_register_duplicate_and_invalid() {
    let app = create_app().await;
    register(&app, "a@b.com").await;

    let (status, body) = send(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(json!({
            "email": "A@B.com",
            "password": "password123",
            "firstName": "Test",
            "lastName": "User"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "USER_ALREADY_EXISTS");

    let (status, body) = send(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(json!({ "email": "c@d.com", "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_login_is_case_insensitive() {
    let app = create_app().await;
    register(&app, "A@B.com").await;

    let token = login(&app, "a@b.com", "password123").await;
    let (status, body) = send(&app, "GET", "/users/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "a@b.com");

    let (status, body) = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": "a@b.com", "password": "wrong-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = create_app().await;

    let (status, _) = send(&app, "GET", "/users/profile", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/events/1", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, "GET", "/events", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_event_lifecycle_is_creator_only() {
    let app = create_app().await;
    let (owner, owner_id) = register(&app, "owner@example.com").await;
    let (other, _) = register(&app, "other@example.com").await;

    let event_id = create_event(&app, &owner, "Rust meetup", None).await;

    let (status, body) = send(
        &app,
        "GET",
        &format!("/events/{event_id}"),
        Some(&other),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["maxParticipants"], 100);
    assert_eq!(body["createdBy"]["id"], owner_id);
    assert_eq!(body["registrationCount"], 0);

    let patch = json!({ "location": "Room 2" });
    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/events/{event_id}"),
        Some(&other),
        Some(patch.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/events/{event_id}"),
        Some(&owner),
        Some(patch),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["location"], "Room 2");
    assert_eq!(body["title"], "Rust meetup");

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/events/{event_id}"),
        Some(&other),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/events/{event_id}"),
        Some(&owner),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/events/{event_id}"),
        Some(&owner),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "EVENT_NOT_FOUND");
}

#[tokio::test]
async fn test_create_event_validation() {
    let app = create_app().await;
    let (token, _) = register(&app, "owner@example.com").await;

    let (status, body) = send(
        &app,
        "POST",
        "/events",
        Some(&token),
        Some(json!({
            "title": "Rust meetup",
            "description": "Talks",
            "location": "Berlin",
            "date": "2030-06-01T18:00:00Z",
            "maxParticipants": 0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "maxParticipants must be at least 1");
}

#[tokio::test]
async fn test_capacity_scenario() {
    let app = create_app().await;
    let (owner, _) = register(&app, "owner@example.com").await;
    let (alice, _) = register(&app, "alice@example.com").await;
    let (bob, _) = register(&app, "bob@example.com").await;

    let event_id = create_event(&app, &owner, "Tiny workshop", Some(1)).await;
    let uri = format!("/registrations/events/{event_id}");

    let (status, body) = send(&app, "POST", &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["eventId"], event_id);

    let (status, body) = send(&app, "POST", &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "ALREADY_REGISTERED");
    assert_eq!(body["message"], "User is already registered for this event");

    let (status, body) = send(&app, "POST", &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "EVENT_FULL");

    let (status, _) = send(&app, "DELETE", &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, "DELETE", &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "REGISTRATION_NOT_FOUND");

    let (status, _) = send(&app, "POST", &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(&app, "POST", "/registrations/events/999", Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_shrinking_capacity_below_registrations_conflicts() {
    let app = create_app().await;
    let (owner, _) = register(&app, "owner@example.com").await;
    let (alice, _) = register(&app, "alice@example.com").await;
    let (bob, _) = register(&app, "bob@example.com").await;

    let event_id = create_event(&app, &owner, "Workshop", Some(5)).await;
    let uri = format!("/registrations/events/{event_id}");
    send(&app, "POST", &uri, Some(&alice), None).await;
    send(&app, "POST", &uri, Some(&bob), None).await;

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/events/{event_id}"),
        Some(&owner),
        Some(json!({ "maxParticipants": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CAPACITY_BELOW_REGISTRATIONS");
}

#[tokio::test]
async fn test_participants_require_admin_and_ownership() {
    let app = create_app().await;
    let admin = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let (owner, _) = register(&app, "owner@example.com").await;
    let (alice, alice_id) = register(&app, "alice@example.com").await;

    let admin_event = create_event(&app, &admin, "Admin event", None).await;
    let owner_event = create_event(&app, &owner, "Owner event", None).await;
    send(&app, "POST", &format!("/registrations/events/{admin_event}"), Some(&alice), None).await;

    let (status, body) = send(
        &app,
        "GET",
        &format!("/registrations/events/{admin_event}/participants"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["user"]["id"], alice_id);
    assert_eq!(body[0]["user"]["email"], "alice@example.com");
    assert!(body[0]["registeredAt"].is_string());

    // Creator without ADMIN.
    let (status, _) = send(
        &app,
        "GET",
        &format!("/registrations/events/{owner_event}/participants"),
        Some(&owner),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // ADMIN but not the creator.
    let (status, _) = send(
        &app,
        "GET",
        &format!("/registrations/events/{owner_event}/participants"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_my_registrations() {
    let app = create_app().await;
    let (owner, owner_id) = register(&app, "owner@example.com").await;
    let (alice, alice_id) = register(&app, "alice@example.com").await;

    let (status, body) = send(
        &app,
        "GET",
        "/registrations/my-registrations",
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let event_id = create_event(&app, &owner, "Rust meetup", None).await;
    send(&app, "POST", &format!("/registrations/events/{event_id}"), Some(&alice), None).await;

    let (status, body) = send(
        &app,
        "GET",
        "/registrations/my-registrations",
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["event"]["id"], event_id);
    assert_eq!(body[0]["event"]["title"], "Rust meetup");
    assert_eq!(body[0]["event"]["createdBy"]["id"], owner_id);
    assert_eq!(body[0]["eventId"], event_id);
    assert_eq!(body[0]["userId"], alice_id);
    assert!(body[0]["registeredAt"].is_string());
}

#[tokio::test]
async fn test_assign_role_is_admin_only() {
    let app = create_app().await;
    let admin = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let (user, user_id) = register(&app, "user@example.com").await;
    let uri = format!("/users/{user_id}/assign-role");

    let (status, _) = send(
        &app,
        "PATCH",
        &uri,
        Some(&user),
        Some(json!({ "roleName": "ADMIN" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        "PATCH",
        &uri,
        Some(&admin),
        Some(json!({ "roleName": "ADMIN" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["roles"], json!(["USER", "ADMIN"]));

    let (status, body) = send(
        &app,
        "PATCH",
        &uri,
        Some(&admin),
        Some(json!({ "roleName": "OWNER" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "ROLE_NOT_FOUND");

    let (status, _) = send(
        &app,
        "PATCH",
        "/users/999/assign-role",
        Some(&admin),
        Some(json!({ "roleName": "ADMIN" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Roles are re-read per request, so the existing token now carries ADMIN.
    let (status, body) = send(&app, "GET", "/users/profile", Some(&user), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["roles"], json!(["USER", "ADMIN"]));
}

#[tokio::test]
async fn test_non_numeric_id_is_a_json_error() {
    let app = create_app().await;
    let (token, _) = register(&app, "user@example.com").await;

    for (method, uri) in [
        ("GET", "/events/abc"),
        ("DELETE", "/events/abc"),
        ("POST", "/registrations/events/abc"),
        ("DELETE", "/registrations/events/abc"),
    ] {
        let (status, body) = send(&app, method, uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{method} {uri}");
        assert_eq!(body["code"], "VALIDATION_ERROR", "{method} {uri}");
        assert!(
            body["message"]
                .as_str()
                .unwrap()
                .starts_with("Invalid path parameter")
        );
    }
}

#[tokio::test]
async fn test_error_body_has_message_and_code() {
    let app = create_app().await;
    let (status, body) = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": "nobody@example.com", "password": "password123" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid credentials");
    assert_eq!(body["error"], body["message"]);
    assert_eq!(body["code"], "INVALID_CREDENTIALS");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_joins_never_exceed_capacity() {
    let app = create_app().await;
    let (owner, _) = register(&app, "owner@example.com").await;
    let event_id = create_event(&app, &owner, "Small room", Some(3)).await;
    let uri = format!("/registrations/events/{event_id}");

    let mut tokens = Vec::new();
    for i in 0..10 {
        tokens.push(register(&app, &format!("user{i}@example.com")).await.0);
    }

    let mut handles = Vec::new();
    for token in tokens {
        let app = app.clone();
        let uri = uri.clone();
        handles.push(tokio::spawn(async move {
            send(&app, "POST", &uri, Some(&token), None).await
        }));
    }

    let mut created = 0;
    for handle in handles {
        let (status, body) = handle.await.unwrap();
        if status == StatusCode::CREATED {
            created += 1;
        } else {
            assert_eq!(status, StatusCode::CONFLICT);
            assert_eq!(body["code"], "EVENT_FULL");
        }
    }
    assert_eq!(created, 3);

    let (_, body) = send(&app, "GET", &format!("/events/{event_id}"), Some(&owner), None).await;
    assert_eq!(body["registrationCount"], 3);
}
