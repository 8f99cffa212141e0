//! API integration tests
//!
//! These run against a live server with a fresh database and the default
//! admin account (`admin` / `123456`).

use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Log in, waiting out the credential endpoint rate limit if needed
async fn login(client: &Client, username: &str, password: &str) -> String {
    for _ in 0..10 {
        let response = client
            .post(format!("{}/auth/login", BASE_URL))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to send login request");

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            tokio::time::sleep(Duration::from_secs(2)).await;
            continue;
        }

        let body: Value = response.json().await.expect("Failed to parse login response");
        return body["token"].as_str().expect("No token in response").to_string();
    }
    panic!("Login kept being rate limited");
}

async fn admin_token(client: &Client) -> String {
    login(client, "admin", "123456").await
}

fn unique(prefix: &str) -> String {
    format!("{}{}", prefix, uuid::Uuid::new_v4().simple())
        .chars()
        .take(30)
        .collect()
}

/// Create a user through the admin endpoint and return (id, token)
async fn create_user(client: &Client, admin: &str, role: &str) -> (i64, String) {
    let username = unique("u");
    let response = client
        .post(format!("{}/users", BASE_URL))
        .bearer_auth(admin)
        .json(&json!({
            "username": username,
            "password": "secret123",
            "email": format!("{}@example.com", username),
            "role": role
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse response");
    let id = body["id"].as_i64().expect("No user id");

    let token = login(client, &username, "secret123").await;
    (id, token)
}

async fn create_event(client: &Client, token: &str, capacity: i32) -> Value {
    let start = Utc::now() + ChronoDuration::days(7);
    let response = client
        .post(format!("{}/events", BASE_URL))
        .bearer_auth(token)
        .json(&json!({
            "title": unique("Workshop "),
            "description": "Hands-on session",
            "location": "Main hall",
            "start_date": start,
            "end_date": start + ChronoDuration::hours(2),
            "capacity": capacity
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);
    response.json().await.expect("Failed to parse response")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_login() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "username": "admin", "password": "123456" }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["user"]["role"], "ADMIN");
    assert!(body["user"].get("password").is_none());
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "username": "admin", "password": "wrong" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_unauthenticated_request() {
    let client = Client::new();

    let response = client
        .get(format!("{}/auth/me", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_register_duplicate_username() {
    let client = Client::new();
    let username = unique("dup");
    let body = json!({
        "username": username,
        "password": "secret123",
        "email": format!("{}@example.com", username)
    });

    let first = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&body)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(first.status(), StatusCode::CREATED);
    let created: Value = first.json().await.expect("Failed to parse response");
    assert_eq!(created["role"], "USER");

    let second = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&body)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore]
async fn test_event_approval_and_registration_flow() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let (_, organizer) = create_user(&client, &admin, "ORGANIZER").await;
    let (_, attendee) = create_user(&client, &admin, "USER").await;
    let (_, late) = create_user(&client, &admin, "USER").await;

    let event = create_event(&client, &organizer, 1).await;
    let id = event["id"].as_i64().expect("No event id");
    assert_eq!(event["status"], "PENDING");
    assert_eq!(event["registrations"], 0);

    // Pending events do not accept registrations
    let response = client
        .post(format!("{}/events/{}/register", BASE_URL, id))
        .bearer_auth(&attendee)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Organizers cannot approve
    let response = client
        .post(format!("{}/events/{}/approve", BASE_URL, id))
        .bearer_auth(&organizer)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = client
        .post(format!("{}/events/{}/approve", BASE_URL, id))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "APPROVED");

    // Second approval is rejected
    let response = client
        .post(format!("{}/events/{}/approve", BASE_URL, id))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .post(format!("{}/events/{}/register", BASE_URL, id))
        .bearer_auth(&attendee)
        .json(&json!({ "notes": "Vegetarian lunch" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let registration: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(registration["status"], "CONFIRMED");

    // Capacity of one is now used up
    let response = client
        .post(format!("{}/events/{}/register", BASE_URL, id))
        .bearer_auth(&late)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .get(format!("{}/events/{}/is-registered", BASE_URL, id))
        .bearer_auth(&attendee)
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["registered"], true);

    // Check-in by the creator, twice
    let url = format!(
        "{}/events/{}/registrations/{}/check-in",
        BASE_URL, id, registration["id"]
    );
    let response = client
        .put(&url)
        .bearer_auth(&organizer)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["attended"], true);

    let response = client
        .put(&url)
        .bearer_auth(&organizer)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Cancelling frees the seat
    let response = client
        .delete(format!("{}/events/{}/register", BASE_URL, id))
        .bearer_auth(&attendee)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let response = client
        .get(format!("{}/events/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["registrations"], 0);

    let response = client
        .delete(format!("{}/events/{}", BASE_URL, id))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
#[ignore]
async fn test_duplicate_registration_and_reactivation() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let (_, organizer) = create_user(&client, &admin, "ORGANIZER").await;
    let (_, attendee) = create_user(&client, &admin, "USER").await;

    let event = create_event(&client, &organizer, 5).await;
    let id = event["id"].as_i64().expect("No event id");

    let response = client
        .post(format!("{}/events/{}/approve", BASE_URL, id))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let register_url = format!("{}/events/{}/register", BASE_URL, id);

    let response = client
        .post(&register_url)
        .bearer_auth(&attendee)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let first: Value = response.json().await.expect("Failed to parse response");

    // Seats remain, so only the existing registration blocks this
    let response = client
        .post(&register_url)
        .bearer_auth(&attendee)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["message"]
        .as_str()
        .unwrap_or_default()
        .contains("already registered"));

    let response = client
        .delete(&register_url)
        .bearer_auth(&attendee)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    // The cancelled row is reused
    let response = client
        .post(&register_url)
        .bearer_auth(&attendee)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let again: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(again["id"], first["id"]);
    assert_eq!(again["status"], "CONFIRMED");

    let response = client
        .get(format!("{}/events/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["registrations"], 1);
}

#[tokio::test]
#[ignore]
async fn test_reject_and_resubmit() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let (_, organizer) = create_user(&client, &admin, "ORGANIZER").await;

    let event = create_event(&client, &organizer, 20).await;
    let id = event["id"].as_i64().expect("No event id");

    let response = client
        .post(format!("{}/events/{}/reject", BASE_URL, id))
        .bearer_auth(&admin)
        .json(&json!({ "reason": "" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .post(format!("{}/events/{}/reject", BASE_URL, id))
        .bearer_auth(&admin)
        .json(&json!({ "reason": "Add a speaker" }))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "NEEDS_REVISION");
    assert_eq!(body["rejection_reason"], "Add a speaker");

    let response = client
        .put(format!("{}/events/{}", BASE_URL, id))
        .bearer_auth(&organizer)
        .json(&json!({ "speaker": "Dr. Smith" }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "PENDING");
    assert!(body["rejection_reason"].is_null());
}

#[tokio::test]
#[ignore]
async fn test_user_cannot_create_event() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let (_, user) = create_user(&client, &admin, "USER").await;

    let start = Utc::now() + ChronoDuration::days(1);
    let response = client
        .post(format!("{}/events", BASE_URL))
        .bearer_auth(&user)
        .json(&json!({
            "title": "Not allowed",
            "start_date": start,
            "end_date": start + ChronoDuration::hours(1),
            "capacity": 10
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore]
async fn test_statistics_summary() {
    let client = Client::new();
    let admin = admin_token(&client).await;

    let response = client
        .get(format!("{}/statistics/summary", BASE_URL))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["users"]["admins"].as_i64().unwrap_or(0) >= 1);
    assert_eq!(
        body["registrations_last_30_days"].as_array().map(|a| a.len()),
        Some(30)
    );
}
