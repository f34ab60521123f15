//! API integration tests.
//!
//! These run against a live server with a migrated database seeded by
//! `fixtures/seed.sql` (one organization at 22% tax, a member and a
//! non-member user, and the "Center Court" field: 25/h off-peak, 35/h peak
//! 17:00-21:00, 10% member discount, open 08:00-22:00, 24h cancellation
//! window, 14-day advance window).

use chrono::{Duration, Utc};
use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

// IDs from fixtures/seed.sql
const FIELD_ID: &str = "11111111-1111-1111-1111-111111111111";
const MEMBER_ID: &str = "22222222-2222-2222-2222-222222222222";
const NON_MEMBER_ID: &str = "33333333-3333-3333-3333-333333333333";

/// Next Monday 10:00 UTC, comfortably inside the advance window
fn future_slot(hour: u32) -> (String, String) {
    let start = (Utc::now() + Duration::days(3))
        .date_naive()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
        .and_utc();
    let end = start + Duration::hours(1);
    (start.to_rfc3339(), end.to_rfc3339())
}

async fn create_booking(client: &Client, user_id: &str, start: &str, end: &str) -> reqwest::Response {
    client
        .post(format!("{}/bookings", BASE_URL))
        .json(&json!({
            "field_id": FIELD_ID,
            "user_id": user_id,
            "start_time": start,
            "end_time": end
        }))
        .send()
        .await
        .expect("Failed to send request")
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
async fn test_availability_grid() {
    let client = Client::new();
    let date = (Utc::now() + Duration::days(3)).date_naive();

    let response = client
        .get(format!(
            "{}/fields/{}/availability?date={}&duration=60",
            BASE_URL, FIELD_ID, date
        ))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    // 08:00-22:00 at 60 minutes
    assert_eq!(body["slots"].as_array().expect("slots array").len(), 14);
}

#[tokio::test]
#[ignore]
async fn test_quote_non_member() {
    let client = Client::new();
    let (start, end) = future_slot(10);

    let response = client
        .post(format!("{}/fields/{}/quote", BASE_URL, FIELD_ID))
        .json(&json!({
            "user_id": NON_MEMBER_ID,
            "start_time": start,
            "end_time": end
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["base_price"], "25.00");
    assert_eq!(body["discount_amount"], "0.00");
    assert_eq!(body["tax_amount"], "5.50");
    assert_eq!(body["total_amount"], "30.50");
}

#[tokio::test]
#[ignore]
async fn test_create_fetch_roundtrip() {
    let client = Client::new();
    let (start, end) = future_slot(8);

    let response = create_booking(&client, NON_MEMBER_ID, &start, &end).await;
    assert_eq!(response.status(), 201);

    let created: Value = response.json().await.expect("Failed to parse response");
    let id = created["id"].as_str().expect("No booking ID");
    assert_eq!(created["status"], "PENDING");

    let response = client
        .get(format!("{}/bookings/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let fetched: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(fetched["id"], created["id"]);
    assert_eq!(fetched["start_time"], created["start_time"]);
    assert_eq!(fetched["end_time"], created["end_time"]);
    assert_eq!(fetched["total_amount"], created["total_amount"]);

    // Cleanup
    let _ = client
        .post(format!("{}/bookings/{}/cancel", BASE_URL, id))
        .json(&json!({ "cancelled_by": NON_MEMBER_ID }))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_contested_slot_one_winner() {
    let client = Client::new();
    let (start, end) = future_slot(9);

    let (a, b) = tokio::join!(
        create_booking(&client, NON_MEMBER_ID, &start, &end),
        create_booking(&client, MEMBER_ID, &start, &end),
    );

    let statuses = [a.status().as_u16(), b.status().as_u16()];
    assert!(
        statuses.contains(&201) && statuses.contains(&409),
        "expected one 201 and one 409, got {:?}",
        statuses
    );

    // The loser learns who holds the slot
    let (winner, loser) = if statuses[0] == 201 { (a, b) } else { (b, a) };
    let conflict: Value = loser.json().await.expect("Failed to parse response");
    assert!(conflict["conflicts"].as_array().map_or(false, |c| !c.is_empty()));

    // Cleanup
    let won: Value = winner.json().await.expect("Failed to parse response");
    let _ = client
        .post(format!("{}/bookings/{}/cancel", BASE_URL, won["id"].as_str().unwrap()))
        .json(&json!({ "cancelled_by": NON_MEMBER_ID }))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_double_cancel_rejected() {
    let client = Client::new();
    let (start, end) = future_slot(11);

    let response = create_booking(&client, NON_MEMBER_ID, &start, &end).await;
    assert_eq!(response.status(), 201);
    let created: Value = response.json().await.expect("Failed to parse response");
    let id = created["id"].as_str().expect("No booking ID");

    let response = client
        .post(format!("{}/bookings/{}/cancel", BASE_URL, id))
        .json(&json!({ "cancelled_by": NON_MEMBER_ID, "reason": "rain" }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    // 72h out with a 24h window: full refund
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["refund_amount"], body["booking"]["total_amount"]);

    let response = client
        .post(format!("{}/bookings/{}/cancel", BASE_URL, id))
        .json(&json!({ "cancelled_by": NON_MEMBER_ID }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_confirm_then_confirm_again() {
    let client = Client::new();
    let (start, end) = future_slot(12);

    let response = create_booking(&client, NON_MEMBER_ID, &start, &end).await;
    assert_eq!(response.status(), 201);
    let created: Value = response.json().await.expect("Failed to parse response");
    let id = created["id"].as_str().expect("No booking ID");

    let response = client
        .post(format!("{}/bookings/{}/confirm", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "CONFIRMED");

    // A second confirm is caller misuse
    let response = client
        .post(format!("{}/bookings/{}/confirm", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 422);

    // Cleanup
    let _ = client
        .post(format!("{}/bookings/{}/cancel", BASE_URL, id))
        .json(&json!({ "cancelled_by": NON_MEMBER_ID }))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_past_booking_rejected() {
    let client = Client::new();
    let start = (Utc::now() - Duration::days(1)).to_rfc3339();
    let end = (Utc::now() - Duration::days(1) + Duration::hours(1)).to_rfc3339();

    let response = create_booking(&client, NON_MEMBER_ID, &start, &end).await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_unknown_request_field_rejected() {
    let client = Client::new();
    let (start, end) = future_slot(13);

    let response = client
        .post(format!("{}/bookings", BASE_URL))
        .json(&json!({
            "field_id": FIELD_ID,
            "user_id": NON_MEMBER_ID,
            "start_time": start,
            "end_time": end,
            "surprise": true
        }))
        .send()
        .await
        .expect("Failed to send request");

    // deny_unknown_fields keeps malformed payloads out of the engine
    assert_eq!(response.status(), 422);
}
