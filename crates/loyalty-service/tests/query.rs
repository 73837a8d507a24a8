//! Query endpoint integration tests.

mod common;

use axum::http::StatusCode;
use common::{error_code, registration, TestHarness};
use serde_json::json;

#[tokio::test]
async fn get_points_after_registration() {
    let harness = TestHarness::new();
    harness.register("U1", "100").await;

    let first = harness.query("getPoints", &["U1"]).await;
    first.assert_status_ok();
    first.assert_text("100");

    harness.query("getPoints", &["U1"]).await.assert_text("100");
}

#[tokio::test]
async fn get_user_returns_stored_json() {
    let harness = TestHarness::new();
    harness.register("U1", "100").await;

    let response = harness.query("getUser", &["U1"]).await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["ffid"], "U1");
    assert_eq!(body["DOB"], "1815-12-10");
    assert_eq!(body["createdby"], "admin");
    assert_eq!(body["totalPoints"], "100");
}

#[tokio::test]
async fn get_user_without_args_fails() {
    let harness = TestHarness::new();

    let response = harness.query("getUser", &[]).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&response), "invalid_argument_count");
}

#[tokio::test]
async fn get_user_details_unknown_is_not_found() {
    let harness = TestHarness::new();

    let response = harness.query("GetUserDetails", &["nobody"]).await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn get_user_details_reads_the_table() {
    let harness = TestHarness::new();
    harness
        .invoke("RegisterUserDetails", &registration("U7", "70"))
        .await
        .assert_status_ok();

    let response = harness.query("GetUserDetails", &["U7"]).await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["city"], "London");
    assert_eq!(body["country"], "UK");
    assert_eq!(body["totalPoints"], "70");

    // The table registration does not create a blob.
    harness
        .query("getPoints", &["U7"])
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn get_user_count_tracks_table_registrations() {
    let harness = TestHarness::new();

    let response = harness.query("GetUserCount", &[]).await;
    response.assert_status_ok();
    response.assert_json(&json!({ "count": 0 }));

    for ffid in ["A", "B", "C"] {
        harness
            .invoke("RegisterUserDetails", &registration(ffid, "1"))
            .await
            .assert_status_ok();
    }
    harness.register("D", "1").await;

    harness
        .query("GetUserCount", &[])
        .await
        .assert_json(&json!({ "count": 3 }));
}

#[tokio::test]
async fn unknown_query_function_is_rejected() {
    let harness = TestHarness::new();

    let response = harness.query("AddDeletePoints", &["U1", "Add", "1"]).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(
        body["error"]["message"],
        "received unknown function query: AddDeletePoints"
    );
}
