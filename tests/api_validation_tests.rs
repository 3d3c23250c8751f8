// SPDX-License-Identifier: MIT

//! API input validation tests.
//!
//! These run against an offline mock database: every case here must be
//! rejected before any store call is made.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use http_body_util::BodyExt;
use tower::ServiceExt;

mod common;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

async fn error_code(response: axum::response::Response) -> (StatusCode, String) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, body["error"].as_str().unwrap_or("").to_string())
}

#[tokio::test]
async fn test_create_user_missing_username() {
    let app = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/users")
                .header(header::CONTENT_TYPE, FORM_CONTENT_TYPE)
                .body(Body::from("username="))
                .unwrap(),
        )
        .await
        .unwrap();

    let (status, error) = error_code(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error, "bad_request");
}

#[tokio::test]
async fn test_add_exercise_missing_description() {
    let app = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/users/some-id/exercises")
                .header(header::CONTENT_TYPE, FORM_CONTENT_TYPE)
                .body(Body::from("duration=30"))
                .unwrap(),
        )
        .await
        .unwrap();

    let (status, error) = error_code(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error, "bad_request");
}

#[tokio::test]
async fn test_add_exercise_non_numeric_duration() {
    let app = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/users/some-id/exercises")
                .header(header::CONTENT_TYPE, FORM_CONTENT_TYPE)
                .body(Body::from("description=run&duration=half+an+hour"))
                .unwrap(),
        )
        .await
        .unwrap();

    let (status, _) = error_code(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_add_exercise_malformed_date() {
    let app = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/users/some-id/exercises")
                .header(header::CONTENT_TYPE, FORM_CONTENT_TYPE)
                .body(Body::from("description=run&duration=30&date=01-2024-05"))
                .unwrap(),
        )
        .await
        .unwrap();

    let (status, _) = error_code(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_log_malformed_from_date() {
    let app = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/users/some-id/logs?from=invalid-date")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let (status, _) = error_code(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_log_zero_limit() {
    let app = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/users/some-id/logs?limit=0")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let (status, _) = error_code(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_check() {
    let app = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
