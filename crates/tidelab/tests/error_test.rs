// Copyright (C) 2025 Tidelab Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error classification and payload extraction for failed API responses.

use serde_json::json;
use tidelab::{ClientConfig, Error, Tidelab};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_against(server: &MockServer) -> Tidelab {
    Tidelab::new(ClientConfig::new(server.uri(), "token")).unwrap()
}

async fn mock_capsule_get(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/api/v1/capsules/cap-1"))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn capsule_get_error(response: ResponseTemplate) -> Error {
    let server = MockServer::start().await;
    mock_capsule_get(&server, response).await;
    let client = client_against(&server);
    client.capsules.get("cap-1").await.unwrap_err()
}

#[tokio::test]
async fn status_400_maps_to_bad_request() {
    let err = capsule_get_error(
        ResponseTemplate::new(400).set_body_json(json!({"message": "bad capsule id"})),
    )
    .await;

    assert!(matches!(err, Error::BadRequest(_)));
    assert_eq!(err.status().map(|s| s.as_u16()), Some(400));
}

#[tokio::test]
async fn status_401_maps_to_unauthorized() {
    let err = capsule_get_error(
        ResponseTemplate::new(401).set_body_json(json!({"message": "invalid token"})),
    )
    .await;

    assert!(matches!(err, Error::Unauthorized(_)));
}

#[tokio::test]
async fn status_403_maps_to_forbidden() {
    let err = capsule_get_error(
        ResponseTemplate::new(403).set_body_json(json!({"message": "no access"})),
    )
    .await;

    assert!(matches!(err, Error::Forbidden(_)));
}

#[tokio::test]
async fn status_404_maps_to_not_found() {
    let err = capsule_get_error(
        ResponseTemplate::new(404).set_body_json(json!({"message": "no such capsule"})),
    )
    .await;

    assert!(matches!(err, Error::NotFound(_)));
    assert_eq!(err.api_error().unwrap().message, "no such capsule");
}

#[tokio::test]
async fn every_5xx_maps_to_internal_server_error() {
    for status in [500, 502, 503, 599] {
        let err = capsule_get_error(ResponseTemplate::new(status)).await;
        assert!(
            matches!(err, Error::InternalServerError(_)),
            "status {status} mapped to {err:?}"
        );
    }
}

#[tokio::test]
async fn unmapped_statuses_fall_back_to_api() {
    let err = capsule_get_error(
        ResponseTemplate::new(429).set_body_json(json!({"message": "rate limit exceeded"})),
    )
    .await;

    assert!(matches!(err, Error::Api(_)));
    assert_eq!(err.status().map(|s| s.as_u16()), Some(429));
}

#[tokio::test]
async fn object_body_yields_message_and_whole_payload() {
    let body = json!({
        "message": "Custom error message",
        "datasets": [{"id": "123", "name": "tv"}],
    });
    let err = capsule_get_error(ResponseTemplate::new(400).set_body_json(&body)).await;

    let api = err.api_error().unwrap();
    assert_eq!(api.message, "Custom error message");
    assert_eq!(api.data, Some(body));
}

#[tokio::test]
async fn object_body_without_message_uses_the_fallback() {
    let body = json!({"error": "some other field"});
    let err = capsule_get_error(ResponseTemplate::new(500).set_body_json(&body)).await;

    let api = err.api_error().unwrap();
    assert_eq!(api.message, "An error occurred.");
    assert_eq!(api.data, Some(body));
}

#[tokio::test]
async fn array_body_is_kept_as_data_with_fallback_message() {
    let body = json!([{"field": "error1"}, {"field": "error2"}]);
    let err = capsule_get_error(ResponseTemplate::new(403).set_body_json(&body)).await;

    let api = err.api_error().unwrap();
    assert_eq!(api.message, "An error occurred.");
    assert_eq!(api.items().map(<[_]>::len), Some(2));
}

#[tokio::test]
async fn non_json_body_becomes_the_message() {
    let err = capsule_get_error(ResponseTemplate::new(500).set_body_string("boom")).await;

    assert!(matches!(err, Error::InternalServerError(_)));
    let api = err.api_error().unwrap();
    assert_eq!(api.message, "boom");
    assert_eq!(api.data, None);
}

#[tokio::test]
async fn empty_body_uses_the_fallback_message() {
    let err = capsule_get_error(ResponseTemplate::new(500)).await;

    assert_eq!(err.api_error().unwrap().message, "An error occurred.");
}

#[tokio::test]
async fn display_includes_kind_message_and_status() {
    let err = capsule_get_error(ResponseTemplate::new(404).set_body_string("Page not found")).await;

    assert_eq!(err.to_string(), "not found: Page not found (status 404)");
}

#[test]
fn errors_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Error>();
    assert_send_sync::<tidelab::ApiError>();
}
