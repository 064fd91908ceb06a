// Copyright (C) 2025 Tidelab Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Transport behavior of the client: headers, credential, and retries.

use serde_json::json;
use tidelab::{ClientConfig, Error, Tidelab};
use wiremock::matchers::{basic_auth, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_against(server: &MockServer) -> Tidelab {
    Tidelab::new(ClientConfig::new(server.uri(), "token")).unwrap()
}

#[tokio::test]
async fn every_request_carries_the_common_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/custom_metadata"))
        .and(header("content-type", "application/json"))
        .and(header("min-server-version", "3.6.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = client_against(&server);
    client.custom_metadata.get().await.unwrap();
}

#[tokio::test]
async fn the_token_is_sent_as_the_basic_auth_user() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/custom_metadata"))
        .and(basic_auth("secret-token", ""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = Tidelab::new(ClientConfig::new(server.uri(), "secret-token")).unwrap();
    client.custom_metadata.get().await.unwrap();
}

#[tokio::test]
async fn agent_id_header_is_sent_when_configured() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/custom_metadata"))
        .and(header("agent-id", "agent-7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let config = ClientConfig::new(server.uri(), "token").with_agent_id("agent-7");
    let client = Tidelab::new(config).unwrap();
    client.custom_metadata.get().await.unwrap();
}

#[tokio::test]
async fn agent_id_header_is_absent_by_default() {
    let server = MockServer::start().await;
    // Reject any request that carries the header; mount order decides.
    Mock::given(method("GET"))
        .and(path("/api/v1/custom_metadata"))
        .and(header_exists("agent-id"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/custom_metadata"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = client_against(&server);
    client.custom_metadata.get().await.unwrap();
}

#[tokio::test]
async fn domain_with_trailing_slash_is_accepted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/custom_metadata"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let config = ClientConfig::new(format!("{}/", server.uri()), "token");
    let client = Tidelab::new(config).unwrap();
    client.custom_metadata.get().await.unwrap();
}

#[tokio::test]
async fn error_statuses_are_never_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/custom_metadata"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::new(server.uri(), "token").with_retries(3);
    let client = Tidelab::new(config).unwrap();
    let err = client.custom_metadata.get().await.unwrap_err();

    assert!(matches!(err, Error::InternalServerError(_)));
    // The mock's expect(1) verifies on drop that no retry happened.
}

#[tokio::test]
async fn exhausted_connect_retries_surface_the_transport_error() {
    // Nothing listens on this port, so every attempt fails to connect.
    let config = ClientConfig::new("http://127.0.0.1:9", "token").with_retries(2);
    let client = Tidelab::new(config).unwrap();

    let err = client.custom_metadata.get().await.unwrap_err();
    match err {
        Error::Http(err) => assert!(err.is_connect()),
        other => panic!("expected a transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn invalid_agent_id_fails_at_construction() {
    let config = ClientConfig::new("https://acme.tidelab.com", "token").with_agent_id("bad\nvalue");
    let err = Tidelab::new(config).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
}
