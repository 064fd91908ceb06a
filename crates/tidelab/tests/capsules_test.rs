// Copyright (C) 2025 Tidelab Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Capsule and pipeline operations against a mocked API.

use futures::TryStreamExt;
use serde_json::json;
use tidelab::{
    CapsuleSearchParams, CapsuleSortBy, CapsuleStatus, ClientConfig, DataAssetAttachParams,
    EveryoneRole, Permissions, SortOrder, Tidelab, UserPermissions, UserRole,
};
use wiremock::matchers::{body_json, body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_against(server: &MockServer) -> Tidelab {
    Tidelab::new(ClientConfig::new(server.uri(), "token")).unwrap()
}

fn capsule_body(id: &str, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "created": 1_700_000_000,
        "name": name,
        "status": "non-published",
        "owner": "owner@acme.org",
        "slug": format!("slug-{id}"),
    })
}

#[tokio::test]
async fn get_fetches_a_capsule_by_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/capsules/cap-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "cap-1",
            "created": 1_700_000_000,
            "name": "rna pipeline",
            "status": "published",
            "owner": "owner@acme.org",
            "slug": "rna-pipeline",
            "keywords": ["rna", "genomics"],
        })))
        .mount(&server)
        .await;

    let client = client_against(&server);
    let capsule = client.capsules.get("cap-1").await.unwrap();

    assert_eq!(capsule.id, "cap-1");
    assert_eq!(capsule.status, CapsuleStatus::Published);
    assert_eq!(capsule.created.timestamp(), 1_700_000_000);
    assert_eq!(
        capsule.keywords,
        Some(vec!["rna".to_string(), "genomics".to_string()])
    );
}

#[tokio::test]
async fn pipelines_use_their_own_route_prefix() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/pipelines/pip-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(capsule_body("pip-1", "mapping")))
        .mount(&server)
        .await;

    let client = client_against(&server);
    let pipeline = client.pipelines.get("pip-1").await.unwrap();
    assert_eq!(pipeline.name, "mapping");
}

#[tokio::test]
async fn delete_issues_a_single_delete() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/capsules/cap-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_against(&server);
    client.capsules.delete("cap-1").await.unwrap();
}

#[tokio::test]
async fn archive_toggles_via_query_param() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/v1/capsules/cap-1/archive"))
        .and(query_param("archive", "true"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/v1/pipelines/pip-1/archive"))
        .and(query_param("archive", "false"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = client_against(&server);
    client.capsules.archive("cap-1", true).await.unwrap();
    client.pipelines.archive("pip-1", false).await.unwrap();
}

#[tokio::test]
async fn app_panel_decodes_the_parameter_schema() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/capsules/cap-1/app_panel"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "parameters": [
                {"name": "Iterations", "param_name": "iterations", "value": "10"},
            ],
        })))
        .mount(&server)
        .await;

    let client = client_against(&server);
    let panel = client.capsules.app_panel("cap-1").await.unwrap();

    let parameters = panel.parameters.unwrap();
    assert_eq!(parameters.len(), 1);
    assert_eq!(parameters[0].param_name.as_deref(), Some("iterations"));
}

#[tokio::test]
async fn search_posts_exactly_the_set_params() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/capsules/search"))
        .and(body_json(json!({
            "query": "genomics",
            "sort_field": "name",
            "sort_order": "asc",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "has_more": false,
            "results": [capsule_body("cap-1", "alpha"), capsule_body("cap-2", "beta")],
        })))
        .mount(&server)
        .await;

    let client = client_against(&server);
    let params = CapsuleSearchParams::new()
        .with_query("genomics")
        .with_sort(CapsuleSortBy::Name, SortOrder::Ascending);
    let page = client.capsules.search(params).await.unwrap();

    assert!(!page.has_more);
    assert_eq!(page.results.len(), 2);
    assert_eq!(page.results[1].name, "beta");
}

#[tokio::test]
async fn repeating_a_search_returns_the_same_page() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/capsules/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "has_more": true,
            "next_token": "t-2",
            "results": [capsule_body("cap-1", "alpha")],
        })))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_against(&server);
    let params = CapsuleSearchParams::new().with_query("genomics");
    let first = client.capsules.search(params.clone()).await.unwrap();
    let second = client.capsules.search(params).await.unwrap();

    assert_eq!(first.has_more, second.has_more);
    assert_eq!(first.next_token, second.next_token);
    assert_eq!(first.results[0].id, second.results[0].id);
}

#[tokio::test]
async fn search_iter_follows_the_cursor_across_pages() {
    let server = MockServer::start().await;
    // The cursor-bearing follow-up request; mounted first so it wins when
    // the token is present.
    Mock::given(method("POST"))
        .and(path("/api/v1/capsules/search"))
        .and(body_partial_json(json!({"next_token": "t-2"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "has_more": false,
            "results": [capsule_body("cap-3", "gamma")],
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/capsules/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "has_more": true,
            "next_token": "t-2",
            "results": [capsule_body("cap-1", "alpha"), capsule_body("cap-2", "beta")],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_against(&server);
    let names: Vec<String> = client
        .capsules
        .search_iter(CapsuleSearchParams::new().with_query("genomics"))
        .map_ok(|capsule| capsule.name)
        .try_collect()
        .await
        .unwrap();

    assert_eq!(names, vec!["alpha", "beta", "gamma"]);
}

#[tokio::test]
async fn list_computations_returns_the_runs() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/capsules/cap-1/computations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": "comp-1",
                "created": 1_700_000_100,
                "name": "Run 1",
                "run_time": 60,
                "state": "completed",
                "end_status": "succeeded",
            },
        ])))
        .mount(&server)
        .await;

    let client = client_against(&server);
    let computations = client.capsules.list_computations("cap-1").await.unwrap();

    assert_eq!(computations.len(), 1);
    assert_eq!(computations[0].id, "comp-1");
}

#[tokio::test]
async fn attach_data_assets_posts_the_attachment_list() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/capsules/cap-1/data_assets"))
        .and(body_json(json!([
            {"id": "da-1", "mount": "reference"},
            {"id": "da-2"},
        ])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "da-1", "mount_state": "installed", "ready": true},
            {"id": "da-2", "mount_state": "installing", "ready": false},
        ])))
        .mount(&server)
        .await;

    let client = client_against(&server);
    let results = client
        .capsules
        .attach_data_assets(
            "cap-1",
            &[
                DataAssetAttachParams::new("da-1").with_mount("reference"),
                DataAssetAttachParams::new("da-2"),
            ],
        )
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].ready, Some(true));
}

#[tokio::test]
async fn detach_data_assets_uses_the_trailing_slash_route() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/capsules/cap-1/data_assets/"))
        .and(body_json(json!(["da-1", "da-2"])))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = client_against(&server);
    client
        .capsules
        .detach_data_assets("cap-1", &["da-1".to_string(), "da-2".to_string()])
        .await
        .unwrap();
}

#[tokio::test]
async fn update_permissions_posts_the_permission_set() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/capsules/cap-1/permissions"))
        .and(body_json(json!({
            "users": [{"email": "reviewer@acme.org", "role": "viewer"}],
            "everyone": "none",
        })))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = client_against(&server);
    let permissions = Permissions {
        users: Some(vec![UserPermissions {
            email: "reviewer@acme.org".to_string(),
            role: UserRole::Viewer,
        }]),
        everyone: Some(EveryoneRole::None),
        ..Default::default()
    };
    client
        .capsules
        .update_permissions("cap-1", permissions)
        .await
        .unwrap();
}
