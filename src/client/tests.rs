//! Tests for the resource clients

use super::*;
use crate::auth::{AuthTokenProvider, StaticTokenSource};
use crate::error::Error;
use crate::http::{ExecutorConfig, RequestExecutor};
use crate::transform::TokenEfficiencyOptions;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api(server: &MockServer) -> ApiClient {
    let config = ExecutorConfig::builder()
        .base_url(server.uri())
        .timeout(Duration::from_secs(5))
        .build();
    let auth = AuthTokenProvider::new(StaticTokenSource::new("test-token"));
    ApiClient::new(RequestExecutor::new(config, auth).unwrap())
}

fn projects_body() -> serde_json::Value {
    json!([
        {"id": "prj_alpha", "number": 1, "name": "Alpha", "region": "eu"},
        {"id": "prj_beta", "number": 2, "name": "Beta"}
    ])
}

async fn mount_projects(server: &MockServer, body: serde_json::Value, expected: u64) {
    Mock::given(method("GET"))
        .and(path("/v1/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(expected)
        .mount(server)
        .await;
}

// ============================================================================
// ApiClient
// ============================================================================

#[tokio::test]
async fn test_api_client_applies_token_efficiency() {
    let server = MockServer::start().await;
    mount_projects(&server, projects_body(), 3).await;
    let api = api(&server);

    let counted = api
        .get("/v1/projects", &TokenEfficiencyOptions::new().count().into())
        .await
        .unwrap();
    assert_eq!(counted, json!({"count": 2}));

    let projected = api
        .get(
            "/v1/projects",
            &TokenEfficiencyOptions::new().fields("id").limit(1).into(),
        )
        .await
        .unwrap();
    assert_eq!(projected, json!([{"id": "prj_alpha"}]));

    let raw = api.get("/v1/projects", &CallOptions::new()).await.unwrap();
    assert_eq!(raw, projects_body());
}

#[test]
fn test_require_id() {
    assert_eq!(require_id("pipeline", "  pl_1 ").unwrap(), "pl_1");
    assert!(matches!(
        require_id("pipeline", " "),
        Err(Error::Validation { .. })
    ));
    assert_eq!(require_id("pipeline", "a/b").unwrap(), "a%2Fb");
    assert_eq!(require_id("pipeline", "pl 1?x=1#y").unwrap(), "pl%201%3Fx=1%23y");
}

// ============================================================================
// Projects
// ============================================================================

#[tokio::test]
async fn test_resolve_numeric_id_uses_cache() {
    let server = MockServer::start().await;
    mount_projects(&server, projects_body(), 1).await;
    let projects = ProjectsClient::new(api(&server), Duration::from_secs(60));

    assert_eq!(projects.resolve_id("2").await.unwrap(), "prj_beta");
    assert_eq!(projects.resolve_id("1").await.unwrap(), "prj_alpha");
    assert!(projects.cache().has(PROJECTS_CACHE_KEY).await);
}

#[tokio::test]
async fn test_resolve_internal_id_skips_lookup() {
    let server = MockServer::start().await;
    mount_projects(&server, projects_body(), 0).await;
    let projects = ProjectsClient::new(api(&server), Duration::from_secs(60));

    assert_eq!(projects.resolve_id("prj_gamma").await.unwrap(), "prj_gamma");
}

#[tokio::test]
async fn test_resolve_unknown_number() {
    let server = MockServer::start().await;
    mount_projects(&server, projects_body(), 1).await;
    let projects = ProjectsClient::new(api(&server), Duration::from_secs(60));

    let err = projects.resolve_id("99").await.unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
    assert!(err.hint().is_some());
}

#[tokio::test]
async fn test_resolve_requires_reference() {
    let server = MockServer::start().await;
    mount_projects(&server, projects_body(), 0).await;
    let projects = ProjectsClient::new(api(&server), Duration::from_secs(60));

    let err = projects.resolve_id("").await.unwrap_err();
    assert_eq!(err.to_string(), "Validation error: a project id is required");
}

#[tokio::test]
async fn test_project_list_envelope() {
    let server = MockServer::start().await;
    mount_projects(&server, json!({"projects": projects_body()}), 1).await;
    let projects = ProjectsClient::new(api(&server), Duration::from_secs(60));

    let list = projects.list_projects().await.unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].name.as_deref(), Some("Alpha"));
    assert_eq!(list[0].extra.get("region"), Some(&json!("eu")));
}

#[tokio::test]
async fn test_invalidate_cache_refetches() {
    let server = MockServer::start().await;
    mount_projects(&server, projects_body(), 2).await;
    let projects = ProjectsClient::new(api(&server), Duration::from_secs(60));

    projects.resolve_id("1").await.unwrap();
    projects.invalidate_cache().await;
    projects.resolve_id("1").await.unwrap();
}

#[tokio::test]
async fn test_expired_project_list_refetches() {
    let server = MockServer::start().await;
    mount_projects(&server, projects_body(), 2).await;
    let projects = ProjectsClient::new(api(&server), Duration::from_millis(20));

    projects.resolve_id("1").await.unwrap();
    tokio::time::sleep(Duration::from_millis(30)).await;
    projects.resolve_id("1").await.unwrap();
}

#[tokio::test]
async fn test_get_project_by_number() {
    let server = MockServer::start().await;
    mount_projects(&server, projects_body(), 1).await;
    Mock::given(method("GET"))
        .and(path("/v1/projects/prj_alpha"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "prj_alpha"})))
        .expect(1)
        .mount(&server)
        .await;

    let projects = ProjectsClient::new(api(&server), Duration::from_secs(60));
    let body = projects.get("1", &CallOptions::new()).await.unwrap();
    assert_eq!(body["id"], "prj_alpha");
}

// ============================================================================
// Pipelines / connectors / automations
// ============================================================================

#[tokio::test]
async fn test_pipelines_list_resolves_project() {
    let server = MockServer::start().await;
    mount_projects(&server, projects_body(), 1).await;
    Mock::given(method("GET"))
        .and(path("/v1/projects/prj_beta/pipelines"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "pl_1", "name": "nightly", "schedule": "0 2 * * *"},
            {"id": "pl_2", "name": "hourly", "schedule": "0 * * * *"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let api = api(&server);
    let projects = ProjectsClient::new(api.clone(), Duration::from_secs(60));
    let pipelines = PipelinesClient::new(api, projects);

    let body = pipelines
        .list("2", &TokenEfficiencyOptions::new().fields("name").into())
        .await
        .unwrap();
    assert_eq!(body, json!([{"name": "nightly"}, {"name": "hourly"}]));
}

#[tokio::test]
async fn test_pipeline_run_and_missing_pipeline() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/projects/prj_a/pipelines/pl_1/run"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({"run_id": "r_1"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/projects/prj_a/pipelines/pl_404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "no such pipeline"})))
        .mount(&server)
        .await;

    let api = api(&server);
    let pipelines = PipelinesClient::new(api.clone(), ProjectsClient::new(api, Duration::from_secs(60)));

    let run = pipelines.run("prj_a", "pl_1", &CallOptions::new()).await.unwrap();
    assert_eq!(run["run_id"], "r_1");

    let err = pipelines
        .get("prj_a", "pl_404", &CallOptions::new())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert!(err.hint().unwrap().contains("list resources"));
}

#[tokio::test]
async fn test_pipeline_validation_happens_before_request() {
    let server = MockServer::start().await;
    let api = api(&server);
    let pipelines = PipelinesClient::new(api.clone(), ProjectsClient::new(api, Duration::from_secs(60)));

    let err = pipelines
        .create("prj_a", json!(["not", "an", "object"]), &CallOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));

    let err = pipelines
        .delete("prj_a", "", &CallOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_connector_create_requires_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/projects/prj_a/connectors"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "cn_1"})))
        .expect(1)
        .mount(&server)
        .await;

    let api = api(&server);
    let connectors =
        ConnectorsClient::new(api.clone(), ProjectsClient::new(api, Duration::from_secs(60)));

    let err = connectors
        .create("prj_a", json!({"name": "pg"}), &CallOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));

    let created = connectors
        .create("prj_a", json!({"name": "pg", "type": "postgres"}), &CallOptions::new())
        .await
        .unwrap();
    assert_eq!(created["id"], "cn_1");
}

#[tokio::test]
async fn test_automation_enable_disable() {
    let server = MockServer::start().await;
    for action in ["enable", "disable"] {
        Mock::given(method("POST"))
            .and(path(format!("/v1/projects/prj_a/automations/au_1/{action}")))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"enabled": action == "enable"})),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let api = api(&server);
    let automations =
        AutomationsClient::new(api.clone(), ProjectsClient::new(api, Duration::from_secs(60)));

    let on = automations.enable("prj_a", "au_1", &CallOptions::new()).await.unwrap();
    assert_eq!(on, json!({"enabled": true}));
    let off = automations.disable("prj_a", "au_1", &CallOptions::new()).await.unwrap();
    assert_eq!(off, json!({"enabled": false}));
}

#[tokio::test]
async fn test_ids_stay_inside_their_path_segment() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/projects/prj_a/pipelines/pl_1%3Fx=1"))
        .and(query_param_is_missing("x"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"deleted": "pl_1?x=1"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/projects/prj_a/pipelines/pl_1%23frag"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "pl_1#frag"})))
        .expect(1)
        .mount(&server)
        .await;

    let api = api(&server);
    let pipelines = PipelinesClient::new(api.clone(), ProjectsClient::new(api, Duration::from_secs(60)));

    let deleted = pipelines
        .delete("prj_a", "pl_1?x=1", &CallOptions::new())
        .await
        .unwrap();
    assert_eq!(deleted["deleted"], "pl_1?x=1");

    let fetched = pipelines
        .get("prj_a", "pl_1#frag", &CallOptions::new())
        .await
        .unwrap();
    assert_eq!(fetched["id"], "pl_1#frag");
}
