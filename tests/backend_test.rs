//! Backend protocol tests against a wiremock server.
//!
//! Verifies the wire contract each flavor speaks: URL shapes, rebuild body
//! presence/absence, private-surface header policy, capability-gated
//! history degradation, and non-2xx propagation.

use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use aggctl::backend::{self, Backend};
use aggctl::core::config::{ConnectionProfile, InstanceKind};
use aggctl::core::Session;
use aggctl::error::AggctlError;

// =============================================================================
// Matchers and Helpers
// =============================================================================

/// Matches requests with an empty body.
struct EmptyBody;

impl wiremock::Match for EmptyBody {
    fn matches(&self, request: &Request) -> bool {
        request.body.is_empty()
    }
}

/// Matches requests that carry no `Content-Type` header at all.
struct NoContentType;

impl wiremock::Match for NoContentType {
    fn matches(&self, request: &Request) -> bool {
        !request.headers.contains_key("content-type")
    }
}

fn installer_profile(server: &MockServer) -> ConnectionProfile {
    let uri = url::Url::parse(&server.uri()).expect("mock uri");
    let port = uri.port().expect("mock port");
    ConnectionProfile {
        instance: InstanceKind::Installer,
        host: server.uri(),
        organization: Some("acme".to_string()),
        username: Some("admin".to_string()),
        password: Some("hunter2".to_string()),
        token: None,
        client_id: None,
        client_secret: None,
        verify_tls: false,
        auth_port: port,
        engine_port: port,
    }
}

fn container_profile(server: &MockServer, with_oidc: bool) -> ConnectionProfile {
    ConnectionProfile {
        instance: InstanceKind::Container,
        host: server.uri(),
        organization: None,
        username: with_oidc.then(|| "admin".to_string()),
        password: with_oidc.then(|| "hunter2".to_string()),
        token: Some("static-token".to_string()),
        client_id: with_oidc.then(|| "aggctl-client".to_string()),
        client_secret: with_oidc.then(|| "s3cret".to_string()),
        verify_tls: false,
        auth_port: 10500,
        engine_port: 10502,
    }
}

async fn mount_installer_auth(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/acme/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_string("jwt-token"))
        .mount(server)
        .await;
}

async fn mount_oidc(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/auth/realms/atscale/protocol/openid-connect/token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "private-jwt"})),
        )
        .mount(server)
        .await;
}

fn installer_backend(server: &MockServer) -> (Box<dyn Backend>, Session) {
    let profile = installer_profile(server);
    let backend = backend::for_profile(&profile).unwrap();
    let session = Session::new(profile).unwrap();
    (backend, session)
}

fn container_backend(server: &MockServer, with_oidc: bool) -> (Box<dyn Backend>, Session) {
    let profile = container_profile(server, with_oidc);
    let backend = backend::for_profile(&profile).unwrap();
    let session = Session::new(profile).unwrap();
    (backend, session)
}

// =============================================================================
// Rebuild Body Policy
// =============================================================================

#[tokio::test]
async fn installer_rebuild_posts_without_a_body() {
    let server = MockServer::start().await;
    mount_installer_auth(&server).await;

    Mock::given(method("POST"))
        .and(path("/aggregate-batch/orgId/acme/projectId/p1"))
        .and(query_param("cubeId", "c1"))
        .and(query_param("isFullBuild", "true"))
        .and(EmptyBody)
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "queued"})))
        .expect(1)
        .mount(&server)
        .await;

    let (backend, session) = installer_backend(&server);
    let ack = backend.rebuild(&session, "p1", "c1", true).await.unwrap();
    assert_eq!(ack["status"], "queued");
}

#[tokio::test]
async fn container_rebuild_posts_grace_period_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/aggregates-batch/catalogs/cat-1/models/mod-1"))
        .and(query_param("isFullBuild", "false"))
        .and(body_json(json!({"gracePeriodOverrides": {}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"accepted": true})))
        .expect(1)
        .mount(&server)
        .await;

    let (backend, session) = container_backend(&server, false);
    let ack = backend
        .rebuild(&session, "cat-1", "mod-1", false)
        .await
        .unwrap();
    assert_eq!(ack["accepted"], true);
}

// =============================================================================
// Build History
// =============================================================================

#[tokio::test]
async fn history_without_private_access_degrades_to_empty() {
    let server = MockServer::start().await;
    // No mocks: the degraded path must not touch the network.

    let (backend, session) = container_backend(&server, false);
    let envelope = backend
        .build_history(&session, "cat-1", "mod-1", 20)
        .await
        .unwrap();

    assert!(envelope.data.is_empty());
    assert_eq!(envelope.total, 0);
    assert_eq!(envelope.limit, 20);
}

#[tokio::test]
async fn private_history_get_sends_authorization_only() {
    let server = MockServer::start().await;
    mount_oidc(&server).await;

    Mock::given(method("GET"))
        .and(path("/wapi/p/aggregate/batch-history"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "20"))
        .and(query_param("catalogId", "cat-1"))
        .and(query_param("modelId", "mod-1"))
        .and(NoContentType)
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{
                "id": "batch-1",
                "status": "done",
                "isFullBuild": true,
                "startTime": "2026-08-01T10:00:00Z",
                "endTime": "2026-08-01T10:00:12Z",
                "estimateTime": 1500,
                "sumOfInstanceBuildTimes": "PT12S"
            }],
            "total": 1,
            "limit": 20,
            "offset": 0
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (backend, session) = container_backend(&server, true);
    let envelope = backend
        .build_history(&session, "cat-1", "mod-1", 20)
        .await
        .unwrap();

    assert_eq!(envelope.total, 1);
    let batch = &envelope.data[0];
    assert_eq!(batch.id, "batch-1");
    assert!(batch.is_full_build);
    assert_eq!(batch.estimate_time, 1500);
}

#[tokio::test]
async fn installer_history_unwraps_the_response_envelope() {
    let server = MockServer::start().await;
    mount_installer_auth(&server).await;

    Mock::given(method("GET"))
        .and(path("/aggregate-batch/orgId/acme/history"))
        .and(query_param("limit", "20"))
        .and(query_param("projectId", "p1"))
        .and(query_param("cubeId", "c1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": {
                "data": [{"id": "batch-2", "status": "failed", "batchType": "manual"}],
                "total": 1
            }
        })))
        .mount(&server)
        .await;

    let (backend, session) = installer_backend(&server);
    let envelope = backend
        .build_history(&session, "p1", "c1", 20)
        .await
        .unwrap();

    assert_eq!(envelope.total, 1);
    assert_eq!(envelope.data[0].status, "failed");
    assert_eq!(envelope.data[0].batch_type, "manual");
}

// =============================================================================
// Normalization
// =============================================================================

#[tokio::test]
async fn container_catalogs_normalize_to_projects() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/catalogs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "cat-1",
            "name": "Sales",
            "models": [{"id": "mod-1", "name": "Orders", "caption": "Orders Model"}]
        }])))
        .mount(&server)
        .await;

    let (backend, session) = container_backend(&server, false);
    let projects = backend.list_projects(&session).await.unwrap();

    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].name, "Sales");
    assert_eq!(projects[0].cubes[0].id, "mod-1");
    assert_eq!(projects[0].cubes[0].caption, "Orders Model");
}

#[tokio::test]
async fn container_instances_normalize_end_to_end() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/aggregates/instances"))
        .and(query_param("catalogId", "cat-1"))
        .and(query_param("modelId", "mod-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{
                "id": "inst-7",
                "definitionId": "def-42",
                "status": "active",
                "tableName": "agg_t7",
                "buildQueryId": "bq-99",
                "stats": {"buildDuration": 12000, "numberOfRows": 48213}
            }]
        })))
        .mount(&server)
        .await;

    let (backend, session) = container_backend(&server, false);
    let envelope = backend
        .list_aggregates(&session, "cat-1", "mod-1", 200)
        .await
        .unwrap();

    assert_eq!(envelope.total, 1);
    assert_eq!(envelope.limit, 200);
    let record = &envelope.data[0];
    assert_eq!(record.id, "def-42");
    assert_eq!(record.project_id, "cat-1");
    assert_eq!(record.latest_instance.table_name, "agg_t7");
    assert_eq!(record.latest_instance.stats.number_of_rows, 48_213);
    assert_eq!(record.active_instance, record.latest_instance);
}

#[tokio::test]
async fn installer_aggregates_pass_through_unchanged() {
    let server = MockServer::start().await;
    mount_installer_auth(&server).await;

    Mock::given(method("GET"))
        .and(path("/aggregates/orgId/acme"))
        .and(query_param("limit", "200"))
        .and(query_param("projectId", "p1"))
        .and(query_param("cubeId", "c1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": {
                "data": [{
                    "id": "agg-1",
                    "name": "orders_by_region",
                    "type": "user_defined",
                    "latest_instance": {
                        "status": "active",
                        "stats": {"build_duration": 850, "number_of_rows": 120000}
                    }
                }],
                "total": 7,
                "limit": 200,
                "offset": 0
            }
        })))
        .mount(&server)
        .await;

    let (backend, session) = installer_backend(&server);
    let envelope = backend
        .list_aggregates(&session, "p1", "c1", 200)
        .await
        .unwrap();

    // Pagination fields come from the server, not from the request.
    assert_eq!(envelope.total, 7);
    let record = &envelope.data[0];
    assert_eq!(record.kind, "user_defined");
    assert_eq!(record.latest_instance.stats.build_duration, 850);
}

// =============================================================================
// Error Propagation
// =============================================================================

#[tokio::test]
async fn non_2xx_surfaces_status_and_body_snippet() {
    let server = MockServer::start().await;
    mount_installer_auth(&server).await;

    Mock::given(method("GET"))
        .and(path("/aggregates/orgId/acme"))
        .respond_with(ResponseTemplate::new(503).set_body_string("engine draining"))
        .mount(&server)
        .await;

    let (backend, session) = installer_backend(&server);
    let err = backend
        .list_aggregates(&session, "p1", "c1", 200)
        .await
        .unwrap_err();

    match err {
        AggctlError::RequestStatus { status, body, url } => {
            assert_eq!(status, 503);
            assert!(body.contains("engine draining"));
            assert!(url.contains("/aggregates/orgId/acme"));
        }
        other => panic!("expected RequestStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn deadline_expiry_classifies_as_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200).set_delay(std::time::Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    // A shortened client deadline stands in for the fixed timeout classes.
    let deadline = std::time::Duration::from_millis(100);
    let client = aggctl::core::http::build_client(deadline, false).unwrap();
    let url = format!("{}/slow", server.uri());

    let err = client.get(&url).send().await.unwrap_err();
    let classified = aggctl::core::http::classify_transport(&err, &url, deadline);
    assert!(matches!(classified, AggctlError::Timeout { .. }));
}

#[tokio::test]
async fn malformed_json_is_a_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/catalogs"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let (backend, session) = container_backend(&server, false);
    let err = backend.list_projects(&session).await.unwrap_err();
    assert!(matches!(err, AggctlError::RequestTransport { .. }));
}
