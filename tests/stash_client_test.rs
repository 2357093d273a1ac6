//! Stash GraphQL client tests against a mock server.

use serde_json::json;
use stashnfo::config::StashConfig;
use stashnfo::stash::StashClient;
use stashnfo_common::{Error, ErrorCategory, RecordKind};
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> StashConfig {
    let addr = server.address();
    StashConfig {
        host: addr.ip().to_string(),
        port: addr.port(),
        timeout_secs: 5,
        ..Default::default()
    }
}

fn graphql(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "data": data }))
}

#[tokio::test]
async fn test_connection_returns_version() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("version { version }"))
        .respond_with(graphql(json!({ "version": { "version": "v0.27.2" } })))
        .expect(1)
        .mount(&server)
        .await;

    let client = StashClient::new(&config_for(&server));
    assert_eq!(client.test_connection().await.unwrap(), "v0.27.2");
}

#[tokio::test]
async fn fetch_scene_by_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(header("ApiKey", "secret"))
        .and(body_string_contains("findScene(id: $id)"))
        .and(body_partial_json(json!({ "variables": { "id": "42" } })))
        .respond_with(graphql(json!({
            "findScene": { "id": "42", "title": "Harbour", "rating100": 60 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.api_key = Some("secret".into());
    let client = StashClient::new(&config);

    let record = client.fetch_by_id(RecordKind::Scene, "42").await.unwrap();
    assert_eq!(record["title"], "Harbour");
    assert_eq!(record["rating100"], 60);
}

#[tokio::test]
async fn fetch_uses_kind_specific_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("findGallery(id: $id)"))
        .respond_with(graphql(json!({
            "findGallery": { "id": "5", "title": "Stills", "folder": { "path": "/g" } }
        })))
        .mount(&server)
        .await;

    let client = StashClient::new(&config_for(&server));
    let record = client.fetch_by_id(RecordKind::Gallery, "5").await.unwrap();
    assert_eq!(record["folder"]["path"], "/g");
}

#[tokio::test]
async fn fetch_missing_record_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(graphql(json!({ "findPerformer": null })))
        .mount(&server)
        .await;

    let client = StashClient::new(&config_for(&server));
    let err = client
        .fetch_by_id(RecordKind::Performer, "404")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(ref msg) if msg == "performer 404"));
    assert_eq!(err.category(), ErrorCategory::Network);
}

#[tokio::test]
async fn search_sends_filter_and_returns_matches() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("findPerformers(filter: $filter)"))
        .and(body_partial_json(json!({
            "variables": { "filter": { "q": "alice", "per_page": 3 } }
        })))
        .respond_with(graphql(json!({
            "findPerformers": {
                "count": 2,
                "performers": [{ "id": "1", "name": "Alice" }, { "id": "2", "name": "Alicia" }]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.search_limit = 3;
    let client = StashClient::new(&config);

    let matches = client.search(RecordKind::Performer, "alice").await.unwrap();
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0]["name"], "Alice");
}

#[tokio::test]
async fn empty_search_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(graphql(json!({ "findScenes": { "count": 0, "scenes": [] } })))
        .mount(&server)
        .await;

    let client = StashClient::new(&config_for(&server));
    let err = client.search(RecordKind::Scene, "nothing").await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn unauthorized_is_authentication_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = StashClient::new(&config_for(&server));
    let err = client.fetch_by_id(RecordKind::Scene, "1").await.unwrap_err();
    assert!(matches!(err, Error::AuthenticationFailed(_)));
}

#[tokio::test]
async fn forbidden_is_authentication_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let client = StashClient::new(&config_for(&server));
    let err = client.test_connection().await.unwrap_err();
    assert!(matches!(err, Error::AuthenticationFailed(_)));
}

#[tokio::test]
async fn graphql_errors_are_query_failures() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "errors": [
                { "message": "Cannot query field \"bogus\"" },
                { "message": "second problem" }
            ],
            "data": null
        })))
        .mount(&server)
        .await;

    let client = StashClient::new(&config_for(&server));
    let err = client.fetch_by_id(RecordKind::Scene, "1").await.unwrap_err();
    match err {
        Error::Query(msg) => {
            assert!(msg.contains("bogus"));
            assert!(msg.contains("second problem"));
        }
        other => panic!("expected query failure, got {other:?}"),
    }
}

#[tokio::test]
async fn server_error_is_query_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = StashClient::new(&config_for(&server));
    let err = client.fetch_by_id(RecordKind::Scene, "1").await.unwrap_err();
    assert!(matches!(err, Error::Query(ref msg) if msg.contains("500") && msg.contains("boom")));
}

#[tokio::test]
async fn connection_refused_is_connection_failure() {
    // Reserve a free port, then release it so nothing is listening.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();

    let config = StashConfig {
        host: "127.0.0.1".into(),
        port,
        timeout_secs: 5,
        ..Default::default()
    };
    let client = StashClient::new(&config);
    let err = client.fetch_by_id(RecordKind::Scene, "1").await.unwrap_err();
    assert!(matches!(err, Error::ConnectionFailed(_)));
    assert_eq!(err.exit_code(), 1);
}

#[tokio::test]
async fn find_scene_by_file_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("scene_filter: $scene_filter"))
        .and(body_partial_json(json!({
            "variables": {
                "filter": { "per_page": -1 },
                "scene_filter": { "path": { "value": "/media/a.mp4", "modifier": "EQUALS" } }
            }
        })))
        .respond_with(graphql(json!({
            "findScenes": { "count": 1, "scenes": [{ "id": "8", "title": "A" }] }
        })))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(graphql(json!({ "findScenes": { "count": 0, "scenes": [] } })))
        .mount(&server)
        .await;

    let client = StashClient::new(&config_for(&server));
    let scene = client.find_scene_by_path("/media/a.mp4").await.unwrap();
    assert_eq!(scene["id"], "8");

    let err = client.find_scene_by_path("/media/b.mp4").await.unwrap_err();
    assert!(matches!(err, Error::NotFound(ref msg) if msg.contains("/media/b.mp4")));
}
