use std::path::Path;
use std::time::Duration;

use serde_json::{Value, json};
use trainlog_stats::category::{Category, parse_types};
use trainlog_stats::config::Config;
use trainlog_stats::fetch::{BasicClient, FetchError, fetch_json};
use trainlog_stats::leaderboard::LeaderboardClient;
use trainlog_stats::pipeline;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn leaderboard(username: &str, length: u64, trips: u64) -> Value {
    json!({
        "leaderboard_data": [
            {"username": "someone_else", "length": 999_999, "trips": 99},
            {"username": username, "length": length, "trips": trips}
        ]
    })
}

async fn mount(server: &MockServer, category_path: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/getLeaderboardUsers/{category_path}")))
        .respond_with(response)
        .mount(server)
        .await;
}

fn config(server: &MockServer, types: &str, output: &Path) -> Config {
    Config {
        username: Some("alice".into()),
        output_path: output.to_path_buf(),
        categories: parse_types(types),
        base_url: server.uri(),
        timeout: Duration::from_secs(5),
    }
}

fn client(config: &Config) -> LeaderboardClient<BasicClient> {
    LeaderboardClient::new(BasicClient::new(config.timeout).unwrap(), &config.base_url)
}

#[tokio::test]
async fn test_two_categories_reported_and_exported() {
    let server = MockServer::start().await;
    mount(
        &server,
        "train",
        ResponseTemplate::new(200).set_body_json(leaderboard("alice", 5000, 3)),
    )
    .await;
    mount(
        &server,
        "bus",
        ResponseTemplate::new(200).set_body_json(leaderboard("alice", 15000, 10)),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("output.json");
    let cfg = config(&server, "train, bus", &output);

    let mut console = Vec::new();
    pipeline::run(&cfg, &client(&cfg), &mut console)
        .await
        .expect("run succeeds");

    let console = String::from_utf8(console).unwrap();
    assert_eq!(
        console,
        "Output for user alice:\n\
         Type: train — km: 5 — trips: 3\n\
         Type: bus — km: 15 — trips: 10\n\
         Successfully updated output.json\n"
    );

    let written: Value = serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(
        written,
        json!({"train": {"km": 5, "trips": 3}, "bus": {"km": 15, "trips": 10}})
    );
}

#[tokio::test]
async fn test_server_error_aborts_without_export() {
    let server = MockServer::start().await;
    mount(
        &server,
        "train",
        ResponseTemplate::new(500).set_body_string("internal error"),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("output.json");
    std::fs::write(&output, "previous run").unwrap();
    let cfg = config(&server, "train", &output);

    let mut console = Vec::new();
    let err = pipeline::run(&cfg, &client(&cfg), &mut console)
        .await
        .unwrap_err();

    match err.downcast_ref::<FetchError>() {
        Some(FetchError::Status { status, snippet }) => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(snippet, "internal error");
        }
        other => panic!("expected status error, got {other:?}"),
    }
    assert_eq!(String::from_utf8(console).unwrap(), "No data retrieved.\n");
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "previous run");
}

#[tokio::test]
async fn test_later_failure_writes_nothing() {
    let server = MockServer::start().await;
    mount(
        &server,
        "all",
        ResponseTemplate::new(200).set_body_json(leaderboard("alice", 1000, 1)),
    )
    .await;
    mount(
        &server,
        "tram",
        ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("output.json");
    let cfg = config(&server, "all,tram", &output);

    let err = pipeline::run(&cfg, &client(&cfg), &mut Vec::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<FetchError>(),
        Some(FetchError::InvalidJson { .. })
    ));
    assert!(!output.exists());
}

#[tokio::test]
async fn test_invalid_category_is_never_requested() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/getLeaderboardUsers/train"))
        .respond_with(ResponseTemplate::new(200).set_body_json(leaderboard("alice", 2000, 2)))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("stats.json");
    let cfg = config(&server, "unicorn,train", &output);
    assert_eq!(cfg.categories, vec![Category::Train]);

    pipeline::run(&cfg, &client(&cfg), &mut Vec::new())
        .await
        .expect("run succeeds");

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].url.path(), "/getLeaderboardUsers/train");
}

#[tokio::test]
async fn test_airplane_uses_air_path_and_name_key() {
    let server = MockServer::start().await;
    mount(
        &server,
        "air",
        ResponseTemplate::new(200).set_body_json(leaderboard("alice", 12345, 7)),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("output.json");
    let cfg = config(&server, "airplane", &output);

    let mut console = Vec::new();
    pipeline::run(&cfg, &client(&cfg), &mut console)
        .await
        .expect("run succeeds");

    assert!(
        String::from_utf8(console)
            .unwrap()
            .contains("Type: airplane — km: 12 — trips: 7\n")
    );
    let written: Value = serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(written, json!({"airplane": {"km": 12, "trips": 7}}));
}

#[tokio::test]
async fn test_bad_shape_and_missing_user_export_null() {
    let server = MockServer::start().await;
    mount(
        &server,
        "metro",
        ResponseTemplate::new(200).set_body_json(json!({"message": "no data"})),
    )
    .await;
    mount(
        &server,
        "ferry",
        ResponseTemplate::new(200).set_body_json(leaderboard("bob", 3000, 1)),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("output.json");
    let cfg = config(&server, "metro,ferry", &output);

    let mut console = Vec::new();
    let document = pipeline::run(&cfg, &client(&cfg), &mut console)
        .await
        .expect("shape problems are not fatal");

    let console = String::from_utf8(console).unwrap();
    assert!(console.contains("Incorrect file structure or 'leaderboard_data' is missing:"));
    assert!(console.contains("Couldn't find results for 'alice'."));
    assert_eq!(document.entries[0], (Category::Metro, None));

    let written: Value = serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(written, json!({"metro": null, "ferry": null}));
}

#[tokio::test]
async fn test_duplicate_categories_reported_twice_exported_once() {
    let server = MockServer::start().await;
    mount(
        &server,
        "bus",
        ResponseTemplate::new(200).set_body_json(leaderboard("alice", 4000, 2)),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("output.json");
    let cfg = config(&server, "bus,bus", &output);

    let mut console = Vec::new();
    pipeline::run(&cfg, &client(&cfg), &mut console)
        .await
        .expect("run succeeds");

    let console = String::from_utf8(console).unwrap();
    assert_eq!(console.matches("Type: bus — km: 4 — trips: 2").count(), 2);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);

    let written = std::fs::read_to_string(&output).unwrap();
    assert_eq!(
        written,
        "{\n  \"bus\": {\n    \"km\": 4,\n    \"trips\": 2\n  }\n}"
    );
}

#[tokio::test]
async fn test_connection_refused_is_request_error() {
    // Bind then drop a listener to get a port nothing listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let http = BasicClient::new(Duration::from_secs(2)).unwrap();
    let err = fetch_json(&http, &format!("http://{addr}/getLeaderboardUsers/all"))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Request(_)));
}

#[tokio::test]
async fn test_timeout_is_request_error() {
    let server = MockServer::start().await;
    mount(
        &server,
        "all",
        ResponseTemplate::new(200)
            .set_body_json(leaderboard("alice", 1, 1))
            .set_delay(Duration::from_secs(3)),
    )
    .await;

    let http = BasicClient::new(Duration::from_millis(200)).unwrap();
    let err = fetch_json(&http, &format!("{}/getLeaderboardUsers/all", server.uri()))
        .await
        .unwrap_err();

    match err {
        FetchError::Request(e) => assert!(e.is_timeout()),
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn test_non_200_success_status_is_rejected() {
    let server = MockServer::start().await;
    mount(&server, "all", ResponseTemplate::new(204)).await;

    let http = BasicClient::new(Duration::from_secs(2)).unwrap();
    let err = fetch_json(&http, &format!("{}/getLeaderboardUsers/all", server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Status { .. }));
}
