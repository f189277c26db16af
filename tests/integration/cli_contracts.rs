use entitree::cli::{CliContext, Commands};
use entitree::config::EntitreeConfig;
use entitree::error::ApiError;
use entitree::theme::PreferencesStore;
use entitree::view::{Answer, DeleteSink};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::timeout;
use wiremock::MockServer;

use crate::support::{engine1_body, serve, source_for, stage1_body};

#[derive(Default)]
struct RecordingSink {
    requests: Mutex<Vec<(i64, String)>>,
}

impl DeleteSink for RecordingSink {
    fn request_delete(&self, id: i64, name: &str) {
        self.requests.lock().unwrap().push((id, name.to_string()));
    }
}

fn context(server: &MockServer) -> CliContext {
    let mut config = EntitreeConfig::default();
    config.api.base_url = server.uri();
    CliContext::with_source(config, Arc::new(source_for(server)))
}

#[tokio::test]
async fn browse_without_path_fetches_the_root_listing() {
    let server = MockServer::start().await;
    serve(&server, "", stage1_body()).await;
    let temp = TempDir::new().unwrap();
    let cli = context(&server);

    let (mut app, mut rx) = cli.browse_app(
        None,
        PreferencesStore::new(temp.path().join("preferences.toml")),
    );
    assert!(app.search.is_loading());
    assert_eq!(app.search.query(), "");

    let result = timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(result.query, "");
    assert!(result.outcome.is_found());
    app.on_search_result(result);
    assert_eq!(app.tree.as_ref().map(|n| n.name.as_str()), Some("Stage1"));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.path(), "/");
}

#[tokio::test]
async fn show_json_contract_has_node_fields() {
    let server = MockServer::start().await;
    serve(&server, "Rocket/Stage1", stage1_body()).await;
    let cli = context(&server);

    let output = cli
        .execute(&Commands::Show {
            path: "Rocket/Stage1".to_string(),
            format: "json".to_string(),
            expand_all: false,
        })
        .await
        .unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["name"], "Stage1");
    assert_eq!(parsed["id"], 2);
    assert!(parsed["properties"].is_object());
    let engine = &parsed["descendants"][0];
    assert_eq!(engine["name"], "Engine1");
    assert_eq!(engine["properties"]["ISP"], 12.156);
    assert_eq!(engine["properties"]["Thrust"], "9.493");
    assert!(engine["created_at"].as_str().unwrap().starts_with("2024-03-01T12:00:00"));
}

#[tokio::test]
async fn show_text_prints_rendered_rows() {
    let server = MockServer::start().await;
    serve(&server, "Rocket/Stage1", stage1_body()).await;
    let cli = context(&server);

    let output = cli
        .execute(&Commands::Show {
            path: "Rocket/Stage1".to_string(),
            format: "text".to_string(),
            expand_all: false,
        })
        .await
        .unwrap();

    assert!(output.contains("▼ Stage1"));
    assert!(output.contains("▼ Engine1"));
    assert!(output.contains("Created"));
    assert!(output.contains("12.156"));
    assert!(output.contains("Thrust: 9.493"));
}

#[tokio::test]
async fn show_table_lists_properties_with_paths() {
    let server = MockServer::start().await;
    serve(&server, "Rocket/Stage1", stage1_body()).await;
    let cli = context(&server);

    let output = cli
        .execute(&Commands::Show {
            path: "Rocket/Stage1".to_string(),
            format: "table".to_string(),
            expand_all: true,
        })
        .await
        .unwrap();

    assert!(output.contains("/Rocket/Stage1/Engine1"));
    assert!(output.contains("ISP"));
    assert!(output.contains("9.493"));
}

#[tokio::test]
async fn show_notes_ancestor_fallback() {
    let server = MockServer::start().await;
    serve(&server, "Rocket/Stage1", stage1_body()).await;
    let cli = context(&server);

    let output = cli
        .execute(&Commands::Show {
            path: "Rocket/Stage1/Engine9".to_string(),
            format: "text".to_string(),
            expand_all: false,
        })
        .await
        .unwrap();

    assert!(output.contains("nearest ancestor 'Rocket/Stage1'"));
    assert!(output.contains("▼ Stage1"));
}

#[tokio::test]
async fn show_missing_root_is_an_error() {
    let server = MockServer::start().await;
    let cli = context(&server);

    let err = cli
        .execute(&Commands::Show {
            path: "Satellite".to_string(),
            format: "text".to_string(),
            expand_all: false,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::NotFound(ref p) if p == "Satellite"));
}

#[tokio::test]
async fn show_rejects_unknown_format_before_fetching() {
    let server = MockServer::start().await;
    let cli = context(&server);

    let err = cli.handle_show("Rocket", "yaml", false).await.unwrap_err();

    assert!(matches!(err, ApiError::ConfigError(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_hands_confirmed_node_to_sink() {
    let server = MockServer::start().await;
    serve(&server, "Rocket/Stage1/Engine1", engine1_body()).await;
    let sink = Arc::new(RecordingSink::default());
    let cli = context(&server).with_delete_sink(sink.clone());

    let output = cli
        .execute(&Commands::Delete {
            path: "Rocket/Stage1/Engine1".to_string(),
            force: true,
        })
        .await
        .unwrap();

    assert!(output.contains("Delete requested for 'Engine1' (id 4)"));
    assert_eq!(
        sink.requests.lock().unwrap().as_slice(),
        [(4, "Engine1".to_string())]
    );
}

#[tokio::test]
async fn declined_delete_does_not_reach_sink() {
    let server = MockServer::start().await;
    serve(&server, "Rocket/Stage1/Engine1", engine1_body()).await;
    let sink = Arc::new(RecordingSink::default());
    let cli = context(&server).with_delete_sink(sink.clone());

    let output = cli
        .handle_delete("Rocket/Stage1/Engine1", &Answer(false))
        .await
        .unwrap();

    assert_eq!(output, "Deletion cancelled");
    assert!(sink.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn delete_refuses_ancestor_fallback() {
    let server = MockServer::start().await;
    serve(&server, "Rocket/Stage1", stage1_body()).await;
    let sink = Arc::new(RecordingSink::default());
    let cli = context(&server).with_delete_sink(sink.clone());

    let err = cli
        .handle_delete("Rocket/Stage1/Engine9", &Answer(true))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::FallbackRefused { .. }));
    assert!(sink.requests.lock().unwrap().is_empty());
}
