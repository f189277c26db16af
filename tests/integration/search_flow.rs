use entitree::app::App;
use entitree::search::{RequestStatus, SearchInput};
use entitree::theme::PreferencesStore;
use entitree::view::{LoggingDeleteSink, Row};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::mpsc;
use tokio::time::timeout;
use wiremock::MockServer;

use crate::support::{rocket_body, serve, serve_tree, source_for, stage1_body};

#[tokio::test]
async fn typed_query_fetches_once_and_replaces_the_tree() {
    let server = MockServer::start().await;
    serve(&server, "Rocket/Stage1", stage1_body()).await;
    let temp = TempDir::new().unwrap();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let search = SearchInput::new(
        Arc::new(source_for(&server)),
        Duration::from_millis(50),
        tx,
    );
    let mut app = App::new(
        search,
        PreferencesStore::new(temp.path().join("preferences.toml")),
        Arc::new(LoggingDeleteSink),
    );

    for c in "Rocket/Stage1".chars() {
        app.search.push_char(c);
    }
    assert!(app.search.is_loading());

    let result = timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(result.query, "Rocket/Stage1");
    app.on_search_result(result);

    assert_eq!(app.search.status(), RequestStatus::Success);
    assert!(!app.search.is_loading());
    let texts: Vec<String> = app.rows().iter().map(Row::text).collect();
    assert_eq!(texts[0], "▼ Stage1");
    assert!(texts.contains(&"▼ Engine1".to_string()));
    assert!(texts.contains(&"ISP: 12.156".to_string()));

    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn unknown_root_keeps_the_previous_tree() {
    let server = MockServer::start().await;
    serve(&server, "Rocket/Stage1", stage1_body()).await;
    let temp = TempDir::new().unwrap();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let search = SearchInput::new(
        Arc::new(source_for(&server)),
        Duration::from_millis(20),
        tx,
    );
    let mut app = App::new(
        search,
        PreferencesStore::new(temp.path().join("preferences.toml")),
        Arc::new(LoggingDeleteSink),
    );

    app.search.set_query("Rocket/Stage1");
    let first = timeout(Duration::from_secs(5), rx.recv()).await.unwrap().unwrap();
    app.on_search_result(first);
    let before: Vec<String> = app.rows().iter().map(Row::text).collect();

    app.search.set_query("Satellite");
    let second = timeout(Duration::from_secs(5), rx.recv()).await.unwrap().unwrap();
    app.on_search_result(second);

    let after: Vec<String> = app.rows().iter().map(Row::text).collect();
    assert_eq!(after, before);
    assert_eq!(app.search.status(), RequestStatus::Warning);
}

#[tokio::test]
async fn deep_query_shows_only_the_matching_subtree() {
    let server = MockServer::start().await;
    serve_tree(&server, rocket_body()).await;
    let temp = TempDir::new().unwrap();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let search = SearchInput::new(
        Arc::new(source_for(&server)),
        Duration::from_millis(20),
        tx,
    );
    let mut app = App::new(
        search,
        PreferencesStore::new(temp.path().join("preferences.toml")),
        Arc::new(LoggingDeleteSink),
    );

    app.search.set_query("/Rocket/Stage1/Engine1");
    let result = timeout(Duration::from_secs(5), rx.recv()).await.unwrap().unwrap();
    assert!(!result.outcome.is_fallback());
    app.on_search_result(result);

    let texts: Vec<String> = app.rows().iter().map(Row::text).collect();
    assert_eq!(texts[0], "▼ Engine1");
    assert!(texts.contains(&"ISP: 12.156".to_string()));
    assert!(!texts.contains(&"ISP: 15.110".to_string()));
    for absent in ["Rocket", "Stage1", "Stage2", "Engine2", "Engine3"] {
        assert!(
            texts.iter().all(|t| !t.ends_with(absent)),
            "{absent} should not be displayed: {texts:?}"
        );
    }
    assert_eq!(texts.iter().filter(|t| t.ends_with("Engine1")).count(), 1);
}
