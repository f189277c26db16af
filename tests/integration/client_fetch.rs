use entitree::client::{FetchOutcome, HttpTreeSource, TreeSource};
use entitree::tree::PropertyValue;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::support::{rocket_body, serve, serve_tree, source_for, stage1_body};

#[tokio::test]
async fn exact_hit_returns_only_the_requested_subtree() {
    let server = MockServer::start().await;
    serve_tree(&server, rocket_body()).await;

    let outcome = source_for(&server).fetch("Rocket/Stage1/Engine1").await;

    assert!(outcome.is_found());
    assert!(!outcome.is_fallback());
    let node = outcome.into_node().unwrap();
    assert_eq!(node.name, "Engine1");
    assert_eq!(node.path, "/Rocket/Stage1/Engine1");
    assert!(node.descendants.is_empty());
    assert_eq!(node.properties["ISP"], PropertyValue::Text("12.156".into()));
    assert_eq!(node.properties["ISP"].as_number(), Some(12.156));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.path(), "/Rocket%2FStage1%2FEngine1");
}

#[tokio::test]
async fn leading_slash_is_stripped_before_the_request() {
    let server = MockServer::start().await;
    serve(&server, "Rocket/Stage1", stage1_body()).await;

    let outcome = source_for(&server).fetch("/Rocket/Stage1").await;

    match outcome {
        FetchOutcome::Found {
            requested,
            resolved,
            node,
        } => {
            assert_eq!(requested, "Rocket/Stage1");
            assert_eq!(resolved, "Rocket/Stage1");
            assert_eq!(node.name, "Stage1");
        }
        other => panic!("expected Found, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_leaf_falls_back_to_nearest_ancestor() {
    let server = MockServer::start().await;
    serve(&server, "Rocket/Stage1", stage1_body()).await;

    let outcome = source_for(&server).fetch("Rocket/Stage1/Engine9").await;

    assert!(outcome.is_fallback());
    match &outcome {
        FetchOutcome::Found { resolved, node, .. } => {
            assert_eq!(resolved, "Rocket/Stage1");
            assert_eq!(node.name, "Stage1");
        }
        other => panic!("expected Found, got {other:?}"),
    }

    let paths: Vec<String> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| r.url.path().to_string())
        .collect();
    assert_eq!(
        paths,
        ["/Rocket%2FStage1%2FEngine9", "/Rocket%2FStage1"]
    );
}

#[tokio::test]
async fn root_level_miss_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Satellite"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = source_for(&server).fetch("Satellite").await;

    assert_eq!(
        outcome,
        FetchOutcome::NotFound {
            requested: "Satellite".to_string()
        }
    );
}

#[tokio::test]
async fn server_error_also_walks_up() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Rocket%2FStage1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    serve(&server, "Rocket", stage1_body()).await;

    let outcome = source_for(&server).fetch("Rocket/Stage1").await;

    assert!(outcome.is_fallback());
}

#[tokio::test]
async fn malformed_body_is_a_failure_without_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Rocket%2FStage1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = source_for(&server).fetch("Rocket/Stage1").await;

    assert!(matches!(outcome, FetchOutcome::Failed { .. }));
    assert!(outcome.into_node().is_none());
}

#[tokio::test]
async fn unreachable_server_is_a_failure() {
    let source = HttpTreeSource::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();

    let outcome = source.fetch("Rocket").await;

    match outcome {
        FetchOutcome::Failed { requested, reason } => {
            assert_eq!(requested, "Rocket");
            assert!(!reason.is_empty());
        }
        other => panic!("expected Failed, got {other:?}"),
    }
}
