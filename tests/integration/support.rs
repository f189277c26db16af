use entitree::client::HttpTreeSource;
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Stage1 subtree as the endpoint serves it: attributes as a list of
/// single-key objects, typed values mixed with strings.
pub fn stage1_body() -> Value {
    json!({
        "id": 2,
        "name": "Stage1",
        "path": "/Rocket/Stage1",
        "created_at": "2024-03-01T12:00:00Z",
        "properties": [],
        "descendants": [
            {
                "id": 4,
                "name": "Engine1",
                "path": "/Rocket/Stage1/Engine1",
                "created_at": "2024-03-01T12:00:00Z",
                "properties": [{ "ISP": 12.156 }, { "Thrust": "9.493" }],
                "descendants": []
            }
        ]
    })
}

pub fn engine1_body() -> Value {
    stage1_body()["descendants"][0].clone()
}

pub fn source_for(server: &MockServer) -> HttpTreeSource {
    HttpTreeSource::new(&server.uri(), Duration::from_secs(5)).unwrap()
}

/// Serve `body` at the encoded form of `node_path`.
pub async fn serve(server: &MockServer, node_path: &str, body: Value) {
    let encoded = format!("/{}", urlencoding::encode(node_path));
    Mock::given(method("GET"))
        .and(path(encoded))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Full Rocket hierarchy: two stages, four engines.
pub fn rocket_body() -> Value {
    let engine = |id: i64, stage: &str, name: &str, isp: &str, thrust: &str| {
        json!({
            "id": id,
            "name": name,
            "path": format!("/Rocket/{}/{}", stage, name),
            "properties": [{ "ISP": isp }, { "Thrust": thrust }],
            "descendants": []
        })
    };
    json!({
        "id": 1,
        "name": "Rocket",
        "path": "/Rocket",
        "properties": [{ "Mass": "12000.000" }, { "Height": "18.000" }],
        "descendants": [
            {
                "id": 2,
                "name": "Stage1",
                "path": "/Rocket/Stage1",
                "properties": [],
                "descendants": [
                    engine(4, "Stage1", "Engine1", "12.156", "9.493"),
                    engine(5, "Stage1", "Engine2", "11.632", "9.413"),
                    engine(6, "Stage1", "Engine3", "12.551", "9.899")
                ]
            },
            {
                "id": 7,
                "name": "Stage2",
                "path": "/Rocket/Stage2",
                "properties": [],
                "descendants": [engine(8, "Stage2", "Engine1", "15.110", "1.622")]
            }
        ]
    })
}

/// Serve every subtree of `root` at its own path, as the real endpoint does.
pub async fn serve_tree(server: &MockServer, root: Value) {
    let mut pending = vec![root];
    while let Some(node) = pending.pop() {
        let node_path = node["path"]
            .as_str()
            .unwrap_or_default()
            .trim_start_matches('/')
            .to_string();
        if let Some(children) = node["descendants"].as_array() {
            pending.extend(children.iter().cloned());
        }
        serve(server, &node_path, node).await;
    }
}
