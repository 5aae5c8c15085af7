//! End-to-end tests over a real loopback socket: bind-then-serve readiness
//! and the full upload round trip.

use std::net::SocketAddr;
use std::sync::Arc;

use docfiler_core::model::mock::MockModel;
use docfiler_core::parse_reply;
use docfiler_relay::{AppState, bind, serve};

async fn spawn_relay(state: Arc<AppState>) -> SocketAddr {
    // Once bind() returns the listener is accepting; no startup sleep needed.
    let listener = bind(SocketAddr::from(([127, 0, 0, 1], 0))).await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(serve(listener, state));
    addr
}

#[tokio::test]
async fn bound_relay_is_immediately_ready() {
    let state = Arc::new(AppState::new(Arc::new(MockModel::replying("{}"))));
    let addr = spawn_relay(state).await;

    let resp = reqwest::get(format!("http://{addr}/healthz")).await.unwrap();
    assert!(resp.status().is_success());
}

#[tokio::test]
async fn upload_round_trip_parses_into_structured_result() {
    let reply = r#"```json
{"summary":"meeting notes from Q3","suggested_folder":"Meetings","keywords":["q3","notes"]}
```"#;
    let state = Arc::new(AppState::new(Arc::new(MockModel::replying(reply))));
    let addr = spawn_relay(state).await;

    let part = reqwest::multipart::Part::bytes(b"raw meeting notes".to_vec())
        .file_name("notes.txt");
    let form = reqwest::multipart::Form::new().part("file", part);

    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/upload"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());

    let body: serde_json::Value = resp.json().await.unwrap();
    let raw = body["summary"].as_str().unwrap();

    let result = parse_reply(raw).unwrap();
    assert_eq!(result.summary, "meeting notes from Q3");
    assert_eq!(result.suggested_folder, "Meetings");
    assert_eq!(result.keywords, vec!["q3", "notes"]);
}
