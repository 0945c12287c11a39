//! Integration tests: tracker → client → HTTP endpoint → data file.

use chrono::{Duration, TimeZone, Utc};
use serde_json::{Value, json};
use std::fs;
use std::net::SocketAddr;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use worklog::client::StorageClient;
use worklog::config::ClientConfig;
use worklog::core::{Session, Tracker, TrackerState};
use worklog::server::Server;
use worklog::storage::{FileBackend, SessionStore};
use worklog::workbench::Workbench;

struct Running {
    addr: SocketAddr,
    store: Arc<FileBackend>,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<worklog::Result<()>>,
    _temp: TempDir,
}

impl Running {
    fn client(&self) -> StorageClient {
        StorageClient::new(&ClientConfig {
            endpoint: format!("http://{}", self.addr),
            timeout_seconds: 5,
        })
        .unwrap()
    }

    async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.task.await.unwrap().unwrap();
    }
}

async fn start_server() -> Running {
    let temp = TempDir::new().unwrap();
    let store = Arc::new(FileBackend::new(temp.path().join("sessions.json")));
    let server = Server::bind("127.0.0.1:0".parse().unwrap(), store.clone())
        .await
        .unwrap();
    let addr = server.local_addr().unwrap();

    let (tx, rx) = oneshot::channel();
    let task = tokio::spawn(server.serve(async {
        let _ = rx.await;
    }));

    Running {
        addr,
        store,
        shutdown: Some(tx),
        task,
        _temp: temp,
    }
}

fn http() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

fn session(hour: u32, minutes: i64) -> Session {
    let start = Utc.with_ymd_and_hms(2025, 3, 14, hour, 0, 0).unwrap();
    Session::completed(start, start + Duration::minutes(minutes))
}

#[tokio::test]
async fn fresh_endpoint_lists_empty_array() {
    let server = start_server().await;

    let body: Value = http()
        .get(format!("http://{}/sessions", server.addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body, json!([]));

    server.stop().await;
}

#[tokio::test]
async fn save_then_list_round_trips_in_order() {
    let server = start_server().await;
    let client = server.client();

    let saved = vec![session(9, 30), session(11, 90), session(9, 30)];
    for s in &saved {
        let ack = client.save(s).await.unwrap();
        assert_eq!(ack.message, "Session saved");
    }

    assert_eq!(client.fetch_sessions().await.unwrap(), saved);

    // The file on disk is a pretty-printed array of camelCase records
    let contents = fs::read_to_string(server.store.path()).unwrap();
    assert!(contents.contains("\"startTime\""));
    let on_disk: Vec<Value> = serde_json::from_str(&contents).unwrap();
    assert_eq!(on_disk.len(), 3);

    server.stop().await;
}

#[tokio::test]
async fn non_json_body_is_rejected() {
    let server = start_server().await;

    let response = http()
        .post(format!("http://{}/save", server.addr))
        .body("definitely not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    assert!(server.store.list_all().unwrap().is_empty());

    server.stop().await;
}

#[tokio::test]
async fn workbench_persists_on_stop() {
    let server = start_server().await;

    let mut bench = Workbench::load(Some(server.client())).await;
    assert!(bench.tracker().sessions().is_empty());

    bench.start().unwrap();
    let stopped = bench.stop().unwrap();
    stopped.persist.expect("client configured").await.unwrap();

    let stored = server.client().fetch_sessions().await.unwrap();
    assert_eq!(stored, vec![stopped.session.clone()]);

    // A new workbench reloads history from the endpoint
    let reloaded = Workbench::load(Some(server.client())).await;
    assert_eq!(reloaded.tracker().sessions(), &[stopped.session]);
    assert_eq!(reloaded.status().state, TrackerState::Idle);

    server.stop().await;
}

#[tokio::test]
async fn failed_save_keeps_session_in_memory() {
    let server = start_server().await;
    let client = server.client();
    server.stop().await;

    let mut bench = Workbench::new(Tracker::new(), Some(client));
    bench.start().unwrap();
    let stopped = bench.stop().unwrap();

    // The save task swallows the error
    stopped.persist.expect("client configured").await.unwrap();
    assert_eq!(bench.tracker().sessions().len(), 1);
}

#[tokio::test]
async fn load_from_unreachable_endpoint_starts_empty() {
    let server = start_server().await;
    let client = server.client();
    server.stop().await;

    let bench = Workbench::load(Some(client)).await;
    assert!(bench.tracker().sessions().is_empty());
}

#[tokio::test]
async fn foreign_records_are_skipped_by_the_client() {
    let server = start_server().await;
    server.store.append(&json!({"note": "hand-written"})).unwrap();
    server
        .store
        .append(&serde_json::to_value(session(8, 45)).unwrap())
        .unwrap();

    let sessions = server.client().fetch_sessions().await.unwrap();
    assert_eq!(sessions, vec![session(8, 45)]);

    server.stop().await;
}
