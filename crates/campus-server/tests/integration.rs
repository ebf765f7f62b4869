//! End-to-end tests against a bound listener.

#![allow(unused_results, missing_docs)]

use std::net::SocketAddr;

use campus_server::{CampusServer, ServerConfig};
use campus_store::{CampusStore, ConnectionConfig};
use reqwest::StatusCode;
use serde_json::{Value, json};

async fn start(store: CampusStore) -> (CampusServer, SocketAddr, tokio::task::JoinHandle<std::io::Result<()>>) {
    let server = CampusServer::new(
        ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
        },
        store,
    );
    let (addr, handle) = server.listen().await.unwrap();
    (server, addr, handle)
}

#[tokio::test]
async fn seed_and_report_over_http() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("campus.db");
    let store = CampusStore::open(path.to_str().unwrap(), &ConnectionConfig::default()).unwrap();
    let (server, addr, handle) = start(store).await;
    let client = reqwest::Client::new();
    let base = format!("http://{addr}");

    let resp = client.get(format!("{base}/seed")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Sample data seeded!");

    let body: Value = client
        .get(format!("{base}/reports/registrations"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body[0]["id"], "COL01_EV001");
    assert_eq!(body[0]["total_registrations"], 2);
    assert_eq!(body[1]["id"], "COL01_EV002");
    assert_eq!(body[1]["total_registrations"], 1);

    let resp = client
        .get(format!("{base}/reports/events"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    drop(client);
    server.shutdown().shutdown();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn workshop_filter_skips_cancelled() {
    let store = CampusStore::in_memory(&ConnectionConfig::default()).unwrap();
    let (server, addr, handle) = start(store).await;
    let client = reqwest::Client::new();
    let base = format!("http://{addr}");

    for (id, date) in [("W1", "2025-10-01"), ("W2", "2025-09-01")] {
        let resp = client
            .post(format!("{base}/events"))
            .json(&json!({"id": id, "name": id, "type": "Workshop", "date": date, "college_id": "C1"}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
    }
    server.store().set_event_cancelled("W1", true).unwrap();

    let body: Value = client
        .get(format!("{base}/reports/events?type=Workshop"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body, json!([{"id": "W2", "name": "W2", "date": "2025-09-01"}]));

    drop(client);
    server.shutdown().shutdown();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn concurrent_registrations_over_http() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("campus.db");
    let store = CampusStore::open(path.to_str().unwrap(), &ConnectionConfig::default()).unwrap();
    let (server, addr, handle) = start(store).await;
    let client = reqwest::Client::new();
    let url = format!("http://{addr}/register");

    let requests = (0..8).map(|_| {
        let client = client.clone();
        let url = url.clone();
        tokio::spawn(async move {
            client
                .post(url)
                .json(&json!({"student_id": "S1", "event_id": "E1"}))
                .send()
                .await
                .unwrap()
                .status()
        })
    });
    let mut statuses = Vec::new();
    for req in requests.collect::<Vec<_>>() {
        statuses.push(req.await.unwrap());
    }

    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::CREATED).count(), 1);
    assert_eq!(
        statuses.iter().filter(|s| **s == StatusCode::BAD_REQUEST).count(),
        7
    );

    drop(client);
    server.shutdown().shutdown();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn health_over_http() {
    let store = CampusStore::in_memory(&ConnectionConfig::default()).unwrap();
    let (server, addr, handle) = start(store).await;

    let resp = reqwest::get(format!("http://{addr}/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");

    server.shutdown().shutdown();
    handle.await.unwrap().unwrap();
}
