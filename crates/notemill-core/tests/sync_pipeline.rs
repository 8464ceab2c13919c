//! End-to-end sync tests against a mocked workspace API.

#![allow(clippy::unwrap_used)]

use notemill_core::{NotionFetcher, Storage, sync_workspace};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_workspace(server: &MockServer, paragraphs: &[&str]) {
    Mock::given(method("POST"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"id": "p1", "url": "https://notion.so/p1", "object": "page"}],
            "has_more": false,
            "next_cursor": null
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/pages/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "properties": {"Title": {"title": [{"text": {"content": "Notes"}}]}}
        })))
        .mount(server)
        .await;

    let blocks: Vec<serde_json::Value> = paragraphs
        .iter()
        .enumerate()
        .map(|(i, text)| {
            json!({
                "id": format!("b{i}"),
                "type": "paragraph",
                "paragraph": {"rich_text": [{"type": "text", "plain_text": text}]}
            })
        })
        .collect();

    Mock::given(method("GET"))
        .and(path("/v1/blocks/p1/children"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": blocks})))
        .mount(server)
        .await;
}

fn fetcher_for(server: &MockServer) -> NotionFetcher {
    NotionFetcher::new("test-token")
        .unwrap()
        .with_base_url(server.uri())
}

#[tokio::test]
async fn two_identical_runs_produce_identical_snapshots() {
    let dir = TempDir::new().unwrap();
    let storage = Storage::with_path(dir.path().join("snapshot.jsonl.gz"));

    let server = MockServer::start().await;
    mount_workspace(&server, &["alpha", "beta"]).await;

    let first = sync_workspace(&fetcher_for(&server), &storage, 2)
        .await
        .unwrap();
    let snapshot_one = storage.load_snapshot().unwrap().unwrap();

    let second = sync_workspace(&fetcher_for(&server), &storage, 2)
        .await
        .unwrap();
    let snapshot_two = storage.load_snapshot().unwrap().unwrap();

    assert_eq!(first.entries, 2);
    assert_eq!(first.fresh, 2);
    assert_eq!(second.carried, 2);
    assert_eq!(second.fresh, 0);
    assert_eq!(snapshot_one, snapshot_two);
}

#[tokio::test]
async fn changed_content_gets_a_fresh_id_and_deletions_drop() {
    let dir = TempDir::new().unwrap();
    let storage = Storage::with_path(dir.path().join("snapshot.jsonl"));

    let server_one = MockServer::start().await;
    mount_workspace(&server_one, &["a", "b"]).await;
    sync_workspace(&fetcher_for(&server_one), &storage, 1)
        .await
        .unwrap();

    // Second run: "b" is gone, "c" is new.
    let server_two = MockServer::start().await;
    mount_workspace(&server_two, &["a", "c"]).await;
    let outcome = sync_workspace(&fetcher_for(&server_two), &storage, 1)
        .await
        .unwrap();

    let snapshot = storage.load_snapshot().unwrap().unwrap();
    let id_of = |text: &str| {
        snapshot
            .iter()
            .find(|e| e.entry.compiled == text)
            .map(|e| e.id)
            .unwrap()
    };

    assert_eq!(outcome.carried, 1);
    assert_eq!(outcome.fresh, 1);
    assert_eq!(id_of("a"), 0);
    assert_eq!(id_of("c"), 2, "dropped id 1 is not reused");
    assert!(!snapshot.iter().any(|e| e.entry.compiled == "b"));
}

#[tokio::test]
async fn snapshot_meta_tracks_the_run() {
    let dir = TempDir::new().unwrap();
    let storage = Storage::with_path(dir.path().join("snapshot.jsonl"));

    let server = MockServer::start().await;
    mount_workspace(&server, &["only entry"]).await;
    sync_workspace(&fetcher_for(&server), &storage, 1)
        .await
        .unwrap();

    let meta = storage.load_meta().unwrap().unwrap();
    assert_eq!(meta.entry_count, 1);
    assert_eq!(meta.page_count, 1);
}
