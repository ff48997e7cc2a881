//! マッピング保存先の結合テスト
//!
//! ローカルファイルはtempfile、GitHub contents APIはhttpmockで検証

use base64::Engine;
use faturamento_common::{Channel, ChannelAssignment, ConvenioMapping};
use faturamento_rust::config::GithubSettings;
use faturamento_rust::error::BillingError;
use faturamento_rust::store::{GithubStore, LocalStore, MappingStore, MirroredStore};
use httpmock::prelude::*;
use serde_json::json;
use tempfile::tempdir;

const CONTENTS_PATH: &str = "/repos/clinica/faturamento/contents/data/convenios.json";

fn settings() -> GithubSettings {
    GithubSettings {
        token: "ghp_test".into(),
        repo: "clinica/faturamento".into(),
        branch: "main".into(),
        path: "data/convenios.json".into(),
    }
}

fn github_store(server: &MockServer) -> GithubStore {
    GithubStore::new(settings()).unwrap().with_base_url(server.base_url())
}

fn encode(json: &str) -> String {
    base64::engine::general_purpose::STANDARD.encode(json)
}

fn sample_mapping() -> ConvenioMapping {
    let mut mapping = ConvenioMapping::new();
    mapping.set("UNIMED", Some(Channel::Amhpdf));
    mapping.set("AMIL", None);
    mapping
}

// ── LocalStore ──────────────────────────────────────────────────────

#[test]
fn test_local_round_trip_keeps_unassigned_keys() {
    let dir = tempdir().unwrap();
    let store = LocalStore::new(dir.path().join("convenios.json"));

    store.save(&sample_mapping(), None).unwrap();
    let snapshot = store.load().unwrap();

    assert_eq!(snapshot.mapping, sample_mapping());
    assert_eq!(snapshot.version, None);

    let raw = std::fs::read_to_string(store.path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value, json!({"AMIL": "", "UNIMED": "AMHPDF"}));
}

#[test]
fn test_local_cleans_invalid_entries_on_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("convenios.json");
    std::fs::write(&path, r#"{" ": "DIRETO", "GEAP": "OUTRO", "CASSI": "direto"}"#).unwrap();

    let store = LocalStore::new(&path);
    let mapping = store.load().unwrap().mapping;

    assert_eq!(mapping.len(), 2);
    assert_eq!(mapping.channel_for("GEAP"), None);
    assert_eq!(mapping.channel_for("CASSI"), Some(Channel::Direto));
}

#[test]
fn test_assignment_batch_written_once() {
    let dir = tempdir().unwrap();
    let store = LocalStore::new(dir.path().join("convenios.json"));
    store.save(&sample_mapping(), None).unwrap();

    let snapshot = store.load().unwrap();
    let batch = vec![
        ChannelAssignment { convenio_key: "AMIL".into(), channel: Some(Channel::Hospital) },
        ChannelAssignment { convenio_key: "GEAP".into(), channel: Some(Channel::Direto) },
        ChannelAssignment { convenio_key: "UNIMED".into(), channel: Some(Channel::Direto) },
    ];
    let updated = snapshot.mapping.with_assignments(&batch);
    store.save(&updated, snapshot.version.as_deref()).unwrap();

    let reloaded = store.load().unwrap().mapping;
    assert_eq!(reloaded.channel_for("AMIL"), Some(Channel::Hospital));
    assert_eq!(reloaded.channel_for("GEAP"), Some(Channel::Direto));
    assert_eq!(reloaded.channel_for("UNIMED"), Some(Channel::Amhpdf));
}

// ── GithubStore ─────────────────────────────────────────────────────

#[test]
fn test_github_load_decodes_content() {
    let server = MockServer::start();
    let content = encode(r#"{"UNIMED": "AMHPDF", "AMIL": ""}"#);
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path(CONTENTS_PATH)
            .query_param("ref", "main")
            .header("authorization", "Bearer ghp_test")
            .header("x-github-api-version", "2022-11-28");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({
                "content": content,
                "encoding": "base64",
                "sha": "sha-1"
            }));
    });

    let snapshot = github_store(&server).load().unwrap();

    mock.assert();
    assert_eq!(snapshot.mapping, sample_mapping());
    assert_eq!(snapshot.version.as_deref(), Some("sha-1"));
}

#[test]
fn test_github_not_found_is_empty() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(CONTENTS_PATH);
        then.status(404).json_body(json!({"message": "Not Found"}));
    });

    let snapshot = github_store(&server).load().unwrap();
    assert!(snapshot.mapping.is_empty());
    assert_eq!(snapshot.version, None);
}

#[test]
fn test_github_unauthorized_is_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(CONTENTS_PATH);
        then.status(401).json_body(json!({"message": "Bad credentials"}));
    });

    let result = github_store(&server).load();
    assert!(matches!(result, Err(BillingError::StoreAuth(_))));
}

#[test]
fn test_github_server_error_is_not_empty() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(CONTENTS_PATH);
        then.status(503);
    });

    let result = github_store(&server).load();
    assert!(matches!(result, Err(BillingError::StoreUnreachable(_))));
}

#[test]
fn test_github_unreachable_host() {
    let store = GithubStore::new(settings())
        .unwrap()
        .with_base_url("http://127.0.0.1:9");

    let result = store.load();
    assert!(matches!(result, Err(BillingError::StoreUnreachable(_))));
}

#[test]
fn test_github_save_sends_version_and_returns_new_sha() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(PUT)
            .path(CONTENTS_PATH)
            .header("authorization", "Bearer ghp_test")
            .body_includes(r#""sha":"sha-1""#)
            .body_includes(r#""branch":"main""#)
            .body_includes("Atualiza cadastro de conv");
        then.status(200).json_body(json!({
            "content": {"sha": "sha-2", "path": "data/convenios.json"},
            "commit": {"sha": "commit-1"}
        }));
    });

    let snapshot = github_store(&server)
        .save(&sample_mapping(), Some("sha-1"))
        .unwrap();

    mock.assert();
    assert_eq!(snapshot.version.as_deref(), Some("sha-2"));
    assert_eq!(snapshot.mapping, sample_mapping());
}

#[test]
fn test_github_stale_version_is_conflict() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(PUT).path(CONTENTS_PATH);
        then.status(409).json_body(json!({"message": "does not match"}));
    });

    let result = github_store(&server).save(&sample_mapping(), Some("sha-old"));
    assert!(matches!(result, Err(BillingError::StoreConflict(_))));
}

// ── MirroredStore ───────────────────────────────────────────────────

#[test]
fn test_mirrored_load_refreshes_local_copy() {
    let server = MockServer::start();
    let content = encode(r#"{"UNIMED": "AMHPDF", "AMIL": ""}"#);
    server.mock(|when, then| {
        when.method(GET).path(CONTENTS_PATH);
        then.status(200).json_body(json!({
            "content": content,
            "encoding": "base64",
            "sha": "sha-1"
        }));
    });

    let dir = tempdir().unwrap();
    let local_path = dir.path().join("convenios.json");
    let store = MirroredStore::new(LocalStore::new(&local_path), github_store(&server));

    let snapshot = store.load().unwrap();
    assert_eq!(snapshot.version.as_deref(), Some("sha-1"));

    let local = LocalStore::new(&local_path).load().unwrap();
    assert_eq!(local.mapping, sample_mapping());
}

#[test]
fn test_mirrored_load_keeps_local_table_when_remote_missing() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(CONTENTS_PATH);
        then.status(404).json_body(json!({"message": "Not Found"}));
    });

    let dir = tempdir().unwrap();
    let local_path = dir.path().join("convenios.json");
    LocalStore::new(&local_path).save(&sample_mapping(), None).unwrap();

    let store = MirroredStore::new(LocalStore::new(&local_path), github_store(&server));
    let snapshot = store.load().unwrap();

    assert_eq!(snapshot.mapping, sample_mapping());
    assert_eq!(snapshot.version, None);

    // ローカルファイルは空の表で上書きされない
    let local = LocalStore::new(&local_path).load().unwrap();
    assert_eq!(local.mapping, sample_mapping());
}

#[test]
fn test_mirrored_save_conflict_leaves_local_untouched() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(PUT).path(CONTENTS_PATH);
        then.status(422).json_body(json!({"message": "sha wasn't supplied"}));
    });

    let dir = tempdir().unwrap();
    let local_path = dir.path().join("convenios.json");
    let store = MirroredStore::new(LocalStore::new(&local_path), github_store(&server));

    let result = store.save(&sample_mapping(), None);
    assert!(matches!(result, Err(BillingError::StoreConflict(_))));

    // 拒否された表はローカルにも書かない
    assert!(!local_path.exists());
}

#[test]
fn test_mirrored_save_updates_local_after_remote() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(PUT).path(CONTENTS_PATH);
        then.status(201).json_body(json!({"content": {"sha": "sha-new"}}));
    });

    let dir = tempdir().unwrap();
    let local_path = dir.path().join("convenios.json");
    let store = MirroredStore::new(LocalStore::new(&local_path), github_store(&server));

    let snapshot = store.save(&sample_mapping(), None).unwrap();
    assert_eq!(snapshot.version.as_deref(), Some("sha-new"));

    let local = LocalStore::new(&local_path).load().unwrap();
    assert_eq!(local.mapping, sample_mapping());
}
