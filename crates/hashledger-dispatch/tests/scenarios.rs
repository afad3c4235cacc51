//! End-to-end invocation scenarios against an in-memory store.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use hashledger_dispatch::{Dispatcher, Response};
use hashledger_storage::{testutil::FaultyBackend, MemoryBackend};
use hashledger_types::{HashRecord, SettingRecord, TemplateRecord};
use serde::de::DeserializeOwned;

const NO_ARGS: &[&str] = &[];

fn decode<T: DeserializeOwned>(response: &Response) -> T {
    let payload = response.payload().unwrap_or_else(|| panic!("error response: {response:?}"));
    serde_json::from_slice(payload).unwrap()
}

#[tokio::test]
async fn hash_upload_query_and_duplicate() {
    let d = Dispatcher::builder().backend(MemoryBackend::new()).build();
    let upload = r#"{"hash":"abc123","name":"alice","date":"2024-01-01","description":"doc"}"#;
    let expected = HashRecord::new("abc123", "alice", "2024-01-01", "doc");

    assert!(d.invoke("upload_hash", &[upload]).await.is_success());

    let found: Option<HashRecord> = decode(&d.invoke("query_hash", &["abc123"]).await);
    assert_eq!(found, Some(expected.clone()));

    let listed: Vec<HashRecord> = decode(&d.invoke("query_user_hash", &["alice"]).await);
    assert_eq!(listed, vec![expected.clone()]);

    let dup = d.invoke("upload_hash", &[r#"{"hash":"abc123","name":"mallory"}"#]).await;
    assert_eq!(dup.status(), 500);
    assert!(dup.message().unwrap().contains("already exists"));

    let listed: Vec<HashRecord> = decode(&d.invoke("query_user_hash", &["alice"]).await);
    assert_eq!(listed, vec![expected]);
    let listed: Vec<HashRecord> = decode(&d.invoke("query_user_hash", &["mallory"]).await);
    assert!(listed.is_empty());
}

#[tokio::test]
async fn selected_template_is_replaced() {
    let d = Dispatcher::builder().backend(MemoryBackend::new()).build();

    d.invoke("upload_selected_temp", &[r#"{"name":"T1"}"#]).await;
    let selected: TemplateRecord = decode(&d.invoke("query_selected_temp", NO_ARGS).await);
    assert_eq!(selected, TemplateRecord::new("T1", ""));

    d.invoke("upload_selected_temp", &[r#"{"name":"T2"}"#]).await;
    let response = d.invoke("query_selected_temp", NO_ARGS).await;
    assert_eq!(response.payload().unwrap().as_ref(), br#"{"name":"T2"}"#);

    // The slot is not part of the template collection
    let templates: Vec<TemplateRecord> = decode(&d.invoke("query_temp", NO_ARGS).await);
    assert!(templates.is_empty());
}

#[tokio::test]
async fn template_lifecycle() {
    let d = Dispatcher::builder().backend(MemoryBackend::new()).build();

    let v1 = r#"{"name":"invoice","description":"v1"}"#;
    assert!(d.invoke("update_temp", &[v1]).await.is_success());
    assert!(!d.invoke("upload_temp", &[r#"{"name":"invoice"}"#]).await.is_success());
    assert!(d.invoke("upload_temp", &[r#"{"name":"receipt"}"#]).await.is_success());

    let templates: Vec<TemplateRecord> = decode(&d.invoke("query_temp", NO_ARGS).await);
    assert_eq!(
        templates,
        vec![TemplateRecord::new("invoice", "v1"), TemplateRecord::new("receipt", "")]
    );

    assert!(d.invoke("delete_temp", &["invoice"]).await.is_success());
    assert!(d.invoke("delete_temp", &["invoice"]).await.is_success());

    let templates: Vec<TemplateRecord> = decode(&d.invoke("query_temp", NO_ARGS).await);
    assert_eq!(templates, vec![TemplateRecord::new("receipt", "")]);
}

#[tokio::test]
async fn settings_are_upserted_and_listed() {
    let d = Dispatcher::builder().backend(MemoryBackend::new()).build();

    d.invoke("upload_setting", &[r#"{"name":"bob","email":"bob@example.com"}"#]).await;
    d.invoke("upload_setting", &[r#"{"name":"alice","phone":"555-0100"}"#]).await;
    d.invoke("upload_setting", &[r#"{"name":"alice","phone":"555-0199","email":null}"#]).await;

    let alice: Option<SettingRecord> = decode(&d.invoke("query_setting", &["alice"]).await);
    assert_eq!(alice, Some(SettingRecord::new("alice", "", "555-0199")));

    let all: Vec<SettingRecord> = decode(&d.invoke("query_all_setting", NO_ARGS).await);
    let names: Vec<&str> = all.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["alice", "bob"]);
}

#[tokio::test]
async fn delimiter_in_identifier_is_rejected() {
    let backend = MemoryBackend::new();
    let d = Dispatcher::builder().backend(backend.clone()).build();

    let response = d.invoke("upload_hash", &[r#"{"hash":"h1","name":"alice#0"}"#]).await;
    assert!(response.message().unwrap().starts_with("Invalid identifier"));

    let response = d.invoke("query_user_hash", &["alice#0"]).await;
    assert!(response.message().unwrap().starts_with("Invalid identifier"));

    assert!(backend.is_empty().await);
}

#[tokio::test]
async fn corrupt_record_aborts_whole_list() {
    let backend = MemoryBackend::new();
    let d = Dispatcher::builder().backend(backend.clone()).build();
    d.invoke("upload_temp", &[r#"{"name":"a"}"#]).await;
    d.invoke("upload_temp", &[r#"{"name":"c"}"#]).await;
    hashledger_storage::StorageBackend::set(&backend, b"temp#0#b".to_vec(), b"\x00".to_vec())
        .await
        .unwrap();

    let response = d.invoke("query_temp", NO_ARGS).await;

    assert!(response.message().unwrap().starts_with("Decode error"));
    assert_eq!(backend.open_cursors(), 0);
}

#[tokio::test]
async fn partial_write_then_retry() {
    let inner = MemoryBackend::without_transactions();
    let backend = FaultyBackend::new(inner.clone()).fail_nth_set(2);
    let d = Dispatcher::builder().backend(backend).build();
    let upload = r#"{"hash":"abc123","name":"alice"}"#;

    let response = d.invoke("upload_hash", &[upload]).await;
    assert!(response.message().unwrap().starts_with("Partial write"));

    let found: Option<HashRecord> = decode(&d.invoke("query_hash", &["abc123"]).await);
    assert_eq!(found, None);
    let listed: Vec<HashRecord> = decode(&d.invoke("query_user_hash", &["alice"]).await);
    assert!(listed.is_empty());

    assert!(d.invoke("upload_hash", &[upload]).await.is_success());
    let listed: Vec<HashRecord> = decode(&d.invoke("query_user_hash", &["alice"]).await);
    assert_eq!(listed.len(), 1);
}
