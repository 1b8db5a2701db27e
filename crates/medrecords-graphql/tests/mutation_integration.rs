//! Integration tests for the create and delete mutations.

mod common;

use std::sync::Arc;

use common::{FailingStore, Harness, seeded_store};
use medrecords_db_memory::InMemoryStore;
use medrecords_graphql::IdStrategy;
use medrecords_storage::{CollectionPath, DocumentStore};
use serde_json::json;

const ADD_XRAY: &str = r#"mutation {
    addFile(filename: "xray.png", gsRef: "gs://records/p9/xray.png", patientID: "p9") {
        id filename gsRef patientID
    }
}"#;

#[tokio::test]
async fn add_file_returns_the_written_file() {
    let harness = Harness::new(Arc::new(InMemoryStore::new()));
    let data = harness.data(ADD_XRAY).await;

    let file = &data["addFile"];
    assert!(!file["id"].as_str().unwrap().is_empty());
    assert_eq!(file["filename"], "xray.png");
    assert_eq!(file["gsRef"], "gs://records/p9/xray.png");
    assert_eq!(file["patientID"], "p9");
}

#[tokio::test]
async fn add_file_round_trips_through_files_by_patient() {
    for strategy in [IdStrategy::Client, IdStrategy::Store] {
        let harness = Harness::with_strategy(Arc::new(InMemoryStore::new()), strategy);
        let created = harness.data(ADD_XRAY).await["addFile"].clone();

        let data = harness
            .data(r#"{ filesByPatient(id: "p9") { id filename gsRef patientID } }"#)
            .await;
        assert_eq!(data["filesByPatient"], json!([created]), "{strategy:?}");
    }
}

#[tokio::test]
async fn created_ids_equal_document_keys() {
    for strategy in [IdStrategy::Client, IdStrategy::Store] {
        let store = Arc::new(InMemoryStore::new());
        let harness = Harness::with_strategy(store.clone(), strategy);

        harness.data(ADD_XRAY).await;
        let files = CollectionPath::parse("patients/p9/files").unwrap();
        let stored = store.list(&files).await.unwrap();
        assert_eq!(stored.len(), 1);
        let file = &stored[0];
        assert_eq!(file.get("id"), Some(&json!(file.id())), "{strategy:?}");
        assert_eq!(file.get("patientID"), Some(&json!("p9")));

        let comment = harness
            .data(&format!(
                r#"mutation {{
                    addComment(text: "ok", author: "dr", date: "2024-01-01",
                               fileID: "{}", patientID: "p9") {{ id }}
                }}"#,
                file.id()
            ))
            .await;
        let comments = store
            .list(&files.doc(file.id()).unwrap().child("comments").unwrap())
            .await
            .unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].get("id"), Some(&json!(comments[0].id())));
        assert_eq!(comment["addComment"]["id"], json!(comments[0].id()));
    }
}

#[tokio::test]
async fn add_comment_then_file_comments_contains_it() {
    let harness = Harness::new(seeded_store());

    let created = harness
        .data(
            r#"mutation {
                addComment(text: "Follow up in 6 weeks", author: "dr.house",
                           date: "2024-04-01", fileID: "f1", patientID: "p1") {
                    id text author date
                }
            }"#,
        )
        .await["addComment"]
        .clone();
    assert_eq!(created["text"], "Follow up in 6 weeks");

    let data = harness
        .data(r#"{ patient(id: "p1") { files { comments { id text author date } } } }"#)
        .await;
    let comments = data["patient"]["files"][0]["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments.iter().filter(|c| **c == created).count(), 1);
}

#[tokio::test]
async fn delete_comment_returns_last_values_and_removes_it() {
    let harness = Harness::new(seeded_store());

    let data = harness
        .data(
            r#"mutation {
                deleteComment(commentID: "c1", fileID: "f1", patientID: "p1") { id text }
            }"#,
        )
        .await;
    assert_eq!(
        data,
        json!({"deleteComment": {"id": "c1", "text": "No fracture"}})
    );

    let data = harness
        .data(r#"{ filesByPatient(id: "p1") { comments { id } } }"#)
        .await;
    assert_eq!(data, json!({"filesByPatient": [{"comments": []}]}));
}

#[tokio::test]
async fn deleting_a_missing_comment_returns_null() {
    let harness = Harness::new(seeded_store());
    let data = harness
        .data(
            r#"mutation {
                deleteComment(commentID: "ghost", fileID: "f1", patientID: "p1") { id }
            }"#,
        )
        .await;
    assert_eq!(data, json!({"deleteComment": null}));
}

#[tokio::test]
async fn add_file_with_missing_argument_is_rejected_before_the_store() {
    let store = Arc::new(FailingStore::default());
    let harness = Harness::new(store.clone());

    let response = harness
        .execute(r#"mutation { addFile(filename: "a.png", gsRef: "gs://a") { id } }"#)
        .await;
    assert!(!response["errors"].as_array().unwrap().is_empty());
    assert_eq!(response["data"], json!(null));
    assert_eq!(store.call_count(), 0);
}

#[tokio::test]
async fn mutation_store_failure_surfaces_the_store_message() {
    let store = Arc::new(FailingStore::default());
    let harness = Harness::new(store.clone());

    let response = harness
        .execute(
            r#"mutation {
                deleteComment(commentID: "c1", fileID: "f1", patientID: "p1") { id }
            }"#,
        )
        .await;
    assert_eq!(
        response["errors"][0]["message"],
        format!("Backend error: {}", FailingStore::MESSAGE)
    );
    // the read failed, so the delete was never attempted
    assert_eq!(store.call_count(), 1);
}

#[tokio::test]
async fn store_strategy_failure_surfaces_the_store_message() {
    let store = Arc::new(FailingStore::default());
    let harness = Harness::with_strategy(store.clone(), IdStrategy::Store);

    let response = harness.execute(ADD_XRAY).await;
    assert_eq!(
        response["errors"][0]["message"],
        format!("Backend error: {}", FailingStore::MESSAGE)
    );
    assert_eq!(response["data"], json!(null));
}
