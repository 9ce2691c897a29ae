//! Asset API integration tests.
//!
//! Run with: `cargo test -p multimedia-api --test assets_test`
//! Backends are in-memory; no AWS or database is required.

mod helpers;

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use bytes::Bytes;
use helpers::{api_path, fixtures, setup_test_app, setup_test_app_with, BUCKET, TABLE};
use serde_json::Value;

fn png_form() -> MultipartForm {
    MultipartForm::new().add_part(
        "file",
        Part::bytes(fixtures::create_minimal_png())
            .file_name("photo.png")
            .mime_type("image/png"),
    )
}

#[tokio::test]
async fn test_upload_get_delete_workflow() {
    let app = setup_test_app();
    let client = app.client();

    let response = client.post(&api_path("/assets")).multipart(png_form()).await;
    response.assert_status(StatusCode::CREATED);
    let asset: Value = response.json();

    let id = asset["id"].as_str().expect("asset id").to_string();
    let filename = asset["filename"].as_str().unwrap().to_string();
    assert_eq!(asset["type"], "image");
    assert_eq!(asset["bucket"], "https://media.s3-eu-west-1.amazonaws.com");
    assert!(filename.ends_with(".png"));
    assert!(asset["createdAt"].as_str().unwrap().ends_with('Z'));
    assert!(app.objects.contains(BUCKET, &filename));

    let response = client.get(&api_path(&format!("/assets/{}", id))).await;
    response.assert_status_ok();
    let fetched: Value = response.json();
    assert_eq!(fetched, asset);

    let response = client
        .get(&api_path(&format!("/assets/{}/content", id)))
        .await;
    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "image/png");
    assert_eq!(response.as_bytes().to_vec(), fixtures::create_minimal_png());

    let response = client.delete(&api_path(&format!("/assets/{}", id))).await;
    response.assert_status(StatusCode::NO_CONTENT);
    assert!(!app.objects.contains(BUCKET, &filename));
    assert_eq!(app.records.count(TABLE), 0);

    let response = client.get(&api_path(&format!("/assets/{}", id))).await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["code"], "NOT_FOUND");

    let response = client.delete(&api_path(&format!("/assets/{}", id))).await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upload_writes_policy_and_sniffed_type() {
    let app = setup_test_app();

    let response = app
        .client()
        .post(&api_path("/assets"))
        .multipart(png_form())
        .await;
    response.assert_status(StatusCode::CREATED);

    let put = app.objects.last_put().expect("object written");
    assert_eq!(put.bucket, BUCKET);
    assert_eq!(put.content_type, "image/png");
    assert_eq!(put.content_length, fixtures::create_minimal_png().len() as u64);
    assert_eq!(put.visibility, "public-read");
    assert_eq!(put.disposition, "attachment");
    assert_eq!(put.encryption, "AES256");
}

#[tokio::test]
async fn test_upload_without_file_field() {
    let app = setup_test_app();
    let form = MultipartForm::new().add_text("note", "no file here");

    let response = app.client().post(&api_path("/assets")).multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
    assert!(app.objects.is_empty());
}

#[tokio::test]
async fn test_raw_upload() {
    let app = setup_test_app();
    let pdf = fixtures::create_test_pdf();

    let response = app
        .client()
        .post(&api_path("/assets/raw"))
        .add_header("x-filename", "terms.pdf")
        .add_header("content-length", pdf.len().to_string())
        .bytes(Bytes::from(pdf.clone()))
        .await;

    response.assert_status(StatusCode::CREATED);
    let asset: Value = response.json();
    assert!(asset["filename"].as_str().unwrap().ends_with(".pdf"));
    // The default classifier records every upload as an image.
    assert_eq!(asset["type"], "image");
    assert_eq!(app.objects.last_put().unwrap().content_type, "application/pdf");
}

#[tokio::test]
async fn test_raw_upload_with_sniffing_classifier() {
    let app = setup_test_app_with(&[("ASSET_CLASSIFIER", "sniff")]);

    for (name, payload, expected) in [
        ("terms.pdf", fixtures::create_test_pdf(), "pdf"),
        ("jingle.mp3", fixtures::create_test_mp3(), "sound"),
        ("photo.png", fixtures::create_minimal_png(), "image"),
    ] {
        let response = app
            .client()
            .post(&api_path("/assets/raw"))
            .add_header("x-filename", name)
            .add_header("content-length", payload.len().to_string())
            .bytes(Bytes::from(payload))
            .await;

        response.assert_status(StatusCode::CREATED);
        let asset: Value = response.json();
        assert_eq!(asset["type"], expected, "classification of {}", name);
    }
}

#[tokio::test]
async fn test_raw_upload_requires_filename() {
    let app = setup_test_app();

    let response = app
        .client()
        .post(&api_path("/assets/raw"))
        .add_header("content-length", "3")
        .bytes(Bytes::from_static(b"abc"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(app.objects.is_empty());
}

#[tokio::test]
async fn test_raw_upload_over_limit() {
    let app = setup_test_app();
    let payload = vec![0u8; 1024 * 1024 + 1];

    let response = app
        .client()
        .post(&api_path("/assets/raw"))
        .add_header("x-filename", "big.bin")
        .add_header("content-length", payload.len().to_string())
        .bytes(Bytes::from(payload))
        .await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    assert!(app.objects.is_empty());
    assert_eq!(app.records.count(TABLE), 0);
}

#[tokio::test]
async fn test_storage_failure_writes_no_record() {
    let app = setup_test_app();
    app.objects.fail_puts(true);

    let response = app
        .client()
        .post(&api_path("/assets"))
        .multipart(png_form())
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert_eq!(body["code"], "STORAGE_ERROR");
    assert_eq!(body["recoverable"], true);
    assert!(body.get("details").is_none());
    assert_eq!(app.records.count(TABLE), 0);
}

#[tokio::test]
async fn test_persist_failure_reports_error_and_keeps_blob() {
    let app = setup_test_app();
    app.records.fail_puts(true);

    let response = app
        .client()
        .post(&api_path("/assets"))
        .multipart(png_form())
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["code"], "PERSISTENCE_ERROR");
    assert_eq!(app.objects.len(), 1);
}

#[tokio::test]
async fn test_find_many_reports_missing_ids() {
    let app = setup_test_app();
    let client = app.client();

    let mut ids = Vec::new();
    for _ in 0..2 {
        let asset: Value = client
            .post(&api_path("/assets"))
            .multipart(png_form())
            .await
            .json();
        ids.push(asset["id"].as_str().unwrap().to_string());
    }
    let ghost = uuid::Uuid::new_v4().to_string();

    let response = client
        .get(&api_path(&format!(
            "/assets?ids={},{},{}",
            ids[1], ghost, ids[0]
        )))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    let found: Vec<&str> = body["assets"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_str().unwrap())
        .collect();
    assert_eq!(found, vec![ids[1].as_str(), ids[0].as_str()]);
    assert_eq!(body["missing"], serde_json::json!([ghost]));
}

#[tokio::test]
async fn test_find_many_rejects_malformed_id() {
    let app = setup_test_app();

    let response = app
        .client()
        .get(&api_path("/assets?ids=not-a-uuid"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_with_failing_object_store_still_drops_record() {
    let app = setup_test_app();
    let client = app.client();
    let asset: Value = client
        .post(&api_path("/assets"))
        .multipart(png_form())
        .await
        .json();
    let id = asset["id"].as_str().unwrap();

    app.objects.fail_deletes(true);
    let response = client.delete(&api_path(&format!("/assets/{}", id))).await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    assert_eq!(app.records.count(TABLE), 0);
    assert_eq!(app.objects.len(), 1);
}

#[tokio::test]
async fn test_health_and_openapi() {
    let app = setup_test_app();

    let response = app.client().get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "alive");

    let response = app.client().get("/api-docs/openapi.json").await;
    response.assert_status_ok();
    let spec: Value = response.json();
    assert!(spec["paths"]["/api/v0/assets/{id}"].is_object());
}
