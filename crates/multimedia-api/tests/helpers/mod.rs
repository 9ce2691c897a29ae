//! Test helpers: build the application over in-memory stores.
//!
//! Run from workspace root: `cargo test -p multimedia-api`.

#![allow(dead_code)]

pub mod fixtures;

use axum_test::TestServer;
use multimedia_api::constants;
use multimedia_api::setup::{routes, services};
use multimedia_core::{Config, ServiceConfig};
use multimedia_db::InMemoryMetadataStore;
use multimedia_storage::InMemoryObjectStore;
use std::collections::HashMap;
use std::sync::Arc;

pub const TABLE: &str = "assets";
pub const PAGE_OPTIONS_TABLE: &str = "page_options";
pub const BUCKET: &str = "media";

/// API path prefix for tests (e.g. `/api/v0`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Test application: server plus handles on the fake backends.
pub struct TestApp {
    pub server: TestServer,
    pub objects: InMemoryObjectStore,
    pub records: InMemoryMetadataStore,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn create_test_config(overrides: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = HashMap::from([
        ("TABLE_NAME".to_string(), TABLE.to_string()),
        ("PAGE_OPTIONS_TABLE".to_string(), PAGE_OPTIONS_TABLE.to_string()),
        ("S3_BUCKET".to_string(), BUCKET.to_string()),
        ("AWS_REGION".to_string(), "eu-west-1".to_string()),
        ("MAX_UPLOAD_MB".to_string(), "1".to_string()),
    ]);
    for (key, value) in overrides {
        vars.insert(key.to_string(), value.to_string());
    }

    let config = ServiceConfig::from_lookup(|key| vars.get(key).cloned())
        .expect("Failed to build test config");
    config.validate().expect("Test config must be valid");
    Config(Box::new(config))
}

/// Setup test app with the default configuration.
pub fn setup_test_app() -> TestApp {
    setup_test_app_with(&[])
}

pub fn setup_test_app_with(overrides: &[(&str, &str)]) -> TestApp {
    let config = create_test_config(overrides);
    let objects = InMemoryObjectStore::new();
    let records = InMemoryMetadataStore::new();

    let state = services::initialize_services(
        &config,
        Arc::new(objects.clone()),
        Arc::new(records.clone()),
    )
    .expect("Failed to initialize services");
    let router = routes::setup_routes(&config, state).expect("Failed to setup routes");

    let server =
        TestServer::new(router.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        objects,
        records,
    }
}
