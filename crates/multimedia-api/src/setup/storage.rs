//! Object store setup

use anyhow::{Context, Result};
use aws_config::SdkConfig;
use multimedia_core::Config;
use multimedia_storage::{create_object_store, ObjectStore};
use std::sync::Arc;

pub async fn setup_object_store(
    config: &Config,
    aws: Option<&SdkConfig>,
) -> Result<Arc<dyn ObjectStore>> {
    tracing::info!(backend = %config.storage_backend(), "Initializing object store...");
    let store = create_object_store(config, aws)
        .await
        .context("Failed to initialize object store")?;
    tracing::info!(
        backend = %config.storage_backend(),
        bucket = %config.s3_bucket(),
        "Object store initialized"
    );
    Ok(store)
}
