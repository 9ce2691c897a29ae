//! Metadata store setup

use anyhow::{Context, Result};
use aws_config::SdkConfig;
use multimedia_core::Config;
use multimedia_db::{create_metadata_store, MetadataStore};
use std::sync::Arc;

pub async fn setup_metadata_store(
    config: &Config,
    aws: Option<&SdkConfig>,
) -> Result<Arc<dyn MetadataStore>> {
    tracing::info!(backend = %config.metadata_backend(), "Initializing metadata store...");
    let store = create_metadata_store(config, aws)
        .await
        .context("Failed to initialize metadata store")?;
    tracing::info!(
        backend = %config.metadata_backend(),
        table = %config.table_name(),
        page_options_table = %config.page_options_table(),
        "Metadata store initialized"
    );
    Ok(store)
}
