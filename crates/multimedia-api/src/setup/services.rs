//! Repository and orchestrator wiring

use crate::state::AppState;
use crate::uploader::{load_aws_config, AssetUploader};
use anyhow::{Context, Result};
use aws_config::SdkConfig;
use multimedia_core::{Config, MetadataBackend, StorageBackend};
use multimedia_db::{MetadataPageOptionRepository, MetadataStore};
use multimedia_storage::ObjectStore;
use std::sync::Arc;

/// Load the AWS configuration once when any backend needs it, so the object
/// store and metadata store share region, credentials and retry policy.
pub async fn load_shared_aws_config(config: &Config) -> Option<SdkConfig> {
    let needs_aws = config.storage_backend() == StorageBackend::S3
        || config.metadata_backend() == MetadataBackend::DynamoDb;
    if !needs_aws {
        return None;
    }
    Some(load_aws_config(config.region()).await)
}

/// Build application state over already-initialized backends.
///
/// The uploader is built through `AssetUploader::build`; empty table, bucket or
/// region fail here.
pub fn initialize_services(
    config: &Config,
    objects: Arc<dyn ObjectStore>,
    metadata: Arc<dyn MetadataStore>,
) -> Result<Arc<AppState>> {
    let uploader = AssetUploader::build(&config.uploader_config(), metadata.clone(), objects)
        .context("Failed to configure asset uploader")?;
    let assets = uploader.repository();
    let storage = uploader.storage().clone();

    let page_options = Arc::new(
        MetadataPageOptionRepository::new(metadata, config.page_options_table())
            .context("Failed to create page option repository")?,
    );

    tracing::info!(
        max_upload_bytes = config.max_upload_bytes(),
        "Services initialized"
    );

    Ok(Arc::new(AppState::new(
        Arc::new(uploader),
        assets,
        storage,
        page_options,
        config.max_upload_bytes(),
    )))
}
