#[cfg(feature = "storage-local")]
use crate::LocalObjectStore;
#[cfg(feature = "storage-s3")]
use crate::S3ObjectStore;
use crate::{ObjectStore, StorageBackend, StorageError, StorageResult};
use multimedia_core::Config;
use std::sync::Arc;

/// Create an object store backend based on configuration
///
/// `sdk_config` is required for the S3 backend and ignored otherwise, so one
/// loaded AWS configuration can be shared with the metadata store.
#[cfg(feature = "storage-s3")]
pub async fn create_object_store(
    config: &Config,
    sdk_config: Option<&aws_config::SdkConfig>,
) -> StorageResult<Arc<dyn ObjectStore>> {
    match config.storage_backend() {
        StorageBackend::S3 => {
            let sdk_config = sdk_config.ok_or_else(|| {
                StorageError::ConfigError("AWS configuration not loaded".to_string())
            })?;
            Ok(Arc::new(S3ObjectStore::new(sdk_config, config.s3_endpoint())))
        }
        StorageBackend::Local => create_local(config).await,
    }
}

#[cfg(not(feature = "storage-s3"))]
pub async fn create_object_store(config: &Config) -> StorageResult<Arc<dyn ObjectStore>> {
    match config.storage_backend() {
        StorageBackend::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),
        StorageBackend::Local => create_local(config).await,
    }
}

#[cfg(feature = "storage-local")]
async fn create_local(config: &Config) -> StorageResult<Arc<dyn ObjectStore>> {
    let base_path = config
        .local_storage_path()
        .map(String::from)
        .ok_or_else(|| StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string()))?;

    let store = LocalObjectStore::new(base_path).await?;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "storage-local"))]
async fn create_local(_config: &Config) -> StorageResult<Arc<dyn ObjectStore>> {
    Err(StorageError::ConfigError(
        "Local storage backend not available (storage-local feature not enabled)".to_string(),
    ))
}
