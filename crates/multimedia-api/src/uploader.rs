//! Asset upload orchestration
//!
//! An upload is a two-step commit: the blob is written to the object store,
//! then the metadata record is persisted. A record is never written for a blob
//! that failed to store. When the record write fails after the blob landed, the
//! blob is left in place and its key is logged as `orphaned_key`.
//!
//! Delete runs the other way round: the blob is removed first and the record
//! removal is attempted regardless, with its failure logged as
//! `orphaned_record` rather than returned.

use crate::classifier::{classifier_for, AssetClassifier};
use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use multimedia_core::{AppError, MultimediaAsset, UploaderConfig};
use multimedia_db::{AssetRepository, DynamoMetadataStore, MetadataAssetRepository, MetadataStore};
use multimedia_storage::{ObjectStorageAdapter, ObjectStore, OsFileOpener, S3ObjectStore};
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

const DEFAULT_REGION: &str = "us-east-1";

/// Public base URL of a bucket as recorded on each asset.
pub fn bucket_url(bucket: &str, region: &str) -> String {
    if region == DEFAULT_REGION {
        format!("https://{}.s3.amazonaws.com", bucket)
    } else {
        format!("https://{}.s3-{}.amazonaws.com", bucket, region)
    }
}

/// Load one AWS configuration for every client the service builds.
/// Retries are disabled: a failed call is reported, never replayed.
pub async fn load_aws_config(region: &str) -> SdkConfig {
    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .retry_config(RetryConfig::disabled())
        .load()
        .await
}

#[async_trait]
pub trait Uploader: Send + Sync {
    /// Store the file at `source` under `destination` and persist its record.
    async fn upload(&self, source: &Path, destination: &str) -> Result<MultimediaAsset, AppError>;

    /// Remove an asset's blob and record.
    async fn delete(&self, id: Uuid) -> Result<(), AppError>;
}

pub struct AssetUploader {
    bucket: String,
    region: String,
    repository: Arc<dyn AssetRepository>,
    storage: ObjectStorageAdapter,
    classifier: Arc<dyn AssetClassifier>,
}

impl AssetUploader {
    pub fn new(
        region: impl Into<String>,
        repository: Arc<dyn AssetRepository>,
        storage: ObjectStorageAdapter,
        classifier: Arc<dyn AssetClassifier>,
    ) -> Self {
        Self {
            bucket: storage.bucket().to_string(),
            region: region.into(),
            repository,
            storage,
            classifier,
        }
    }

    /// Wire an uploader over already-built object and metadata stores.
    ///
    /// Empty table, bucket or region are rejected with `InvalidArgument`.
    pub fn build(
        config: &UploaderConfig,
        metadata: Arc<dyn MetadataStore>,
        objects: Arc<dyn ObjectStore>,
    ) -> Result<Self, AppError> {
        config.validate()?;

        let repository = MetadataAssetRepository::new(metadata, &config.table_name)?;
        let storage = ObjectStorageAdapter::new(
            objects,
            Arc::new(OsFileOpener),
            &config.bucket,
            config.policy.clone(),
        );

        tracing::info!(
            bucket = %config.bucket,
            region = %config.region,
            table = %config.table_name,
            classifier = %config.classifier,
            "Asset uploader configured"
        );

        Ok(Self::new(
            &config.region,
            Arc::new(repository),
            storage,
            classifier_for(config.classifier),
        ))
    }

    /// Build an uploader backed by S3 and DynamoDB.
    ///
    /// Empty table, bucket or region are rejected before any AWS session is
    /// created.
    pub async fn from_config(config: &UploaderConfig) -> Result<Self, AppError> {
        config.validate()?;

        let sdk_config = load_aws_config(&config.region).await;
        let metadata = DynamoMetadataStore::new(&sdk_config, config.dynamodb_endpoint.as_deref());
        let objects = S3ObjectStore::new(&sdk_config, config.s3_endpoint.as_deref());

        Self::build(config, Arc::new(metadata), Arc::new(objects))
    }

    pub fn repository(&self) -> Arc<dyn AssetRepository> {
        self.repository.clone()
    }

    pub fn storage(&self) -> &ObjectStorageAdapter {
        &self.storage
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn region(&self) -> &str {
        &self.region
    }
}

#[async_trait]
impl Uploader for AssetUploader {
    #[tracing::instrument(skip(self, source), fields(bucket = %self.bucket, destination = %destination))]
    async fn upload(&self, source: &Path, destination: &str) -> Result<MultimediaAsset, AppError> {
        let start = std::time::Instant::now();

        let asset_type = self.classifier.classify(source).await?;
        let mut asset = MultimediaAsset::new(
            bucket_url(&self.bucket, &self.region),
            destination,
            asset_type,
        )?;

        let stored = self.storage.store(source, destination).await?;

        if let Err(e) = self.repository.store(&mut asset).await {
            tracing::warn!(
                error = %e,
                bucket = %self.bucket,
                orphaned_key = %stored.key,
                "Metadata write failed after object upload, object left without a record"
            );
            return Err(e.into());
        }

        tracing::info!(
            asset_id = ?asset.id(),
            asset_type = %asset.asset_type(),
            size_bytes = stored.content_length,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Asset uploaded"
        );

        Ok(asset)
    }

    #[tracing::instrument(skip(self), fields(bucket = %self.bucket, asset_id = %id))]
    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let asset = self
            .repository
            .find(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Asset {} not found", id)))?;

        let removed = self.storage.remove(asset.filename()).await;
        if let Err(e) = &removed {
            tracing::error!(error = %e, key = %asset.filename(), "Object removal failed");
        }

        if let Err(e) = self.repository.remove(id).await {
            tracing::warn!(
                error = %e,
                orphaned_record = %id,
                "Metadata removal failed, record left behind"
            );
        }

        removed.map_err(AppError::from)?;
        tracing::info!(key = %asset.filename(), "Asset deleted");
        Ok(())
    }
}
