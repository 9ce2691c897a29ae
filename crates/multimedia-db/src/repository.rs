//! Asset metadata repository
//!
//! Persists validated assets as records keyed by a generated UUID.

use crate::error::{PersistError, PersistResult};
use crate::mapping::{asset_to_record, record_to_asset, ID};
use crate::store::{MetadataStore, RecordKey};
use async_trait::async_trait;
use multimedia_core::MultimediaAsset;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

/// Result of a batch lookup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct FindManyResult {
    /// Found assets, in the order their ids were requested
    pub assets: Vec<MultimediaAsset>,
    /// Requested ids the store did not return
    pub missing: Vec<Uuid>,
}

#[async_trait]
pub trait AssetRepository: Send + Sync {
    /// Persist `asset` under a new id. The id is set on `asset` only on success.
    async fn store(&self, asset: &mut MultimediaAsset) -> PersistResult<()>;

    async fn find(&self, id: Uuid) -> PersistResult<Option<MultimediaAsset>>;

    async fn find_many(&self, ids: &[Uuid]) -> PersistResult<FindManyResult>;

    async fn remove(&self, id: Uuid) -> PersistResult<()>;
}

/// `AssetRepository` over a `MetadataStore` table
#[derive(Clone)]
pub struct MetadataAssetRepository {
    store: Arc<dyn MetadataStore>,
    table: String,
}

impl MetadataAssetRepository {
    pub fn new(store: Arc<dyn MetadataStore>, table: impl Into<String>) -> PersistResult<Self> {
        let table = table.into();
        if table.trim().is_empty() {
            return Err(PersistError::Config(
                "asset table name must not be empty".to_string(),
            ));
        }
        Ok(Self { store, table })
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

#[async_trait]
impl AssetRepository for MetadataAssetRepository {
    #[tracing::instrument(skip(self, asset), fields(db.table = %self.table, db.operation = "insert"))]
    async fn store(&self, asset: &mut MultimediaAsset) -> PersistResult<()> {
        if let Some(existing) = asset.id() {
            return Err(PersistError::AlreadyPersisted(existing));
        }

        let id = Uuid::new_v4();
        let mut record = asset_to_record(asset);
        record.insert(ID.to_string(), id.to_string());

        self.store
            .put_record(&self.table, &RecordKey::new(ID, id.to_string()), record)
            .await?;

        asset
            .assign_id(id)
            .map_err(PersistError::AlreadyPersisted)?;

        tracing::debug!(asset_id = %id, filename = %asset.filename(), "Asset record stored");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(db.table = %self.table, db.operation = "select", db.record_id = %id))]
    async fn find(&self, id: Uuid) -> PersistResult<Option<MultimediaAsset>> {
        let record = self
            .store
            .get_record(&self.table, &RecordKey::new(ID, id.to_string()))
            .await?;
        record.as_ref().map(record_to_asset).transpose()
    }

    #[tracing::instrument(skip(self, ids), fields(db.table = %self.table, db.operation = "batch_select", count = ids.len()))]
    async fn find_many(&self, ids: &[Uuid]) -> PersistResult<FindManyResult> {
        let mut seen = HashSet::new();
        let requested: Vec<Uuid> = ids.iter().copied().filter(|id| seen.insert(*id)).collect();

        if requested.is_empty() {
            return Ok(FindManyResult::default());
        }

        let values: Vec<String> = requested.iter().map(Uuid::to_string).collect();
        let records = self
            .store
            .query_by_key_set(&self.table, ID, &values)
            .await?;

        let mut by_id: HashMap<Uuid, MultimediaAsset> = HashMap::with_capacity(records.len());
        for record in &records {
            let asset = record_to_asset(record)?;
            if let Some(id) = asset.id() {
                by_id.insert(id, asset);
            }
        }

        let mut result = FindManyResult::default();
        for id in requested {
            match by_id.remove(&id) {
                Some(asset) => result.assets.push(asset),
                None => result.missing.push(id),
            }
        }

        if !result.missing.is_empty() {
            tracing::debug!(missing = result.missing.len(), "Batch lookup returned partial result");
        }

        Ok(result)
    }

    #[tracing::instrument(skip(self), fields(db.table = %self.table, db.operation = "delete", db.record_id = %id))]
    async fn remove(&self, id: Uuid) -> PersistResult<()> {
        self.store
            .delete_record(&self.table, &RecordKey::new(ID, id.to_string()))
            .await
    }
}
