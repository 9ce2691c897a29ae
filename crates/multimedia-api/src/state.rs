//! Application state shared by every handler.

use crate::ingest::IngestionAdapter;
use crate::uploader::Uploader;
use multimedia_db::{AssetRepository, PageOptionRepository};
use multimedia_storage::ObjectStorageAdapter;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// Upload and delete orchestration
    pub uploader: Arc<dyn Uploader>,
    pub ingest: IngestionAdapter,
    /// Read side of asset metadata
    pub assets: Arc<dyn AssetRepository>,
    /// Read side of stored blobs
    pub storage: ObjectStorageAdapter,
    pub page_options: Arc<dyn PageOptionRepository>,
}

impl AppState {
    pub fn new(
        uploader: Arc<dyn Uploader>,
        assets: Arc<dyn AssetRepository>,
        storage: ObjectStorageAdapter,
        page_options: Arc<dyn PageOptionRepository>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            ingest: IngestionAdapter::new(uploader.clone(), max_upload_bytes),
            uploader,
            assets,
            storage,
            page_options,
        }
    }
}
