//! Asset type classification
//!
//! Decides which `AssetType` an uploaded file is recorded as.

use async_trait::async_trait;
use multimedia_core::{AppError, AssetType, ClassifierKind};
use multimedia_storage::{detect_content_type, sniff::SNIFF_LEN};
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncReadExt;

#[async_trait]
pub trait AssetClassifier: Send + Sync {
    async fn classify(&self, source: &Path) -> Result<AssetType, AppError>;
}

/// Always reports the same type, regardless of content.
#[derive(Debug, Clone, Copy)]
pub struct FixedClassifier(pub AssetType);

impl Default for FixedClassifier {
    fn default() -> Self {
        Self(AssetType::Image)
    }
}

#[async_trait]
impl AssetClassifier for FixedClassifier {
    async fn classify(&self, _source: &Path) -> Result<AssetType, AppError> {
        Ok(self.0)
    }
}

/// Classifies by the leading bytes of the file. Anything that is neither a
/// PDF nor audio is recorded as an image.
#[derive(Debug, Clone, Copy, Default)]
pub struct SniffingClassifier;

impl SniffingClassifier {
    pub fn type_for_content(content_type: &str) -> AssetType {
        if content_type == "application/pdf" {
            AssetType::Pdf
        } else if content_type.starts_with("audio/") || content_type == "application/ogg" {
            AssetType::Sound
        } else {
            AssetType::Image
        }
    }
}

#[async_trait]
impl AssetClassifier for SniffingClassifier {
    async fn classify(&self, source: &Path) -> Result<AssetType, AppError> {
        let file = tokio::fs::File::open(source).await.map_err(|e| {
            AppError::Internal(format!("Failed to open {}: {}", source.display(), e))
        })?;

        let mut head = Vec::with_capacity(SNIFF_LEN);
        file.take(SNIFF_LEN as u64).read_to_end(&mut head).await?;

        let content_type = detect_content_type(&head);
        let asset_type = Self::type_for_content(content_type);
        tracing::debug!(content_type, asset_type = %asset_type, "Classified upload");
        Ok(asset_type)
    }
}

pub fn classifier_for(kind: ClassifierKind) -> Arc<dyn AssetClassifier> {
    match kind {
        ClassifierKind::Fixed => Arc::new(FixedClassifier::default()),
        ClassifierKind::Sniff => Arc::new(SniffingClassifier),
    }
}
