//! Object storage adapter
//!
//! Binds an `ObjectStore` to one bucket and one write policy, and turns a local
//! file path into a stored object.

use crate::keys::validate_key;
use crate::sniff::detect_content_type;
use crate::traits::{FileOpener, ObjectStore, PutObject, StorageResult};
use bytes::Bytes;
use multimedia_core::ObjectPolicy;
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncReadExt;

/// Result of a successful `store`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    pub content_length: u64,
    pub content_type: String,
}

#[derive(Clone)]
pub struct ObjectStorageAdapter {
    store: Arc<dyn ObjectStore>,
    opener: Arc<dyn FileOpener>,
    bucket: String,
    policy: ObjectPolicy,
}

impl ObjectStorageAdapter {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        opener: Arc<dyn FileOpener>,
        bucket: impl Into<String>,
        policy: ObjectPolicy,
    ) -> Self {
        Self {
            store,
            opener,
            bucket: bucket.into(),
            policy,
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn policy(&self) -> &ObjectPolicy {
        &self.policy
    }

    /// Read the local file at `source` and write it under `destination`.
    pub async fn store(&self, source: &Path, destination: &str) -> StorageResult<StoredObject> {
        validate_key(destination)?;

        let start = std::time::Instant::now();
        let mut file = self.opener.open(source).await?;

        let mut buffer = Vec::with_capacity(file.size as usize);
        file.reader.read_to_end(&mut buffer).await?;

        let content_length = buffer.len() as u64;
        let content_type = detect_content_type(&buffer).to_string();

        self.store
            .put(PutObject {
                bucket: self.bucket.clone(),
                key: destination.to_string(),
                body: Bytes::from(buffer),
                content_length,
                content_type: content_type.clone(),
                visibility: self.policy.visibility.clone(),
                disposition: self.policy.disposition.clone(),
                encryption: self.policy.encryption.clone(),
            })
            .await?;

        tracing::info!(
            bucket = %self.bucket,
            key = %destination,
            size_bytes = content_length,
            content_type = %content_type,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Object stored"
        );

        Ok(StoredObject {
            key: destination.to_string(),
            content_length,
            content_type,
        })
    }

    /// Fetch the full payload stored under `key`.
    pub async fn read(&self, key: &str) -> StorageResult<Bytes> {
        validate_key(key)?;
        let output = self.store.get(&self.bucket, key).await?;

        // The body is collected to end-of-stream; a shorter payload is returned as-is.
        if output.body.len() as u64 != output.content_length {
            tracing::warn!(
                bucket = %self.bucket,
                key = %key,
                expected = output.content_length,
                actual = output.body.len(),
                "Object length differs from reported content length"
            );
        }

        Ok(output.body)
    }

    /// Delete the object under `key`. Missing keys are not an error.
    pub async fn remove(&self, key: &str) -> StorageResult<()> {
        validate_key(key)?;
        self.store.delete(&self.bucket, key).await?;
        tracing::info!(bucket = %self.bucket, key = %key, "Object removed");
        Ok(())
    }
}
