//! Object store and file source abstractions
//!
//! `ObjectStore` is the bucket-scoped blob service every backend implements;
//! `FileOpener` gives the adapter access to the local file being uploaded.

use async_trait::async_trait;
use bytes::Bytes;
use multimedia_core::AppError;
use std::path::Path;
use std::pin::Pin;
use thiserror::Error;
use tokio::io::AsyncRead;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Source file unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(key) => AppError::StorageNotFound(key),
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            StorageError::ConfigError(msg) => AppError::InvalidArgument(msg),
            StorageError::SourceUnavailable(msg) => {
                AppError::Internal(format!("Source file unavailable: {}", msg))
            }
            StorageError::IoError(e) => AppError::Internal(format!("IO error: {}", e)),
            other => AppError::Storage(other.to_string()),
        }
    }
}

/// A single object write, including the access and encoding flags sent with it.
#[derive(Debug, Clone)]
pub struct PutObject {
    pub bucket: String,
    pub key: String,
    pub body: Bytes,
    pub content_length: u64,
    pub content_type: String,
    /// Canned access control (e.g. `public-read`); empty means unset
    pub visibility: String,
    /// Content disposition (e.g. `attachment`); empty means unset
    pub disposition: String,
    /// Server-side encryption (e.g. `AES256`); empty means unset
    pub encryption: String,
}

/// Payload of a fetched object
#[derive(Debug, Clone)]
pub struct GetObjectOutput {
    pub body: Bytes,
    pub content_length: u64,
}

/// Bucket-scoped blob service
///
/// Implementations must map a missing key on `get` to `StorageError::NotFound`
/// and treat `delete` of a missing key as success.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(&self, request: PutObject) -> StorageResult<()>;

    async fn get(&self, bucket: &str, key: &str) -> StorageResult<GetObjectOutput>;

    async fn delete(&self, bucket: &str, key: &str) -> StorageResult<()>;
}

/// An opened local file: its size and a reader over its bytes.
pub struct SourceFile {
    pub size: u64,
    pub reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
}

/// Opens local files for upload
#[async_trait]
pub trait FileOpener: Send + Sync {
    async fn open(&self, path: &Path) -> StorageResult<SourceFile>;
}

/// `FileOpener` backed by the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileOpener;

#[async_trait]
impl FileOpener for OsFileOpener {
    async fn open(&self, path: &Path) -> StorageResult<SourceFile> {
        let file = tokio::fs::File::open(path).await.map_err(|e| {
            StorageError::SourceUnavailable(format!("{}: {}", path.display(), e))
        })?;
        let size = file
            .metadata()
            .await
            .map_err(|e| StorageError::SourceUnavailable(format!("{}: {}", path.display(), e)))?
            .len();
        Ok(SourceFile {
            size,
            reader: Box::pin(file),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use multimedia_core::ErrorMetadata;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn test_os_file_opener_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("source.txt");
        tokio::fs::write(&path, b"hello").await.unwrap();

        let mut source = OsFileOpener.open(&path).await.unwrap();
        assert_eq!(source.size, 5);
        let mut buf = Vec::new();
        source.reader.read_to_end(&mut buf).await.unwrap();
        assert_eq!(buf, b"hello");
    }

    #[tokio::test]
    async fn test_os_file_opener_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = OsFileOpener.open(&dir.path().join("missing")).await;
        assert!(matches!(result, Err(StorageError::SourceUnavailable(_))));
    }

    #[test]
    fn test_storage_error_conversion_preserves_kind() {
        let not_found: AppError = StorageError::NotFound("a.png".to_string()).into();
        assert!(matches!(not_found, AppError::StorageNotFound(_)));
        assert_eq!(not_found.http_status_code(), 404);

        let upload: AppError = StorageError::UploadFailed("denied".to_string()).into();
        assert!(matches!(upload, AppError::Storage(_)));
        assert_eq!(upload.http_status_code(), 502);

        let key: AppError = StorageError::InvalidKey("..".to_string()).into();
        assert!(matches!(key, AppError::InvalidInput(_)));
    }
}
