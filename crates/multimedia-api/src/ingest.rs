//! Upload ingestion
//!
//! Turns request payloads into local temporary files and hands them to an
//! `Uploader` under a generated destination key. The temporary file is removed
//! when its guard drops, whichever way the upload ends.

use crate::uploader::Uploader;
use axum::extract::Multipart;
use multimedia_core::{AppError, MultimediaAsset};
use multimedia_storage::generate_object_key;
use multimedia_storage::keys::extension_with_dot;
use std::sync::Arc;
use tempfile::NamedTempFile;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};

#[derive(Clone)]
pub struct IngestionAdapter {
    uploader: Arc<dyn Uploader>,
    max_upload_bytes: usize,
}

impl IngestionAdapter {
    pub fn new(uploader: Arc<dyn Uploader>, max_upload_bytes: usize) -> Self {
        Self {
            uploader,
            max_upload_bytes,
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    /// Upload the multipart field named `field_key`. Other fields are skipped.
    pub async fn ingest_multipart(
        &self,
        mut multipart: Multipart,
        field_key: &str,
    ) -> Result<MultimediaAsset, AppError> {
        while let Some(mut field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::InvalidInput(format!("Failed to read multipart: {}", e)))?
        {
            if field.name() != Some(field_key) {
                continue;
            }

            let original_filename = field.file_name().unwrap_or_default().to_string();
            let temp = temp_file_for(&original_filename)?;
            let mut file = tokio::fs::File::from_std(temp.reopen()?);

            let mut written = 0usize;
            while let Some(chunk) = field
                .chunk()
                .await
                .map_err(|e| AppError::InvalidInput(format!("Failed to read file data: {}", e)))?
            {
                written += chunk.len();
                self.check_size(written)?;
                file.write_all(&chunk).await?;
            }
            file.flush().await?;

            tracing::debug!(
                field = %field_key,
                original_filename = %original_filename,
                size_bytes = written,
                "Multipart upload buffered"
            );

            return self.hand_off(&temp, &original_filename).await;
        }

        Err(AppError::InvalidInput(format!(
            "No '{}' field provided",
            field_key
        )))
    }

    /// Upload exactly `declared_len` bytes read from `reader`.
    pub async fn ingest_stream<R>(
        &self,
        reader: R,
        original_filename: &str,
        declared_len: u64,
    ) -> Result<MultimediaAsset, AppError>
    where
        R: AsyncRead + Unpin + Send,
    {
        let declared = usize::try_from(declared_len).unwrap_or(usize::MAX);
        self.check_size(declared)?;

        let temp = temp_file_for(original_filename)?;
        let mut file = tokio::fs::File::from_std(temp.reopen()?);

        let mut limited = reader.take(declared_len);
        let copied = tokio::io::copy(&mut limited, &mut file).await?;
        file.flush().await?;

        if copied < declared_len {
            return Err(AppError::InvalidInput(format!(
                "Stream ended after {} of {} declared bytes",
                copied, declared_len
            )));
        }

        self.hand_off(&temp, original_filename).await
    }

    async fn hand_off(
        &self,
        temp: &NamedTempFile,
        original_filename: &str,
    ) -> Result<MultimediaAsset, AppError> {
        let destination = generate_object_key(original_filename);
        self.uploader.upload(temp.path(), &destination).await
    }

    fn check_size(&self, size: usize) -> Result<(), AppError> {
        if size > self.max_upload_bytes {
            return Err(AppError::PayloadTooLarge(format!(
                "File size exceeds maximum allowed size of {} MB",
                self.max_upload_bytes / 1024 / 1024
            )));
        }
        Ok(())
    }
}

/// Temporary file that keeps the upload's extension as its suffix.
fn temp_file_for(original_filename: &str) -> Result<NamedTempFile, AppError> {
    let suffix = extension_with_dot(original_filename);
    let temp = tempfile::Builder::new()
        .prefix("upload-")
        .suffix(&suffix)
        .tempfile()?;
    Ok(temp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;
    use uuid::Uuid;

    #[derive(Default)]
    struct RecordingUploader {
        seen: Mutex<Vec<(PathBuf, String, Vec<u8>)>>,
        fail: bool,
    }

    impl RecordingUploader {
        fn calls(&self) -> Vec<(PathBuf, String, Vec<u8>)> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Uploader for RecordingUploader {
        async fn upload(
            &self,
            source: &Path,
            destination: &str,
        ) -> Result<MultimediaAsset, AppError> {
            let content = std::fs::read(source).unwrap();
            self.seen.lock().unwrap().push((
                source.to_path_buf(),
                destination.to_string(),
                content,
            ));
            if self.fail {
                return Err(AppError::Storage("bucket unavailable".to_string()));
            }
            Ok(MultimediaAsset::new(
                "https://media.s3.amazonaws.com",
                destination,
                multimedia_core::AssetType::Image,
            )
            .unwrap())
        }

        async fn delete(&self, _id: Uuid) -> Result<(), AppError> {
            Ok(())
        }
    }

    fn adapter(uploader: &Arc<RecordingUploader>, max: usize) -> IngestionAdapter {
        IngestionAdapter::new(uploader.clone(), max)
    }

    #[tokio::test]
    async fn test_ingest_stream_hands_off_temp_file() {
        let uploader = Arc::new(RecordingUploader::default());
        let payload: &[u8] = b"hello world";

        let asset = adapter(&uploader, 1024)
            .ingest_stream(payload, "photo.jpg", payload.len() as u64)
            .await
            .unwrap();

        let calls = uploader.calls();
        assert_eq!(calls.len(), 1);
        let (path, destination, content) = &calls[0];
        assert_eq!(content, payload);
        assert!(path.to_string_lossy().ends_with(".jpg"));
        assert!(destination.ends_with(".jpg"));
        assert_eq!(asset.filename(), destination);
        assert!(!path.exists(), "temp file must be removed after upload");
    }

    #[tokio::test]
    async fn test_ingest_stream_reads_only_declared_length() {
        let uploader = Arc::new(RecordingUploader::default());
        let payload: &[u8] = b"0123456789";

        adapter(&uploader, 1024)
            .ingest_stream(payload, "notes.txt", 4)
            .await
            .unwrap();

        assert_eq!(uploader.calls()[0].2, b"0123".to_vec());
    }

    #[tokio::test]
    async fn test_ingest_stream_short_stream() {
        let uploader = Arc::new(RecordingUploader::default());
        let payload: &[u8] = b"abc";

        let result = adapter(&uploader, 1024)
            .ingest_stream(payload, "a.png", 10)
            .await;

        assert!(matches!(result, Err(AppError::InvalidInput(_))));
        assert!(uploader.calls().is_empty());
    }

    #[tokio::test]
    async fn test_ingest_stream_over_limit() {
        let uploader = Arc::new(RecordingUploader::default());
        let payload: &[u8] = b"0123456789";

        let result = adapter(&uploader, 5)
            .ingest_stream(payload, "a.png", payload.len() as u64)
            .await;

        assert!(matches!(result, Err(AppError::PayloadTooLarge(_))));
        assert!(uploader.calls().is_empty());
    }

    #[tokio::test]
    async fn test_ingest_stream_removes_temp_file_on_failure() {
        let uploader = Arc::new(RecordingUploader {
            fail: true,
            ..Default::default()
        });
        let payload: &[u8] = b"data";

        let result = adapter(&uploader, 1024)
            .ingest_stream(payload, "a.pdf", payload.len() as u64)
            .await;

        assert!(matches!(result, Err(AppError::Storage(_))));
        let (path, _, _) = &uploader.calls()[0];
        assert!(!path.exists());
    }

    #[test]
    fn test_temp_file_suffix() {
        let temp = temp_file_for("archive.tar.gz").unwrap();
        assert!(temp.path().to_string_lossy().ends_with(".gz"));

        let temp = temp_file_for("README").unwrap();
        assert!(temp
            .path()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("upload-"));
    }
}
