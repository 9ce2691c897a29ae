use crate::traits::{GetObjectOutput, ObjectStore, PutObject, StorageError, StorageResult};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{ObjectCannedAcl, ServerSideEncryption};
use aws_sdk_s3::Client;

/// S3 object store
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    /// Create a client from a shared SDK configuration
    ///
    /// # Arguments
    /// * `config` - Loaded AWS configuration (region, credentials, retry policy)
    /// * `endpoint_url` - Optional custom endpoint for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    pub fn new(config: &SdkConfig, endpoint_url: Option<&str>) -> Self {
        let client = match endpoint_url {
            Some(endpoint) => {
                // Path-style addressing is required by most S3-compatible providers
                let s3_config = aws_sdk_s3::config::Builder::from(config)
                    .endpoint_url(endpoint)
                    .force_path_style(true)
                    .build();
                Client::from_conf(s3_config)
            }
            None => Client::new(config),
        };
        Self { client }
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(&self, request: PutObject) -> StorageResult<()> {
        let start = std::time::Instant::now();

        let mut put = self
            .client
            .put_object()
            .bucket(&request.bucket)
            .key(&request.key)
            .body(ByteStream::from(request.body))
            .content_length(request.content_length as i64)
            .content_type(&request.content_type);

        if !request.visibility.is_empty() {
            put = put.acl(ObjectCannedAcl::from(request.visibility.as_str()));
        }
        if !request.disposition.is_empty() {
            put = put.content_disposition(&request.disposition);
        }
        if !request.encryption.is_empty() {
            put = put.server_side_encryption(ServerSideEncryption::from(
                request.encryption.as_str(),
            ));
        }

        put.send().await.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %request.bucket,
                key = %request.key,
                size_bytes = request.content_length,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 upload failed"
            );
            StorageError::UploadFailed(e.to_string())
        })?;

        tracing::debug!(
            bucket = %request.bucket,
            key = %request.key,
            size_bytes = request.content_length,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(())
    }

    async fn get(&self, bucket: &str, key: &str) -> StorageResult<GetObjectOutput> {
        let start = std::time::Instant::now();

        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| match &e {
                SdkError::ServiceError(service_err) => match service_err.err() {
                    GetObjectError::NoSuchKey(_) => StorageError::NotFound(key.to_string()),
                    _ => {
                        tracing::error!(
                            error = %e,
                            bucket = %bucket,
                            key = %key,
                            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                            "S3 download failed"
                        );
                        StorageError::DownloadFailed(e.to_string())
                    }
                },
                _ => {
                    tracing::error!(
                        error = %e,
                        bucket = %bucket,
                        key = %key,
                        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                        "S3 download failed"
                    );
                    StorageError::DownloadFailed(e.to_string())
                }
            })?;

        let reported_length = output.content_length();
        let body = output
            .body
            .collect()
            .await
            .map_err(|e| StorageError::DownloadFailed(e.to_string()))?
            .into_bytes();

        let content_length = reported_length
            .map(|len| len.max(0) as u64)
            .unwrap_or(body.len() as u64);

        tracing::debug!(
            bucket = %bucket,
            key = %key,
            size_bytes = body.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 download successful"
        );

        Ok(GetObjectOutput {
            body,
            content_length,
        })
    }

    async fn delete(&self, bucket: &str, key: &str) -> StorageResult<()> {
        let start = std::time::Instant::now();

        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 delete failed"
                );
                StorageError::DeleteFailed(e.to_string())
            })?;

        tracing::debug!(
            bucket = %bucket,
            key = %key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 delete successful"
        );

        Ok(())
    }
}
