#[cfg(feature = "dynamodb")]
use crate::DynamoMetadataStore;
#[cfg(feature = "postgres")]
use crate::PostgresMetadataStore;
use crate::{MetadataStore, PersistError, PersistResult};
use multimedia_core::{Config, MetadataBackend};
use std::sync::Arc;

/// Create a metadata store backend based on configuration
///
/// `sdk_config` is required for the DynamoDB backend and ignored otherwise.
#[cfg(feature = "dynamodb")]
pub async fn create_metadata_store(
    config: &Config,
    sdk_config: Option<&aws_config::SdkConfig>,
) -> PersistResult<Arc<dyn MetadataStore>> {
    match config.metadata_backend() {
        MetadataBackend::DynamoDb => {
            let sdk_config = sdk_config
                .ok_or_else(|| PersistError::Config("AWS configuration not loaded".to_string()))?;
            Ok(Arc::new(DynamoMetadataStore::new(
                sdk_config,
                config.dynamodb_endpoint(),
            )))
        }
        MetadataBackend::Postgres => create_postgres(config).await,
    }
}

#[cfg(not(feature = "dynamodb"))]
pub async fn create_metadata_store(config: &Config) -> PersistResult<Arc<dyn MetadataStore>> {
    match config.metadata_backend() {
        MetadataBackend::DynamoDb => Err(PersistError::Config(
            "DynamoDB backend not available (dynamodb feature not enabled)".to_string(),
        )),
        MetadataBackend::Postgres => create_postgres(config).await,
    }
}

#[cfg(feature = "postgres")]
async fn create_postgres(config: &Config) -> PersistResult<Arc<dyn MetadataStore>> {
    let url = config
        .database_url()
        .ok_or_else(|| PersistError::Config("DATABASE_URL not configured".to_string()))?;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect(url)
        .await
        .map_err(|e| PersistError::Config(format!("Failed to connect to database: {}", e)))?;

    let store = PostgresMetadataStore::new(pool);
    store
        .ensure_tables(&[config.table_name(), config.page_options_table()])
        .await?;

    tracing::info!("Postgres metadata store ready");
    Ok(Arc::new(store))
}

#[cfg(not(feature = "postgres"))]
async fn create_postgres(_config: &Config) -> PersistResult<Arc<dyn MetadataStore>> {
    Err(PersistError::Config(
        "Postgres backend not available (postgres feature not enabled)".to_string(),
    ))
}
