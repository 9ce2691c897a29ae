//! Application setup and initialization
//!
//! Wires configuration into backends, repositories and the router.

pub mod database;
pub mod routes;
pub mod server;
pub mod services;
pub mod storage;

use crate::state::AppState;
use anyhow::Result;
use multimedia_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: &Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_telemetry(config.is_production())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment(),
        storage_backend = %config.storage_backend(),
        metadata_backend = %config.metadata_backend(),
        "Configuration loaded and validated successfully"
    );

    let aws = services::load_shared_aws_config(config).await;
    let objects = storage::setup_object_store(config, aws.as_ref()).await?;
    let metadata = database::setup_metadata_store(config, aws.as_ref()).await?;

    let state = services::initialize_services(config, objects, metadata)?;
    let router = routes::setup_routes(config, state.clone())?;

    Ok((state, router))
}
