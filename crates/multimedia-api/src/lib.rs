//! Multimedia API Library
//!
//! This crate provides the upload orchestrator, the ingestion adapter, the HTTP
//! handlers and application setup.

mod api_doc;
pub mod classifier;
pub mod constants;
mod handlers;
pub mod ingest;
pub mod setup;
mod telemetry;
pub mod uploader;

pub mod error;
pub mod state;

// Re-exports
pub use api_doc::ApiDoc;
pub use classifier::{AssetClassifier, FixedClassifier, SniffingClassifier};
pub use error::{ErrorResponse, HttpAppError};
pub use ingest::IngestionAdapter;
pub use uploader::{bucket_url, AssetUploader, Uploader};
