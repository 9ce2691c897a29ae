//! Multimedia Metadata Library
//!
//! This crate provides the metadata store abstraction with DynamoDB, Postgres
//! and in-memory backends, plus the repositories built on it: assets keyed by
//! UUID and page options keyed by name.

#[cfg(feature = "dynamodb")]
pub mod dynamodb;
pub mod error;
pub mod factory;
pub mod mapping;
pub mod memory;
pub mod page_options;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod repository;
pub mod store;

// Re-export commonly used types
#[cfg(feature = "dynamodb")]
pub use dynamodb::DynamoMetadataStore;
pub use error::{PersistError, PersistResult};
pub use factory::create_metadata_store;
pub use memory::InMemoryMetadataStore;
pub use page_options::{MetadataPageOptionRepository, PageOptionRepository};
#[cfg(feature = "postgres")]
pub use postgres::PostgresMetadataStore;
pub use repository::{AssetRepository, FindManyResult, MetadataAssetRepository};
pub use store::{MetadataStore, Record, RecordKey};
