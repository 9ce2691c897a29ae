//! Multimedia Core Library
//!
//! This crate provides the asset data model and its validation rules, the unified
//! error type, and configuration shared by every multimedia component.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;
pub mod validation;

// Re-export commonly used types
pub use config::{BaseConfig, ClassifierKind, Config, ServiceConfig, UploaderConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{AssetType, MultimediaAsset, PageOption, PageOptionBody};
pub use storage_types::{MetadataBackend, ObjectPolicy, StorageBackend};
pub use validation::{FieldViolation, ValidationError};
