//! Multimedia Storage Library
//!
//! This crate provides the object store abstraction, its S3, local filesystem
//! and in-memory backends, and the `ObjectStorageAdapter` that writes local files
//! into one bucket under a fixed write policy.
//!
//! # Object keys
//!
//! Keys are flat names of the form `{YYYYmmddHHMMSS}-{random}{.ext}`. Keys must
//! not be empty or contain `..` or a leading `/`; generation and validation live
//! in the `keys` module so all backends agree.

pub mod adapter;
pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod memory;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod sniff;
pub mod traits;

// Re-export commonly used types
pub use adapter::{ObjectStorageAdapter, StoredObject};
pub use factory::create_object_store;
pub use keys::generate_object_key;
#[cfg(feature = "storage-local")]
pub use local::LocalObjectStore;
pub use memory::InMemoryObjectStore;
pub use multimedia_core::{ObjectPolicy, StorageBackend};
#[cfg(feature = "storage-s3")]
pub use s3::S3ObjectStore;
pub use sniff::detect_content_type;
pub use traits::{
    FileOpener, GetObjectOutput, ObjectStore, OsFileOpener, PutObject, SourceFile, StorageError,
    StorageResult,
};
