//! Metadata store abstraction
//!
//! A metadata store holds flat string-valued records in named tables, each
//! addressed by a single key attribute.

use crate::error::PersistResult;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// A stored record: attribute name to string value.
pub type Record = BTreeMap<String, String>;

/// Primary key of a record: the key attribute's name and value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordKey {
    pub attribute: String,
    pub value: String,
}

impl RecordKey {
    pub fn new(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            value: value.into(),
        }
    }
}

/// Key/record service
///
/// `get_record` returns `Ok(None)` for a missing key. `query_by_key_set`
/// returns whichever of the requested records exist, in no particular order.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    async fn put_record(&self, table: &str, key: &RecordKey, record: Record) -> PersistResult<()>;

    async fn get_record(&self, table: &str, key: &RecordKey) -> PersistResult<Option<Record>>;

    async fn query_by_key_set(
        &self,
        table: &str,
        attribute: &str,
        values: &[String],
    ) -> PersistResult<Vec<Record>>;

    async fn delete_record(&self, table: &str, key: &RecordKey) -> PersistResult<()>;
}
