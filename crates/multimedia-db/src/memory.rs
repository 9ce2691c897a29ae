//! In-memory metadata store for tests and local development.

use crate::error::{PersistError, PersistResult};
use crate::store::{MetadataStore, Record, RecordKey};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

type Tables = HashMap<String, HashMap<String, Record>>;

#[derive(Clone, Default)]
pub struct InMemoryMetadataStore {
    tables: Arc<Mutex<Tables>>,
    fail_puts: Arc<AtomicBool>,
    fail_gets: Arc<AtomicBool>,
    fail_queries: Arc<AtomicBool>,
    fail_deletes: Arc<AtomicBool>,
    query_calls: Arc<AtomicUsize>,
    put_calls: Arc<AtomicUsize>,
    delete_calls: Arc<AtomicUsize>,
}

impl InMemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_puts(&self, fail: bool) {
        self.fail_puts.store(fail, Ordering::SeqCst);
    }

    pub fn fail_gets(&self, fail: bool) {
        self.fail_gets.store(fail, Ordering::SeqCst);
    }

    pub fn fail_queries(&self, fail: bool) {
        self.fail_queries.store(fail, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Number of `query_by_key_set` calls served so far.
    pub fn query_calls(&self) -> usize {
        self.query_calls.load(Ordering::SeqCst)
    }

    /// Number of `put_record` calls received, failed ones included.
    pub fn put_calls(&self) -> usize {
        self.put_calls.load(Ordering::SeqCst)
    }

    /// Number of `delete_record` calls received, failed ones included.
    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    /// Insert a record directly, bypassing any mapping.
    pub fn insert_raw(&self, table: &str, key: &str, record: Record) {
        self.tables()
            .entry(table.to_string())
            .or_default()
            .insert(key.to_string(), record);
    }

    pub fn record(&self, table: &str, key: &str) -> Option<Record> {
        self.tables()
            .get(table)
            .and_then(|rows| rows.get(key))
            .cloned()
    }

    pub fn count(&self, table: &str) -> usize {
        self.tables().get(table).map(|rows| rows.len()).unwrap_or(0)
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn injected(flag: &AtomicBool, op: &str) -> PersistResult<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(PersistError::Store(format!("injected {} failure", op)));
        }
        Ok(())
    }
}

#[async_trait]
impl MetadataStore for InMemoryMetadataStore {
    async fn put_record(&self, table: &str, key: &RecordKey, record: Record) -> PersistResult<()> {
        self.put_calls.fetch_add(1, Ordering::SeqCst);
        Self::injected(&self.fail_puts, "put")?;
        self.insert_raw(table, &key.value, record);
        Ok(())
    }

    async fn get_record(&self, table: &str, key: &RecordKey) -> PersistResult<Option<Record>> {
        Self::injected(&self.fail_gets, "get")?;
        Ok(self.record(table, &key.value))
    }

    async fn query_by_key_set(
        &self,
        table: &str,
        _attribute: &str,
        values: &[String],
    ) -> PersistResult<Vec<Record>> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        Self::injected(&self.fail_queries, "query")?;
        let tables = self.tables();
        let Some(rows) = tables.get(table) else {
            return Ok(Vec::new());
        };
        // Reverse order, like a store that makes no ordering promise.
        Ok(values
            .iter()
            .rev()
            .filter_map(|value| rows.get(value).cloned())
            .collect())
    }

    async fn delete_record(&self, table: &str, key: &RecordKey) -> PersistResult<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        Self::injected(&self.fail_deletes, "delete")?;
        if let Some(rows) = self.tables().get_mut(table) {
            rows.remove(&key.value);
        }
        Ok(())
    }
}
