//! In-memory object store for tests and local development.
//!
//! Each operation can be made to fail on demand so callers can exercise their
//! error paths without a live backend.

use crate::traits::{GetObjectOutput, ObjectStore, PutObject, StorageError, StorageResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

type ObjectMap = HashMap<(String, String), PutObject>;

#[derive(Clone, Default)]
pub struct InMemoryObjectStore {
    objects: Arc<Mutex<ObjectMap>>,
    last_put: Arc<Mutex<Option<PutObject>>>,
    fail_puts: Arc<AtomicBool>,
    fail_gets: Arc<AtomicBool>,
    fail_deletes: Arc<AtomicBool>,
    put_calls: Arc<AtomicUsize>,
    delete_calls: Arc<AtomicUsize>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_puts(&self, fail: bool) {
        self.fail_puts.store(fail, Ordering::SeqCst);
    }

    pub fn fail_gets(&self, fail: bool) {
        self.fail_gets.store(fail, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    pub fn contains(&self, bucket: &str, key: &str) -> bool {
        self.objects()
            .contains_key(&(bucket.to_string(), key.to_string()))
    }

    pub fn len(&self) -> usize {
        self.objects().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects().is_empty()
    }

    /// Number of `put` calls received, failed ones included.
    pub fn put_calls(&self) -> usize {
        self.put_calls.load(Ordering::SeqCst)
    }

    /// Number of `delete` calls received, failed ones included.
    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    /// The most recent successful write, including its policy flags.
    pub fn last_put(&self) -> Option<PutObject> {
        self.last_put
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn objects(&self) -> MutexGuard<'_, ObjectMap> {
        self.objects
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn put(&self, request: PutObject) -> StorageResult<()> {
        self.put_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed(format!(
                "injected put failure for {}",
                request.key
            )));
        }
        self.objects().insert(
            (request.bucket.clone(), request.key.clone()),
            request.clone(),
        );
        *self
            .last_put
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(request);
        Ok(())
    }

    async fn get(&self, bucket: &str, key: &str) -> StorageResult<GetObjectOutput> {
        if self.fail_gets.load(Ordering::SeqCst) {
            return Err(StorageError::DownloadFailed(format!(
                "injected get failure for {}",
                key
            )));
        }
        self.objects()
            .get(&(bucket.to_string(), key.to_string()))
            .map(|object| GetObjectOutput {
                body: object.body.clone(),
                content_length: object.content_length,
            })
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn delete(&self, bucket: &str, key: &str) -> StorageResult<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StorageError::DeleteFailed(format!(
                "injected delete failure for {}",
                key
            )));
        }
        self.objects()
            .remove(&(bucket.to_string(), key.to_string()));
        Ok(())
    }
}
