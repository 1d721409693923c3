//! Named cache buckets

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};

use super::CacheError;
use super::worker::Response;

/// Named buckets of URL → response, like the browser's `CacheStorage`.
///
/// Single-threaded: futures are not required to be `Send`.
#[allow(async_fn_in_trait)]
pub trait CacheStorage {
    /// Store every entry in `bucket` (created if missing), all or nothing
    async fn put_all(&self, bucket: &str, entries: Vec<(String, Response)>) -> Result<(), CacheError>;

    /// Cached response for `url` in `bucket`
    async fn lookup(&self, bucket: &str, url: &str) -> Result<Option<Response>, CacheError>;

    /// Names of all existing buckets
    async fn bucket_names(&self) -> Result<Vec<String>, CacheError>;

    /// Delete a bucket, returning whether it existed
    async fn delete_bucket(&self, bucket: &str) -> Result<bool, CacheError>;
}

/// In-memory cache storage
#[derive(Debug, Default)]
pub struct MemoryCacheStorage {
    buckets: RefCell<BTreeMap<String, HashMap<String, Response>>>,
}

impl MemoryCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries in a bucket (0 if it does not exist)
    pub fn entry_count(&self, bucket: &str) -> usize {
        self.buckets.borrow().get(bucket).map_or(0, HashMap::len)
    }
}

impl CacheStorage for MemoryCacheStorage {
    async fn put_all(&self, bucket: &str, entries: Vec<(String, Response)>) -> Result<(), CacheError> {
        self.buckets
            .borrow_mut()
            .entry(bucket.to_string())
            .or_default()
            .extend(entries);
        Ok(())
    }

    async fn lookup(&self, bucket: &str, url: &str) -> Result<Option<Response>, CacheError> {
        Ok(self
            .buckets
            .borrow()
            .get(bucket)
            .and_then(|b| b.get(url))
            .cloned())
    }

    async fn bucket_names(&self) -> Result<Vec<String>, CacheError> {
        Ok(self.buckets.borrow().keys().cloned().collect())
    }

    async fn delete_bucket(&self, bucket: &str) -> Result<bool, CacheError> {
        Ok(self.buckets.borrow_mut().remove(bucket).is_some())
    }
}
