//! Offline cache worker
//!
//! Pre-caches a fixed asset manifest on install and answers intercepted
//! requests cache-first. Cache storage and network are injected async
//! traits: [`MemoryCacheStorage`] backs tests and native use, and on wasm32
//! the `web` module wraps the Cache API and `fetch` of the service worker.

pub mod manifest;
pub mod storage;
#[cfg(target_arch = "wasm32")]
pub mod web;
pub mod worker;

pub use manifest::{CACHE_NAME, Manifest};
pub use storage::{CacheStorage, MemoryCacheStorage};
pub use worker::{CacheWorker, Network, Request, Response, WorkerState};

use thiserror::Error;

/// Cache worker failure
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CacheError {
    /// An asset could not be fetched during install; nothing was cached
    #[error("install of `{bucket}` aborted: {url}: {reason}")]
    Install {
        bucket: String,
        url: String,
        reason: String,
    },
    /// Cache miss and the network request failed
    #[error("network request for {url} failed: {reason}")]
    Network { url: String, reason: String },
    /// Cache backend rejected an operation
    #[error("cache storage error: {0}")]
    Storage(String),
    /// Lifecycle step called out of order
    #[error("cannot {operation} a worker in state {state:?}")]
    InvalidState {
        operation: &'static str,
        state: WorkerState,
    },
}
