//! Service worker lifecycle: install, activate, fetch

use std::cell::Cell;

use super::CacheError;
use super::manifest::{Manifest, resolve_url};
use super::storage::CacheStorage;

/// Intercepted request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: String,
    pub url: String,
}

impl Request {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: "GET".to_string(),
            url: url.into(),
        }
    }

    /// Only GET requests are answered from the cache
    pub fn is_cacheable(&self) -> bool {
        self.method.eq_ignore_ascii_case("GET")
    }
}

/// Response served to the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn ok(content_type: &str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            content_type: Some(content_type.to_string()),
            body: body.into(),
        }
    }

    /// 2xx status
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Live network access
#[allow(async_fn_in_trait)]
pub trait Network {
    /// Perform the request; `Err` carries the failure reason
    async fn fetch(&self, request: &Request) -> Result<Response, String>;
}

/// Lifecycle state of the worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Registered, not yet installed
    Parsed,
    Installed,
    Activated,
    /// Install failed; the worker will never control pages
    Redundant,
}

/// Offline cache worker
///
/// Methods take `&self` so one instance can serve overlapping events in a
/// single-threaded worker.
pub struct CacheWorker<C, N> {
    manifest: Manifest,
    scope: String,
    caches: C,
    network: N,
    state: Cell<WorkerState>,
}

impl<C: CacheStorage, N: Network> CacheWorker<C, N> {
    pub fn new(manifest: Manifest, scope: &str, caches: C, network: N) -> Self {
        Self {
            manifest,
            scope: scope.to_string(),
            caches,
            network,
            state: Cell::new(WorkerState::Parsed),
        }
    }

    pub fn state(&self) -> WorkerState {
        self.state.get()
    }

    /// Treat a freshly started worker as installed.
    ///
    /// The browser only fires `activate` after a successful install, but it
    /// may have restarted the worker in between, losing in-memory state.
    pub fn resume_installed(&self) {
        if self.state.get() == WorkerState::Parsed {
            self.state.set(WorkerState::Installed);
        }
    }

    pub fn cache_name(&self) -> &str {
        &self.manifest.cache_name
    }

    pub fn caches(&self) -> &C {
        &self.caches
    }

    pub fn network(&self) -> &N {
        &self.network
    }

    /// Fetch every manifest asset and store them in the versioned bucket.
    ///
    /// All or nothing: any network error or non-2xx response aborts the
    /// install before anything is written. Assets are fetched one at a time,
    /// with no retries.
    pub async fn install(&self) -> Result<usize, CacheError> {
        if self.state.get() != WorkerState::Parsed {
            return Err(CacheError::InvalidState {
                operation: "install",
                state: self.state.get(),
            });
        }

        let bucket = self.manifest.cache_name.clone();
        let urls = self.manifest.resolve(&self.scope);
        log::info!("Installing {} assets into `{}`", urls.len(), bucket);

        let mut entries = Vec::with_capacity(urls.len());
        for url in urls {
            let request = Request::get(url.clone());
            let reason = match self.network.fetch(&request).await {
                Ok(response) if response.is_ok() => {
                    entries.push((url, response));
                    continue;
                }
                Ok(response) => format!("HTTP {}", response.status),
                Err(e) => e,
            };
            log::warn!("Install of `{}` failed on {}: {}", bucket, url, reason);
            self.state.set(WorkerState::Redundant);
            return Err(CacheError::Install {
                bucket,
                url,
                reason,
            });
        }

        let count = entries.len();
        if let Err(e) = self.caches.put_all(&bucket, entries).await {
            self.state.set(WorkerState::Redundant);
            return Err(e);
        }
        self.state.set(WorkerState::Installed);
        log::info!("Installed {} assets into `{}`", count, bucket);
        Ok(count)
    }

    /// Delete every bucket other than the current version.
    /// Returns the deleted bucket names.
    pub async fn activate(&self) -> Result<Vec<String>, CacheError> {
        if self.state.get() != WorkerState::Installed {
            return Err(CacheError::InvalidState {
                operation: "activate",
                state: self.state.get(),
            });
        }

        let mut deleted = Vec::new();
        for name in self.caches.bucket_names().await? {
            if name != self.manifest.cache_name && self.caches.delete_bucket(&name).await? {
                log::info!("Deleted stale cache `{}`", name);
                deleted.push(name);
            }
        }
        self.state.set(WorkerState::Activated);
        Ok(deleted)
    }

    /// Answer a request from the cache, falling back to the network.
    ///
    /// Network responses are returned as-is and never stored. A failing
    /// cache lookup is treated as a miss.
    pub async fn handle_fetch(&self, request: &Request) -> Result<Response, CacheError> {
        if request.is_cacheable() {
            let url = resolve_url(&self.scope, &request.url);
            match self.caches.lookup(&self.manifest.cache_name, &url).await {
                Ok(Some(cached)) => {
                    log::debug!("Cache hit: {}", url);
                    return Ok(cached);
                }
                Ok(None) => log::debug!("Cache miss: {}", url),
                Err(e) => log::warn!("Cache lookup for {} failed: {}", url, e),
            }
        }

        self.network
            .fetch(request)
            .await
            .map_err(|reason| CacheError::Network {
                url: request.url.clone(),
                reason,
            })
    }
}
