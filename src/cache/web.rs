//! Service worker backends: the Cache API and `fetch`

use js_sys::{Array, Object, Promise, Uint8Array};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Cache, Headers, RequestInit, ResponseInit, WorkerGlobalScope};

use super::CacheError;
use super::storage::CacheStorage;
use super::worker::{Network, Request, Response};

fn js_error(e: JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{e:?}"))
}

async fn settle(promise: Promise) -> Result<JsValue, String> {
    JsFuture::from(promise).await.map_err(js_error)
}

/// Global scope of the running worker
pub fn worker_scope() -> Result<WorkerGlobalScope, CacheError> {
    js_sys::global()
        .dyn_into::<WorkerGlobalScope>()
        .map_err(|_| CacheError::Storage("not running in a worker".to_string()))
}

/// Directory of the worker script, which manifest paths are relative to
pub fn script_directory(scope: &WorkerGlobalScope) -> String {
    let href = scope.location().href();
    match href.rfind('/') {
        Some(i) => href[..=i].to_string(),
        None => href,
    }
}

/// Copy a browser response into an owned [`Response`]
pub async fn read_response(response: web_sys::Response) -> Result<Response, String> {
    let status = response.status();
    let content_type = response.headers().get("content-type").ok().flatten();
    let buffer = settle(response.array_buffer().map_err(js_error)?).await?;
    Ok(Response {
        status,
        content_type,
        body: Uint8Array::new(&buffer).to_vec(),
    })
}

/// Build a browser response from an owned [`Response`]
pub fn to_web_response(response: &Response) -> Result<web_sys::Response, JsValue> {
    let headers = Headers::new()?;
    if let Some(content_type) = &response.content_type {
        headers.set("content-type", content_type)?;
    }
    let init = ResponseInit::new();
    init.set_status(response.status);
    init.set_headers(&headers);
    let bytes = Uint8Array::from(response.body.as_slice());
    let body: &Object = &bytes;
    web_sys::Response::new_with_opt_buffer_source_and_init(Some(body), &init)
}

/// `self.caches` of the service worker
pub struct WebCacheStorage {
    caches: web_sys::CacheStorage,
}

impl WebCacheStorage {
    pub fn from_scope(scope: &WorkerGlobalScope) -> Result<Self, CacheError> {
        let caches = scope
            .caches()
            .map_err(|e| CacheError::Storage(js_error(e)))?;
        Ok(Self { caches })
    }

    async fn open(&self, bucket: &str) -> Result<Cache, CacheError> {
        settle(self.caches.open(bucket))
            .await
            .map_err(CacheError::Storage)?
            .dyn_into::<Cache>()
            .map_err(|_| CacheError::Storage(format!("`{bucket}` is not a cache")))
    }
}

impl CacheStorage for WebCacheStorage {
    async fn put_all(&self, bucket: &str, entries: Vec<(String, Response)>) -> Result<(), CacheError> {
        // Build every response first so a bad entry writes nothing
        let mut prepared = Vec::with_capacity(entries.len());
        for (url, response) in &entries {
            let web = to_web_response(response).map_err(|e| CacheError::Storage(js_error(e)))?;
            prepared.push((url, web));
        }

        let cache = self.open(bucket).await?;
        for (url, web) in prepared {
            if let Err(e) = settle(cache.put_with_str(url, &web)).await {
                // Roll back the partial bucket
                let _ = settle(self.caches.delete(bucket)).await;
                return Err(CacheError::Storage(e));
            }
        }
        Ok(())
    }

    async fn lookup(&self, bucket: &str, url: &str) -> Result<Option<Response>, CacheError> {
        let cache = self.open(bucket).await?;
        let found = settle(cache.match_with_str(url))
            .await
            .map_err(CacheError::Storage)?;
        if found.is_undefined() {
            return Ok(None);
        }
        let response = found
            .dyn_into::<web_sys::Response>()
            .map_err(|_| CacheError::Storage("cache returned a non-response".to_string()))?;
        read_response(response)
            .await
            .map(Some)
            .map_err(CacheError::Storage)
    }

    async fn bucket_names(&self) -> Result<Vec<String>, CacheError> {
        let keys = settle(self.caches.keys())
            .await
            .map_err(CacheError::Storage)?;
        Ok(Array::from(&keys).iter().filter_map(|k| k.as_string()).collect())
    }

    async fn delete_bucket(&self, bucket: &str) -> Result<bool, CacheError> {
        let deleted = settle(self.caches.delete(bucket))
            .await
            .map_err(CacheError::Storage)?;
        Ok(deleted.as_bool().unwrap_or(false))
    }
}

/// `fetch` from the service worker scope
pub struct WebNetwork {
    scope: WorkerGlobalScope,
}

impl WebNetwork {
    pub fn new(scope: WorkerGlobalScope) -> Self {
        Self { scope }
    }
}

impl Network for WebNetwork {
    async fn fetch(&self, request: &Request) -> Result<Response, String> {
        let init = RequestInit::new();
        init.set_method(&request.method);
        let value = settle(self.scope.fetch_with_str_and_init(&request.url, &init)).await?;
        let response = value
            .dyn_into::<web_sys::Response>()
            .map_err(|_| "fetch did not return a response".to_string())?;
        read_response(response).await
    }
}

