//! Service worker glue: `CacheStorage`, `fetch`, and the lifecycle events.

use std::rc::Rc;

use futures::future::LocalBoxFuture;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, future_to_promise, spawn_local};
use web_sys::{Event, ExtendableEvent, FetchEvent, ServiceWorkerGlobalScope};

use crate::cache::{CacheStorage, CacheableResponse, Network, RequestInfo, Spawner};
use crate::config::WorkerConfig;
use crate::error::WorkerError;
use crate::lifecycle::OfflineCache;

type BrowserWorker = OfflineCache<BrowserCaches, BrowserNetwork, LocalSpawner>;

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

fn storage_error(value: JsValue) -> WorkerError {
    WorkerError::Storage(describe(&value))
}

impl RequestInfo for web_sys::Request {
    fn method(&self) -> String {
        web_sys::Request::method(self)
    }

    fn url(&self) -> String {
        web_sys::Request::url(self)
    }
}

impl CacheableResponse for web_sys::Response {
    fn duplicate(&self) -> Result<Self, WorkerError> {
        web_sys::Response::clone(self).map_err(|e| WorkerError::Clone(describe(&e)))
    }

    fn is_success(&self) -> bool {
        self.ok()
    }
}

#[derive(Clone)]
pub struct BrowserCaches {
    caches: web_sys::CacheStorage,
}

impl BrowserCaches {
    async fn cache(&self, name: &str) -> Result<web_sys::Cache, WorkerError> {
        JsFuture::from(self.caches.open(name)).await.map_err(storage_error)?.dyn_into().map_err(storage_error)
    }
}

#[async_trait::async_trait(?Send)]
impl CacheStorage for BrowserCaches {
    type Response = web_sys::Response;

    async fn keys(&self) -> Result<Vec<String>, WorkerError> {
        let keys = JsFuture::from(self.caches.keys()).await.map_err(storage_error)?;
        Ok(js_sys::Array::from(&keys).iter().filter_map(|k| k.as_string()).collect())
    }

    async fn open(&self, name: &str) -> Result<(), WorkerError> {
        self.cache(name).await.map(|_| ())
    }

    async fn delete(&self, name: &str) -> Result<bool, WorkerError> {
        let removed = JsFuture::from(self.caches.delete(name)).await.map_err(storage_error)?;
        Ok(removed.as_bool().unwrap_or(false))
    }

    async fn put(&self, name: &str, url: &str, response: web_sys::Response) -> Result<(), WorkerError> {
        let cache = self.cache(name).await?;
        JsFuture::from(cache.put_with_str(url, &response)).await.map_err(storage_error)?;
        Ok(())
    }

    async fn lookup(&self, url: &str) -> Result<Option<web_sys::Response>, WorkerError> {
        let found = JsFuture::from(self.caches.match_with_str(url)).await.map_err(storage_error)?;
        if found.is_undefined() {
            return Ok(None);
        }
        found.dyn_into::<web_sys::Response>().map(Some).map_err(storage_error)
    }
}

#[derive(Clone)]
pub struct BrowserNetwork {
    scope: ServiceWorkerGlobalScope,
}

#[async_trait::async_trait(?Send)]
impl Network for BrowserNetwork {
    type Request = web_sys::Request;
    type Response = web_sys::Response;

    fn request(&self, url: &str) -> Result<web_sys::Request, WorkerError> {
        web_sys::Request::new_with_str(url).map_err(|e| WorkerError::Request(describe(&e)))
    }

    async fn fetch(&self, request: &web_sys::Request) -> Result<web_sys::Response, WorkerError> {
        let network_error = |e: JsValue| WorkerError::Network(describe(&e));
        JsFuture::from(self.scope.fetch_with_request(request))
            .await
            .map_err(network_error)?
            .dyn_into()
            .map_err(network_error)
    }
}

#[derive(Clone, Copy)]
pub struct LocalSpawner;

impl Spawner for LocalSpawner {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        spawn_local(task);
    }
}

fn listen(scope: &ServiceWorkerGlobalScope, kind: &str, handler: impl FnMut(Event) + 'static) {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    if let Err(e) = scope.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref()) {
        log::warn!("could not listen for {kind}: {}", describe(&e));
    }
    closure.forget();
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

fn into_js(result: Result<impl Into<JsValue>, WorkerError>) -> Result<JsValue, JsValue> {
    result.map(Into::into).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Bind install, activate, and fetch handlers to `scope`.
pub fn register(scope: &ServiceWorkerGlobalScope) -> Result<(), WorkerError> {
    let caches = scope.caches().map_err(storage_error)?;
    let config = WorkerConfig::from_build_env();
    log::info!("offline worker {} with {} assets", config.cache_version, config.assets.len());

    let storage = BrowserCaches { caches };
    let network = BrowserNetwork { scope: scope.clone() };
    let worker: Rc<BrowserWorker> = Rc::new(OfflineCache::new(config, storage, network, LocalSpawner));

    let installing = Rc::clone(&worker);
    listen(scope, "install", move |event| {
        let event: ExtendableEvent = event.unchecked_into();
        let worker = Rc::clone(&installing);
        let done = future_to_promise(async move { into_js(worker.install().await.map(count)) });
        let _ = event.wait_until(&done);
    });

    let activating = Rc::clone(&worker);
    listen(scope, "activate", move |event| {
        let event: ExtendableEvent = event.unchecked_into();
        let worker = Rc::clone(&activating);
        let done = future_to_promise(async move {
            let deleted = worker.activate().await;
            into_js(deleted.map(|names| count(names.len())))
        });
        let _ = event.wait_until(&done);
    });

    listen(scope, "fetch", move |event| {
        let event: FetchEvent = event.unchecked_into();
        let request = event.request();
        if !worker.intercepts(&request) {
            return;
        }
        let worker = Rc::clone(&worker);
        let response = future_to_promise(async move {
            let outcome = worker.fetch(&request).await;
            Ok(outcome.into_response().map_or(JsValue::UNDEFINED, JsValue::from))
        });
        if let Err(e) = event.respond_with(&response) {
            log::warn!("respondWith failed: {}", describe(&e));
        }
    });

    Ok(())
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let Ok(scope) = js_sys::global().dyn_into::<ServiceWorkerGlobalScope>() else {
        log::debug!("not running in a service worker scope");
        return;
    };
    if let Err(e) = register(&scope) {
        log::error!("offline worker disabled: {e}");
    }
}
