//! Seams between the offline lifecycle and its host.
//!
//! The browser implements these over `caches`, `fetch`, and `spawn_local`;
//! tests implement them in memory. All futures are `?Send` because a service
//! worker is single-threaded.

use futures::future::LocalBoxFuture;

use crate::error::WorkerError;

/// Method and URL of an outgoing request.
pub trait RequestInfo {
    fn method(&self) -> String;
    fn url(&self) -> String;

    fn is_get(&self) -> bool {
        self.method().eq_ignore_ascii_case("GET")
    }
}

/// Plain request value for hosts without a native request type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: String,
    pub url: String,
}

impl Request {
    pub fn get(url: &str) -> Self {
        Self { method: "GET".to_owned(), url: url.to_owned() }
    }

    pub fn new(method: &str, url: &str) -> Self {
        Self { method: method.to_owned(), url: url.to_owned() }
    }
}

impl RequestInfo for Request {
    fn method(&self) -> String {
        self.method.clone()
    }

    fn url(&self) -> String {
        self.url.clone()
    }
}

/// A response that can be stored. Bodies are single-use, so storing and
/// returning the same response requires a duplicate.
pub trait CacheableResponse: Sized + 'static {
    fn duplicate(&self) -> Result<Self, WorkerError>;

    /// 2xx status.
    fn is_success(&self) -> bool;
}

/// Named cache stores keyed by request URL.
#[async_trait::async_trait(?Send)]
pub trait CacheStorage: Clone + 'static {
    type Response: CacheableResponse;

    /// Names of every existing store.
    async fn keys(&self) -> Result<Vec<String>, WorkerError>;

    /// Create the store if absent.
    async fn open(&self, name: &str) -> Result<(), WorkerError>;

    /// Returns whether a store was removed.
    async fn delete(&self, name: &str) -> Result<bool, WorkerError>;

    async fn put(&self, name: &str, url: &str, response: Self::Response) -> Result<(), WorkerError>;

    /// Match `url` across all stores.
    async fn lookup(&self, url: &str) -> Result<Option<Self::Response>, WorkerError>;
}

#[async_trait::async_trait(?Send)]
pub trait Network {
    type Request: RequestInfo;
    type Response: CacheableResponse;

    /// Build a GET request for a manifest path.
    fn request(&self, url: &str) -> Result<Self::Request, WorkerError>;

    async fn fetch(&self, request: &Self::Request) -> Result<Self::Response, WorkerError>;
}

/// Runs background work without blocking the response.
pub trait Spawner {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);
}
