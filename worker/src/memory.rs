//! In-memory host for tests.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::rc::Rc;

use futures::future::LocalBoxFuture;

use crate::cache::{CacheStorage, CacheableResponse, Network, Request, Spawner};
use crate::error::WorkerError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeResponse {
    pub status: u16,
    pub body: String,
}

impl FakeResponse {
    pub fn ok(body: &str) -> Self {
        Self { status: 200, body: body.to_owned() }
    }

    pub fn status(status: u16) -> Self {
        Self { status, body: String::new() }
    }
}

impl CacheableResponse for FakeResponse {
    fn duplicate(&self) -> Result<Self, WorkerError> {
        Ok(self.clone())
    }

    fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

type Stores = BTreeMap<String, BTreeMap<String, FakeResponse>>;

#[derive(Clone, Default)]
pub struct MemoryCaches {
    stores: Rc<RefCell<Stores>>,
    failing_lookups: Rc<Cell<bool>>,
    failing_puts: Rc<RefCell<HashSet<String>>>,
}

impl MemoryCaches {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, name: &str, url: &str, response: FakeResponse) {
        self.stores.borrow_mut().entry(name.to_owned()).or_default().insert(url.to_owned(), response);
    }

    pub fn names(&self) -> Vec<String> {
        self.stores.borrow().keys().cloned().collect()
    }

    pub fn entry(&self, name: &str, url: &str) -> Option<FakeResponse> {
        self.stores.borrow().get(name).and_then(|s| s.get(url)).cloned()
    }

    pub fn len(&self, name: &str) -> usize {
        self.stores.borrow().get(name).map_or(0, BTreeMap::len)
    }

    pub fn fail_lookups(&self, fail: bool) {
        self.failing_lookups.set(fail);
    }

    /// Reject every `put` of `url`.
    pub fn fail_put(&self, url: &str) {
        self.failing_puts.borrow_mut().insert(url.to_owned());
    }
}

#[async_trait::async_trait(?Send)]
impl CacheStorage for MemoryCaches {
    type Response = FakeResponse;

    async fn keys(&self) -> Result<Vec<String>, WorkerError> {
        Ok(self.names())
    }

    async fn open(&self, name: &str) -> Result<(), WorkerError> {
        self.stores.borrow_mut().entry(name.to_owned()).or_default();
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<bool, WorkerError> {
        Ok(self.stores.borrow_mut().remove(name).is_some())
    }

    async fn put(&self, name: &str, url: &str, response: FakeResponse) -> Result<(), WorkerError> {
        if self.failing_puts.borrow().contains(url) {
            return Err(WorkerError::Storage(format!("quota exceeded for {url}")));
        }
        self.seed(name, url, response);
        Ok(())
    }

    async fn lookup(&self, url: &str) -> Result<Option<FakeResponse>, WorkerError> {
        if self.failing_lookups.get() {
            return Err(WorkerError::Storage("lookup unavailable".to_owned()));
        }
        Ok(self.stores.borrow().values().find_map(|s| s.get(url)).cloned())
    }
}

/// Serves registered routes; everything else is a network error.
#[derive(Clone)]
pub struct FakeNetwork {
    routes: Rc<RefCell<HashMap<String, FakeResponse>>>,
    online: Rc<Cell<bool>>,
    calls: Rc<RefCell<Vec<String>>>,
}

impl Default for FakeNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeNetwork {
    pub fn new() -> Self {
        Self { routes: Rc::default(), online: Rc::new(Cell::new(true)), calls: Rc::default() }
    }

    pub fn serve(&self, url: &str, response: FakeResponse) -> &Self {
        self.routes.borrow_mut().insert(url.to_owned(), response);
        self
    }

    pub fn set_online(&self, online: bool) {
        self.online.set(online);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

#[async_trait::async_trait(?Send)]
impl Network for FakeNetwork {
    type Request = Request;
    type Response = FakeResponse;

    fn request(&self, url: &str) -> Result<Request, WorkerError> {
        Ok(Request::get(url))
    }

    async fn fetch(&self, request: &Request) -> Result<FakeResponse, WorkerError> {
        self.calls.borrow_mut().push(format!("{} {}", request.method, request.url));
        if !self.online.get() {
            return Err(WorkerError::Network("offline".to_owned()));
        }
        self.routes
            .borrow()
            .get(&request.url)
            .cloned()
            .ok_or_else(|| WorkerError::Network(format!("no route to {}", request.url)))
    }
}

/// Queues spawned work until the test drains it.
#[derive(Clone, Default)]
pub struct QueueSpawner {
    queue: Rc<RefCell<Vec<LocalBoxFuture<'static, ()>>>>,
}

impl QueueSpawner {
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    pub async fn drain(&self) {
        let tasks: Vec<_> = self.queue.borrow_mut().drain(..).collect();
        for task in tasks {
            task.await;
        }
    }
}

impl Spawner for QueueSpawner {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        self.queue.borrow_mut().push(task);
    }
}
