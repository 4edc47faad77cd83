//! Install, activate, and fetch handling for the offline cache.
//!
//! `OfflineCache` holds no browser types. Install seeds the current
//! versioned store with every manifest asset or fails as a whole. Activate
//! deletes every store whose name differs from the current version. Fetch
//! serves GET requests cache-first; a miss goes to the network and every
//! response it resolves, opaque and error statuses included, is written
//! through to the current store in the background.

use std::cell::Cell;

use futures::future::try_join_all;

use crate::cache::{CacheStorage, CacheableResponse, Network, RequestInfo, Spawner};
use crate::config::WorkerConfig;
use crate::error::WorkerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkerState {
    #[default]
    Installing,
    Activating,
    Active,
}

/// Where a fetch response came from.
#[derive(Debug, PartialEq, Eq)]
pub enum FetchOutcome<R> {
    Cached(R),
    Network(R),
    /// Cache miss with the network unreachable; the request gets no response.
    Offline,
}

impl<R> FetchOutcome<R> {
    pub fn into_response(self) -> Option<R> {
        match self {
            Self::Cached(r) | Self::Network(r) => Some(r),
            Self::Offline => None,
        }
    }
}

pub struct OfflineCache<S, N, P> {
    config: WorkerConfig,
    storage: S,
    network: N,
    spawner: P,
    state: Cell<WorkerState>,
}

impl<S, N, P> OfflineCache<S, N, P>
where
    S: CacheStorage,
    N: Network<Response = S::Response>,
    P: Spawner,
{
    pub fn new(config: WorkerConfig, storage: S, network: N, spawner: P) -> Self {
        Self { config, storage, network, spawner, state: Cell::new(WorkerState::Installing) }
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    pub fn state(&self) -> WorkerState {
        self.state.get()
    }

    /// Only GET requests are served from the cache.
    pub fn intercepts(&self, request: &N::Request) -> bool {
        request.is_get()
    }

    /// Seed the current store with the manifest. Every asset is fetched
    /// before anything is written, so a failed fetch leaves the store
    /// untouched; a failed write discards the store. Returns the number of
    /// assets cached.
    pub async fn install(&self) -> Result<usize, WorkerError> {
        self.state.set(WorkerState::Installing);
        let version = &self.config.cache_version;
        self.storage.open(version).await?;

        let fetches = self.config.assets.iter().map(|url| self.fetch_asset(url));
        let responses = try_join_all(fetches).await.inspect_err(|e| log::warn!("install of {version} failed: {e}"))?;

        let count = responses.len();
        let puts = self.config.assets.iter().zip(responses).map(|(url, response)| self.storage.put(version, url, response));
        if let Err(e) = try_join_all(puts).await {
            log::warn!("install of {version} failed while storing: {e}");
            if let Err(cleanup) = self.storage.delete(version).await {
                log::warn!("could not discard partial {version}: {cleanup}");
            }
            return Err(e);
        }
        log::info!("installed {count} assets into {version}");
        Ok(count)
    }

    async fn fetch_asset(&self, url: &str) -> Result<S::Response, WorkerError> {
        let install_error = |reason: String| WorkerError::Install { url: url.to_owned(), reason };
        let request = self.network.request(url).map_err(|e| install_error(e.to_string()))?;
        let response = self.network.fetch(&request).await.map_err(|e| install_error(e.to_string()))?;
        if !response.is_success() {
            return Err(install_error("non-success status".to_owned()));
        }
        Ok(response)
    }

    /// Delete every store other than the current version. Returns the
    /// deleted names.
    pub async fn activate(&self) -> Result<Vec<String>, WorkerError> {
        self.state.set(WorkerState::Activating);
        let version = &self.config.cache_version;
        let stale: Vec<String> = self.storage.keys().await?.into_iter().filter(|name| name != version).collect();

        try_join_all(stale.iter().map(|name| self.storage.delete(name))).await?;
        for name in &stale {
            log::info!("deleted stale cache {name}");
        }
        self.state.set(WorkerState::Active);
        Ok(stale)
    }

    /// Answer a request. Non-GET requests pass straight to the network and
    /// are never cached.
    pub async fn fetch(&self, request: &N::Request) -> FetchOutcome<S::Response> {
        if !self.intercepts(request) {
            return match self.network.fetch(request).await {
                Ok(response) => FetchOutcome::Network(response),
                Err(e) => {
                    log::debug!("{} {} failed: {e}", request.method(), request.url());
                    FetchOutcome::Offline
                }
            };
        }

        let url = request.url();
        match self.storage.lookup(&url).await {
            Ok(Some(hit)) => return FetchOutcome::Cached(hit),
            Ok(None) => {}
            Err(e) => log::debug!("cache lookup for {url} failed, treating as miss: {e}"),
        }

        match self.network.fetch(request).await {
            Ok(response) => {
                self.write_through(url, &response);
                FetchOutcome::Network(response)
            }
            Err(e) => {
                log::debug!("{url} unavailable offline: {e}");
                FetchOutcome::Offline
            }
        }
    }

    fn write_through(&self, url: String, response: &S::Response) {
        let copy = match response.duplicate() {
            Ok(copy) => copy,
            Err(e) => {
                log::warn!("not caching {url}: {e}");
                return;
            }
        };
        let storage = self.storage.clone();
        let version = self.config.cache_version.clone();
        self.spawner.spawn(Box::pin(async move {
            if let Err(e) = storage.put(&version, &url, copy).await {
                log::warn!("write-through for {url} failed: {e}");
            }
        }));
    }
}

#[cfg(test)]
#[path = "lifecycle_test.rs"]
mod lifecycle_test;
