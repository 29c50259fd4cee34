//! The offline worker: precache loader, request interceptor, and the
//! lifecycle facade the platform adapter drives.
//!
//! `Worker` bundles the two cache stores, the configuration, and the network
//! seam, and maps the three lifecycle events onto them: `install` pre-warms
//! the stores, `activate` purges stale store generations, and `handle` runs
//! one request through the interceptor, spawning any deferred work it
//! returns.

pub mod classify;
pub mod fallback;
pub mod fetcher;
pub mod interceptor;
pub mod precache;
pub mod request;
pub mod urlfix;

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;

use crate::cache::{lifecycle, CacheStore};
use crate::config::WorkerConfig;
use fetcher::Fetcher;
use interceptor::Outcome;
use request::{Request, Response};

pub struct Worker<F: Fetcher> {
    config: Arc<WorkerConfig>,
    static_store: CacheStore,
    scripture_store: CacheStore,
    fetcher: F,
    // Deferred work from handled requests; kept alive until drained,
    // mirroring the platform's waitUntil contract.
    tasks: tokio::sync::Mutex<tokio::task::JoinSet<()>>,
}

impl<F: Fetcher> Worker<F> {
    /// Open (or create) both current-generation stores under the configured
    /// cache root.
    pub fn open(config: WorkerConfig, fetcher: F) -> Result<Self> {
        let static_store = CacheStore::open(&config.cache_root, &config.static_store_name)?;
        let scripture_store = CacheStore::open(&config.cache_root, &config.scripture_store_name)?;
        Ok(Self {
            config: Arc::new(config),
            static_store,
            scripture_store,
            fetcher,
            tasks: tokio::sync::Mutex::new(tokio::task::JoinSet::new()),
        })
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    pub fn static_store(&self) -> &CacheStore {
        &self.static_store
    }

    pub fn scripture_store(&self) -> &CacheStore {
        &self.scripture_store
    }

    /// Install step: pre-cache the application shell and the scripture
    /// working set.
    pub async fn install(&self) -> Result<()> {
        precache::install(
            &self.static_store,
            &self.scripture_store,
            &self.fetcher,
            &self.config,
        )
        .await
    }

    /// Activation step: delete every store generation other than the two
    /// current ones. Returns the deleted store names.
    pub fn activate(&self) -> Result<Vec<String>> {
        lifecycle::activate(&self.config.cache_root, &self.config.store_names())
    }

    /// Run one request through the interceptor. `None` means the request is
    /// not intercepted and should proceed to the network as issued. Deferred
    /// work is spawned onto the runtime, mirroring the platform's
    /// keep-alive contract.
    pub async fn handle(&self, req: Request) -> Option<Response> {
        let outcome = interceptor::handle(
            req,
            self.static_store.clone(),
            self.scripture_store.clone(),
            self.fetcher.clone(),
            self.config.clone(),
            Utc::now().timestamp_millis(),
        )
        .await;

        match outcome {
            Outcome::Passthrough => None,
            Outcome::Respond(served) => {
                if let Some(background) = served.background {
                    self.tasks.lock().await.spawn(background);
                }
                Some(served.response)
            }
        }
    }

    /// Wait for all outstanding deferred work (refreshes, cache warm-ups)
    /// to finish.
    pub async fn drain(&self) {
        let mut tasks = self.tasks.lock().await;
        while tasks.join_next().await.is_some() {}
    }
}
