//! Runtime decision engine invoked per outgoing request.
//!
//! Scripture requests are served cache-first; an API-host hit additionally
//! triggers a fire-and-forget refresh whose outcome the caller never
//! observes. Whitelisted static assets race a no-store network fetch
//! against the cache lookup, preferring the network result and warming the
//! store with it. Everything else passes through untouched.
//!
//! Deferred work (refresh, cache warm-up) is returned to the adapter as a
//! boxed future rather than spawned here, so tests can await it directly.

use std::sync::Arc;

use futures::future::{self, BoxFuture, Either, FutureExt};
use reqwest::Url;
use tracing::{debug, warn};

use crate::api::FetchError;
use crate::cache::CacheStore;
use crate::config::WorkerConfig;
use crate::worker::classify::{classify, RequestClass};
use crate::worker::fallback;
use crate::worker::fetcher::Fetcher;
use crate::worker::request::{Request, Response};
use crate::worker::urlfix::fixed_url;

/// A response plus any deferred work the platform should keep alive until
/// completion.
pub struct Served {
    pub response: Response,
    pub background: Option<BoxFuture<'static, ()>>,
}

impl Served {
    fn immediate(response: Response) -> Self {
        Self {
            response,
            background: None,
        }
    }
}

pub enum Outcome {
    /// The request is not intercepted and proceeds to the network as issued.
    Passthrough,
    Respond(Served),
}

pub async fn handle<F: Fetcher>(
    req: Request,
    static_store: CacheStore,
    scripture_store: CacheStore,
    fetcher: F,
    config: Arc<WorkerConfig>,
    now_ms: i64,
) -> Outcome {
    match classify(&req.url, &config) {
        RequestClass::Unhandled => Outcome::Passthrough,
        RequestClass::ScriptureData => {
            Outcome::Respond(handle_scripture(req, scripture_store, fetcher, config).await)
        }
        RequestClass::StaticWhitelisted => {
            Outcome::Respond(handle_static(req, static_store, fetcher, config, now_ms).await)
        }
    }
}

fn host_of(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_default()
}

/// Cache-first with background revalidation for API and audio hosts.
async fn handle_scripture<F: Fetcher>(
    req: Request,
    store: CacheStore,
    fetcher: F,
    config: Arc<WorkerConfig>,
) -> Served {
    let host = host_of(&req.url);

    let cached = match store.get(&req.url) {
        Ok(cached) => cached,
        Err(e) => {
            warn!(url = %req.url, error = %e, "cache lookup failed");
            None
        }
    };

    if let Some(hit) = cached {
        debug!(url = %req.url, "serving scripture data from cache");

        // Refresh API responses only; refetching cached audio wastes
        // bandwidth on large media.
        let background = (host == config.api_host).then(|| {
            let url = req.url.clone();
            async move {
                match fetcher.fetch(Request::get(&url)).await {
                    Ok(fresh) if fresh.is_ok() => {
                        if let Err(e) = store.put(&url, &fresh) {
                            warn!(url = %url, error = %e, "failed to store refreshed data");
                        } else {
                            debug!(url = %url, "refreshed cached scripture data");
                        }
                    }
                    Ok(fresh) => {
                        debug!(url = %url, status = fresh.status, "refresh returned error status")
                    }
                    Err(e) => debug!(url = %url, error = %e, "background refresh failed"),
                }
            }
            .boxed()
        });

        return Served {
            response: hit,
            background,
        };
    }

    match fetcher.fetch(req.clone()).await {
        Ok(response) => {
            if response.is_ok() {
                if let Err(e) = store.put(&req.url, &response) {
                    warn!(url = %req.url, error = %e, "failed to store fetched data");
                }
            }
            Served::immediate(response)
        }
        Err(e) => {
            warn!(url = %req.url, error = %e, "scripture fetch failed, serving offline fallback");
            if config.is_audio_host(&host) {
                Served::immediate(fallback::offline_audio_response())
            } else {
                Served::immediate(fallback::offline_api_response())
            }
        }
    }
}

/// Stale-while-revalidate race for whitelisted static assets.
async fn handle_static<F: Fetcher>(
    req: Request,
    store: CacheStore,
    fetcher: F,
    config: Arc<WorkerConfig>,
    now_ms: i64,
) -> Served {
    let net_url = fixed_url(&req.url, &config.own_scheme, &config.own_host, now_ms);
    let net_req = Request::get(&net_url).with_header("cache-control", "no-store");

    let fetch_fut: BoxFuture<'static, Result<Response, FetchError>> = {
        let fetcher = fetcher.clone();
        async move { fetcher.fetch(net_req).await }.boxed()
    };
    let cache_fut: BoxFuture<'static, Option<Response>> = {
        let store = store.clone();
        let url = req.url.clone();
        async move { store.get(&url).ok().flatten() }.boxed()
    };

    match future::select(fetch_fut, cache_fut).await {
        // Network settled first.
        Either::Left((Ok(response), _)) => served_from_network(req, store, response),
        Either::Left((Err(e), cache_fut)) => {
            debug!(url = %req.url, error = %e, "static fetch failed, trying cache");
            match cache_fut.await {
                Some(hit) => Served::immediate(hit),
                None => {
                    Served::immediate(fallback::offline_static_response(&req, &store, &config))
                }
            }
        }
        // Cache settled first; the in-flight fetch keeps the store warm for
        // the next offline period.
        Either::Right((Some(hit), fetch_fut)) => {
            let url = req.url.clone();
            let background = async move {
                match fetch_fut.await {
                    Ok(fresh) if fresh.is_ok() => {
                        if let Err(e) = store.put(&url, &fresh) {
                            warn!(url = %url, error = %e, "failed to warm static cache");
                        }
                    }
                    Ok(_) | Err(_) => {}
                }
            }
            .boxed();
            Served {
                response: hit,
                background: Some(background),
            }
        }
        Either::Right((None, fetch_fut)) => match fetch_fut.await {
            Ok(response) => served_from_network(req, store, response),
            Err(e) => {
                debug!(url = %req.url, error = %e, "static fetch failed with empty cache");
                Served::immediate(fallback::offline_static_response(&req, &store, &config))
            }
        },
    }
}

/// Serve a network response, warming the store with a copy when it is
/// successful. The write happens in background work so it never blocks the
/// caller.
fn served_from_network(req: Request, store: CacheStore, response: Response) -> Served {
    let background = response.is_ok().then(|| {
        let copy = response.clone();
        async move {
            if let Err(e) = store.put(&req.url, &copy) {
                warn!(url = %req.url, error = %e, "failed to warm static cache");
            }
        }
        .boxed()
    });
    Served {
        response,
        background,
    }
}
