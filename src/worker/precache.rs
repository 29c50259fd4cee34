//! Pre-population of the cache stores, run once on worker install.
//!
//! The application shell is required: any shell fetch failure fails the
//! install, since the offline experience is unusable without it. The
//! scripture walk is best-effort: every chapter, page, and audio fetch
//! failure is logged and skipped, and a later install run fills the gaps.
//! Chapters are processed in the fixed list's order; pages within a chapter
//! strictly in increasing order, since page N's response is what reveals
//! whether page N+1 exists.

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::api::{urls, FetchError};
use crate::cache::CacheStore;
use crate::config::WorkerConfig;
use crate::models::VersesResponse;
use crate::worker::fetcher::Fetcher;
use crate::worker::request::{Request, Response};

/// Run the full install step: shell first (required), scripture second
/// (best-effort).
pub async fn install<F: Fetcher>(
    static_store: &CacheStore,
    scripture_store: &CacheStore,
    fetcher: &F,
    config: &WorkerConfig,
) -> Result<()> {
    precache_shell(static_store, fetcher, config).await?;
    precache_scripture(scripture_store, fetcher, config).await;
    Ok(())
}

/// Cache the fixed application shell manifest against the own origin.
async fn precache_shell<F: Fetcher>(
    store: &CacheStore,
    fetcher: &F,
    config: &WorkerConfig,
) -> Result<()> {
    for path in &config.shell_manifest {
        let url = config.shell_url(path);
        let response = fetch_ok(fetcher, &url)
            .await
            .with_context(|| format!("Failed to cache shell asset: {}", url))?;
        store.put(&url, &response)?;
    }
    info!(assets = config.shell_manifest.len(), "cached application shell");
    Ok(())
}

/// Walk the fixed chapter list, caching the chapters index, every verse
/// page, and every referenced audio asset. Never fails: partial coverage is
/// intentional.
pub async fn precache_scripture<F: Fetcher>(
    store: &CacheStore,
    fetcher: &F,
    config: &WorkerConfig,
) {
    info!("pre-caching scripture data for target chapters");

    let index_url = urls::chapters_url(config);
    match fetch_ok(fetcher, &index_url).await {
        Ok(response) => {
            if let Err(e) = store.put(&index_url, &response) {
                warn!(url = %index_url, error = %e, "failed to store chapters index");
            }
        }
        Err(e) => warn!(url = %index_url, error = %e, "failed to fetch chapters index"),
    }

    for &chapter_id in &config.target_chapter_ids {
        if let Err(e) = precache_chapter(store, fetcher, config, chapter_id).await {
            warn!(chapter = chapter_id, error = %e, "failed to cache chapter");
        }
    }

    info!("scripture pre-caching completed");
}

/// Cache every verse page of one chapter, plus each page's audio assets.
async fn precache_chapter<F: Fetcher>(
    store: &CacheStore,
    fetcher: &F,
    config: &WorkerConfig,
    chapter_id: u32,
) -> Result<()> {
    let url = urls::verses_page_url(config, chapter_id, 1);
    let response = fetch_ok(fetcher, &url).await?;
    let page: VersesResponse =
        serde_json::from_slice(&response.body).map_err(FetchError::from)?;
    store.put(&url, &response)?;
    precache_page_audio(store, fetcher, config, &page).await;
    debug!(chapter = chapter_id, page = 1, verses = page.verses.len(), "cached verse page");

    for page_number in 2..=page.pagination.total_pages {
        let page_url = urls::verses_page_url(config, chapter_id, page_number);
        let page_response = fetch_ok(fetcher, &page_url).await?;
        let next_page: VersesResponse =
            serde_json::from_slice(&page_response.body).map_err(FetchError::from)?;
        store.put(&page_url, &page_response)?;
        precache_page_audio(store, fetcher, config, &next_page).await;
        debug!(
            chapter = chapter_id,
            page = page_number,
            verses = next_page.verses.len(),
            "cached verse page"
        );
    }

    Ok(())
}

/// Cache the audio asset of every verse on one page. A verse without an
/// audio pointer gets the URL constructed from its verse key and the
/// configured recitation. Fetches are issued sequentially to bound peak
/// network usage; each failure is logged and never aborts the page.
async fn precache_page_audio<F: Fetcher>(
    store: &CacheStore,
    fetcher: &F,
    config: &WorkerConfig,
    page: &VersesResponse,
) {
    for verse in &page.verses {
        let Some(audio_url) = verse.resolve_audio_url(&config.audio_base, config.recitation_id)
        else {
            continue;
        };
        match fetch_ok(fetcher, &audio_url).await {
            Ok(response) => {
                if let Err(e) = store.put(&audio_url, &response) {
                    warn!(verse = %verse.verse_key, error = %e, "failed to store audio");
                }
            }
            Err(e) => {
                debug!(verse = %verse.verse_key, url = %audio_url, error = %e, "failed to cache audio")
            }
        }
    }
}

/// Fetch `url`, mapping a resolved non-2xx response to `UpstreamError`.
async fn fetch_ok<F: Fetcher>(fetcher: &F, url: &str) -> Result<Response, FetchError> {
    let response = fetcher.fetch(Request::get(url)).await?;
    if response.is_ok() {
        Ok(response)
    } else {
        Err(FetchError::UpstreamError {
            status: response.status,
        })
    }
}
