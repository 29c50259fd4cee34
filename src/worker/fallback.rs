//! Best-effort responses synthesized when both cache and network fail.
//!
//! The page layer distinguishes these from real payloads (and from its own
//! bundled local fallback) by the machine-readable `error` marker.

use serde_json::json;

use crate::cache::CacheStore;
use crate::config::WorkerConfig;
use crate::worker::request::{Request, Response};

/// Marker value in the offline API error body.
pub const OFFLINE_ERROR_MARKER: &str = "Offline - No cached data available";

/// Human-readable offline message shown by the reader UI.
const OFFLINE_MESSAGE: &str = "Data Quran tidak tersedia saat offline. \
    Silakan hubungkan ke internet untuk mengambil data terbaru.";

/// 503 JSON error for API-host misses.
pub fn offline_api_response() -> Response {
    Response::new(503, "Service Unavailable")
        .with_header("content-type", "application/json")
        .with_body(
            serde_json::to_vec(&json!({
                "error": OFFLINE_ERROR_MARKER,
                "message": OFFLINE_MESSAGE,
            }))
            .unwrap_or_default(),
        )
}

/// Empty-body 503 for audio-host misses; the player treats it as
/// unavailable media.
pub fn offline_audio_response() -> Response {
    Response::new(503, "Service Unavailable")
}

/// Offline fallback for whitelisted static assets: HTML navigations get the
/// cached application shell, everything else a generic 503.
pub fn offline_static_response(
    req: &Request,
    static_store: &CacheStore,
    config: &WorkerConfig,
) -> Response {
    if req.accepts_html() {
        let shell_url = config.shell_url(&config.shell_fallback);
        if let Ok(Some(shell)) = static_store.get(&shell_url) {
            return shell;
        }
    }
    Response::new(503, "Service Unavailable").with_body("Offline - Content not available")
}
