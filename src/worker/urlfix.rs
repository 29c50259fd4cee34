//! URL normalization for intercepted requests.
//!
//! Forces the scheme to the worker's own scheme (some hosting environments
//! rewrite to mixed content otherwise) and, for the worker's own host,
//! appends a timestamp cache-busting parameter so a no-store refetch is
//! never answered from an intermediary cache.

use reqwest::Url;
use tracing::debug;

/// Rewrite `raw` for a no-store refetch. Third-party hosts only get the
/// scheme fix. Pure and deterministic given (URL, now).
pub fn fixed_url(raw: &str, own_scheme: &str, own_host: &str, now_ms: i64) -> String {
    let Ok(mut url) = Url::parse(raw) else {
        return raw.to_string();
    };
    // Scheme changes between special and non-special schemes are rejected;
    // the URL then keeps its original scheme.
    if url.set_scheme(own_scheme).is_err() {
        debug!(url = raw, scheme = own_scheme, "could not normalize scheme");
    }

    if url.host_str() == Some(own_host) {
        let busted = match url.query() {
            Some(q) if !q.is_empty() => format!("{}&cache-bust={}", q, now_ms),
            _ => format!("cache-bust={}", now_ms),
        };
        url.set_query(Some(&busted));
    }
    url.to_string()
}
