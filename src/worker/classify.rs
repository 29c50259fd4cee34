//! Per-request handling policy decision.

use reqwest::Url;

use crate::config::WorkerConfig;

/// Which of the three handling policies applies to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestClass {
    /// Scripture API or audio host: cache-first with background refresh.
    ScriptureData,
    /// Whitelisted static-asset host: stale-while-revalidate race.
    StaticWhitelisted,
    /// Everything else: never intercepted, passes through untouched.
    Unhandled,
}

/// Development-tooling URLs that must never be intercepted. `cache-bust=` is
/// our own rewrite marker; intercepting it again would loop.
const DEV_URL_MARKERS: &[&str] = &["localhost:3000", "@react-refresh", "env.mjs", "cache-bust="];

pub fn classify(url: &str, config: &WorkerConfig) -> RequestClass {
    if DEV_URL_MARKERS.iter().any(|marker| url.contains(marker)) {
        return RequestClass::Unhandled;
    }

    let Ok(parsed) = Url::parse(url) else {
        return RequestClass::Unhandled;
    };
    let Some(host) = parsed.host_str() else {
        return RequestClass::Unhandled;
    };

    if config.is_scripture_host(host) {
        RequestClass::ScriptureData
    } else if config.is_whitelisted(host) {
        RequestClass::StaticWhitelisted
    } else {
        RequestClass::Unhandled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> WorkerConfig {
        WorkerConfig {
            own_host: "app.example.test".to_string(),
            ..WorkerConfig::default()
        }
    }

    #[test]
    fn test_api_and_audio_hosts_are_scripture_data() {
        let config = config();
        assert_eq!(
            classify("https://api.quran.com/api/v4/chapters?language=id", &config),
            RequestClass::ScriptureData
        );
        assert_eq!(
            classify("https://verses.quran.com/Alafasy/mp3/018001.mp3", &config),
            RequestClass::ScriptureData
        );
        assert_eq!(
            classify("https://audio.quran.com/x.mp3", &config),
            RequestClass::ScriptureData
        );
    }

    #[test]
    fn test_whitelisted_hosts_are_static() {
        let config = config();
        assert_eq!(
            classify("https://app.example.test/index.html", &config),
            RequestClass::StaticWhitelisted
        );
        assert_eq!(
            classify("https://fonts.googleapis.com/css2?family=Amiri", &config),
            RequestClass::StaticWhitelisted
        );
        assert_eq!(
            classify("https://cdn.jsdelivr.net/npm/lib.js", &config),
            RequestClass::StaticWhitelisted
        );
    }

    #[test]
    fn test_unknown_hosts_pass_through() {
        let config = config();
        assert_eq!(
            classify("https://tracker.example.com/pixel.gif", &config),
            RequestClass::Unhandled
        );
    }

    #[test]
    fn test_dev_tooling_urls_pass_through() {
        let config = config();
        assert_eq!(
            classify("http://localhost:3000/src/main.tsx", &config),
            RequestClass::Unhandled
        );
        assert_eq!(
            classify("https://app.example.test/@react-refresh", &config),
            RequestClass::Unhandled
        );
        assert_eq!(
            classify("https://app.example.test/env.mjs", &config),
            RequestClass::Unhandled
        );
    }

    #[test]
    fn test_already_busted_urls_are_not_reintercepted() {
        let config = config();
        assert_eq!(
            classify("https://app.example.test/app.js?cache-bust=1700000000000", &config),
            RequestClass::Unhandled
        );
    }

    #[test]
    fn test_garbage_url_is_unhandled() {
        assert_eq!(classify("::not-a-url::", &config()), RequestClass::Unhandled);
    }
}
