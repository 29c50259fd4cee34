//! Worker configuration management.
//!
//! All tunables of the caching layer live here: upstream hostnames, the
//! hostname whitelist for static assets, the fixed list of target chapters,
//! the verse query parameters, and the two cache store generation names.
//!
//! The configuration is resolved once at startup and passed explicitly into
//! each component, so the precache loader and the request interceptor can be
//! exercised with injected fakes. Overrides are stored at
//! `~/.config/surahcache/config.json`.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "surahcache";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Per-resource fetch timeout in seconds.
/// Keeps a precache run from hanging indefinitely on a dead network;
/// a resource that takes longer is treated as failed and skipped.
const FETCH_TIMEOUT_SECS: u64 = 10;

/// The seven target chapters: Al Kahf (18), Luqman (31), As Sajdah (32),
/// Yasin (36), Ar Rahman (55), Al Waqiah (56), Al Mulk (67).
const TARGET_CHAPTER_IDS: &[u32] = &[18, 31, 32, 36, 55, 56, 67];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Scheme of the worker's own origin; requests are normalized to it.
    pub own_scheme: String,
    /// Hostname of the worker's own origin.
    pub own_host: String,

    /// Hostname of the upstream data API.
    pub api_host: String,
    /// Base URL (scheme + host + version prefix) of the upstream data API.
    pub api_base: String,
    /// Hostnames that serve audio recitations.
    pub audio_hosts: Vec<String>,
    /// Base URL prepended to relative audio URLs found in verse records.
    pub audio_base: String,
    /// Third-party hostnames handled with the stale-while-revalidate
    /// strategy (fonts, script CDN). The own host is whitelisted implicitly.
    pub static_whitelist: Vec<String>,

    /// The fixed, closed set of chapters to pre-cache.
    pub target_chapter_ids: Vec<u32>,
    /// Translation language for the verse query.
    pub language: String,
    /// Upstream id of the verse translation resource.
    pub translation_id: u32,
    /// Upstream id of the recitation (qari) whose audio is requested.
    pub recitation_id: u32,
    /// Verses per page in the verse query.
    pub per_page: u32,

    /// Name of the static-asset store; the suffix encodes the generation.
    pub static_store_name: String,
    /// Name of the scripture data/audio store.
    pub scripture_store_name: String,

    /// Application shell paths cached on install, served from the own origin.
    pub shell_manifest: Vec<String>,
    /// Shell path served to offline HTML navigations.
    pub shell_fallback: String,

    /// Per-resource fetch timeout in seconds.
    pub fetch_timeout_secs: u64,
    /// Root directory holding the cache stores.
    pub cache_root: PathBuf,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            own_scheme: "https".to_string(),
            own_host: "localhost".to_string(),
            api_host: "api.quran.com".to_string(),
            api_base: "https://api.quran.com/api/v4".to_string(),
            audio_hosts: vec![
                "verses.quran.com".to_string(),
                "audio.quran.com".to_string(),
            ],
            audio_base: "https://verses.quran.com/".to_string(),
            static_whitelist: vec![
                "fonts.gstatic.com".to_string(),
                "fonts.googleapis.com".to_string(),
                "cdn.jsdelivr.net".to_string(),
            ],
            target_chapter_ids: TARGET_CHAPTER_IDS.to_vec(),
            language: "id".to_string(),
            translation_id: 33,
            recitation_id: 7,
            per_page: 50,
            static_store_name: "pwa-cache-v2".to_string(),
            scripture_store_name: "quran-cache-v1".to_string(),
            shell_manifest: vec![
                "/".to_string(),
                "/index.html".to_string(),
                "/manifest.json".to_string(),
                "/icon_192.png".to_string(),
                "/icon_512.png".to_string(),
                "/icon_180.png".to_string(),
            ],
            shell_fallback: "/index.html".to_string(),
            fetch_timeout_secs: FETCH_TIMEOUT_SECS,
            cache_root: default_cache_root(),
        }
    }
}

fn default_cache_root() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_NAME)
}

impl WorkerConfig {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// True for the API host and every audio host.
    pub fn is_scripture_host(&self, host: &str) -> bool {
        host == self.api_host || self.is_audio_host(host)
    }

    pub fn is_audio_host(&self, host: &str) -> bool {
        self.audio_hosts.iter().any(|h| h == host)
    }

    /// True for hosts served with the stale-while-revalidate strategy.
    pub fn is_whitelisted(&self, host: &str) -> bool {
        host == self.own_host || self.static_whitelist.iter().any(|h| h == host)
    }

    /// Absolute URL of a shell path on the worker's own origin.
    pub fn shell_url(&self, path: &str) -> String {
        format!("{}://{}{}", self.own_scheme, self.own_host, path)
    }

    /// The two current store names; anything else is a stale generation.
    pub fn store_names(&self) -> [&str; 2] {
        [&self.static_store_name, &self.scripture_store_name]
    }

    #[cfg(test)]
    pub(crate) fn for_tests(cache_root: &std::path::Path) -> Self {
        Self {
            own_host: "app.example.test".to_string(),
            target_chapter_ids: vec![18],
            cache_root: cache_root.to_path_buf(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_targets_fixed_chapter_set() {
        let config = WorkerConfig::default();
        assert_eq!(config.target_chapter_ids, vec![18, 31, 32, 36, 55, 56, 67]);
    }

    #[test]
    fn test_host_classification_helpers() {
        let config = WorkerConfig::default();
        assert!(config.is_scripture_host("api.quran.com"));
        assert!(config.is_scripture_host("verses.quran.com"));
        assert!(config.is_audio_host("audio.quran.com"));
        assert!(!config.is_audio_host("api.quran.com"));
        assert!(config.is_whitelisted("fonts.gstatic.com"));
        assert!(config.is_whitelisted("localhost"));
        assert!(!config.is_whitelisted("evil.example.com"));
    }

    #[test]
    fn test_shell_url() {
        let config = WorkerConfig::default();
        assert_eq!(config.shell_url("/index.html"), "https://localhost/index.html");
    }

    #[test]
    fn test_partial_config_falls_back_to_defaults() {
        let config: WorkerConfig =
            serde_json::from_str(r#"{"own_host": "quran.example.org"}"#).unwrap();
        assert_eq!(config.own_host, "quran.example.org");
        assert_eq!(config.api_host, "api.quran.com");
        assert_eq!(config.per_page, 50);
    }
}
