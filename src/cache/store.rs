//! A named, durable key-value store mapping request URLs to response
//! snapshots.
//!
//! Each entry is a metadata JSON file plus a sibling body file under the
//! store's directory. The body is written first and the metadata last, via
//! temp file and rename; the metadata rename is the commit point, so a
//! reader never observes a partially written entry. Overwrites replace the
//! entry wholesale.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::worker::request::Response;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct EntryMeta {
    url: String,
    status: u16,
    status_text: String,
    headers: Vec<(String, String)>,
    stored_at: DateTime<Utc>,
}

/// Handle to one cache store. Clone is cheap: a name and a path.
#[derive(Debug, Clone)]
pub struct CacheStore {
    name: String,
    dir: PathBuf,
}

impl CacheStore {
    /// Open (or create) the store named `name` under `root`.
    pub fn open(root: &Path, name: &str) -> Result<Self> {
        let dir = root.join(name);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create cache store directory: {}", name))?;
        Ok(Self {
            name: name.to_string(),
            dir,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn entry_stem(url: &str) -> String {
        let mut hasher = DefaultHasher::new();
        url.hash(&mut hasher);
        format!("e{:016x}", hasher.finish())
    }

    fn meta_path(&self, url: &str) -> PathBuf {
        self.dir.join(format!("{}.json", Self::entry_stem(url)))
    }

    fn body_path(&self, url: &str) -> PathBuf {
        self.dir.join(format!("{}.bin", Self::entry_stem(url)))
    }

    /// Store a response snapshot under `url`, replacing any previous entry.
    pub fn put(&self, url: &str, response: &Response) -> Result<()> {
        let body_path = self.body_path(url);
        std::fs::write(&body_path, &response.body)
            .with_context(|| format!("Failed to write cache body for {}", url))?;

        let meta = EntryMeta {
            url: url.to_string(),
            status: response.status,
            status_text: response.status_text.clone(),
            headers: response.headers.clone(),
            stored_at: Utc::now(),
        };
        let meta_path = self.meta_path(url);
        let tmp_path = meta_path.with_extension("json.tmp");
        let contents = serde_json::to_string(&meta)?;
        std::fs::write(&tmp_path, contents)
            .with_context(|| format!("Failed to write cache metadata for {}", url))?;
        std::fs::rename(&tmp_path, &meta_path)
            .with_context(|| format!("Failed to commit cache entry for {}", url))?;
        Ok(())
    }

    /// Look up the snapshot stored under `url`. `Ok(None)` is a cache miss.
    pub fn get(&self, url: &str) -> Result<Option<Response>> {
        let meta_path = self.meta_path(url);
        if !meta_path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&meta_path)
            .with_context(|| format!("Failed to read cache metadata for {}", url))?;
        let meta: EntryMeta = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse cache metadata for {}", url))?;

        // Filenames come from a hash of the key; verify the key on read so a
        // collision surfaces as a miss instead of a wrong payload.
        if meta.url != url {
            warn!(store = %self.name, requested = url, found = %meta.url, "cache key hash collision");
            return Ok(None);
        }

        let body = std::fs::read(self.body_path(url))
            .with_context(|| format!("Failed to read cache body for {}", url))?;
        Ok(Some(Response {
            status: meta.status,
            status_text: meta.status_text,
            headers: meta.headers,
            body,
        }))
    }

    pub fn contains(&self, url: &str) -> bool {
        matches!(self.get(url), Ok(Some(_)))
    }

    /// All request URLs currently stored.
    pub fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let contents = std::fs::read_to_string(&path)?;
            match serde_json::from_str::<EntryMeta>(&contents) {
                Ok(meta) => keys.push(meta.url),
                Err(e) => warn!(store = %self.name, path = %path.display(), error = %e, "skipping unreadable cache entry"),
            }
        }
        keys.sort();
        Ok(keys)
    }

    pub fn entry_count(&self) -> usize {
        self.keys().map(|k| k.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_response(body: &str) -> Response {
        Response {
            status: 200,
            status_text: "OK".to_string(),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_put_then_get_round_trips_snapshot() {
        let tmp = TempDir::new().unwrap();
        let store = CacheStore::open(tmp.path(), "quran-cache-v1").unwrap();

        let url = "https://api.quran.com/api/v4/chapters?language=id";
        store.put(url, &sample_response(r#"{"chapters":[]}"#)).unwrap();

        let hit = store.get(url).unwrap().unwrap();
        assert_eq!(hit.status, 200);
        assert_eq!(hit.header("content-type"), Some("application/json"));
        assert_eq!(hit.body, br#"{"chapters":[]}"#);
    }

    #[test]
    fn test_get_missing_key_is_a_miss_not_an_error() {
        let tmp = TempDir::new().unwrap();
        let store = CacheStore::open(tmp.path(), "quran-cache-v1").unwrap();
        assert!(store.get("https://api.quran.com/nothing").unwrap().is_none());
    }

    #[test]
    fn test_put_overwrites_wholesale() {
        let tmp = TempDir::new().unwrap();
        let store = CacheStore::open(tmp.path(), "quran-cache-v1").unwrap();

        let url = "https://api.quran.com/api/v4/chapters?language=id";
        store.put(url, &sample_response("old")).unwrap();
        store.put(url, &sample_response("new")).unwrap();

        assert_eq!(store.get(url).unwrap().unwrap().body, b"new");
        assert_eq!(store.entry_count(), 1);
    }

    #[test]
    fn test_keys_lists_stored_urls() {
        let tmp = TempDir::new().unwrap();
        let store = CacheStore::open(tmp.path(), "quran-cache-v1").unwrap();

        store.put("https://a.example/1", &sample_response("a")).unwrap();
        store.put("https://b.example/2", &sample_response("b")).unwrap();

        let keys = store.keys().unwrap();
        assert_eq!(keys, vec!["https://a.example/1", "https://b.example/2"]);
    }

    #[test]
    fn test_reopen_sees_existing_entries() {
        let tmp = TempDir::new().unwrap();
        {
            let store = CacheStore::open(tmp.path(), "pwa-cache-v2").unwrap();
            store.put("https://a.example/app.js", &sample_response("js")).unwrap();
        }
        let store = CacheStore::open(tmp.path(), "pwa-cache-v2").unwrap();
        assert!(store.contains("https://a.example/app.js"));
    }
}
