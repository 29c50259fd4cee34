//! Cache store generation cleanup, run on worker activation.
//!
//! Every store directory under the cache root whose name is not one of the
//! two current store names belongs to a previous generation and is deleted
//! wholesale. Entries are never migrated between generations.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

/// Delete every store under `root` not named in `current`.
/// Returns the names of the deleted stores.
pub fn activate(root: &Path, current: &[&str]) -> Result<Vec<String>> {
    if !root.exists() {
        return Ok(Vec::new());
    }

    let mut deleted = Vec::new();
    for entry in std::fs::read_dir(root)
        .with_context(|| format!("Failed to enumerate cache root: {}", root.display()))?
    {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if current.contains(&name.as_str()) {
            continue;
        }
        info!(store = %name, "deleting old cache store");
        match std::fs::remove_dir_all(entry.path()) {
            Ok(()) => deleted.push(name),
            Err(e) => warn!(store = %name, error = %e, "failed to delete old cache store"),
        }
    }
    deleted.sort();
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_activation_keeps_only_current_generations() {
        let tmp = TempDir::new().unwrap();
        for name in ["pwa-cache-v1", "quran-cache-v0", "pwa-cache-v2", "quran-cache-v1"] {
            std::fs::create_dir(tmp.path().join(name)).unwrap();
        }

        let deleted = activate(tmp.path(), &["pwa-cache-v2", "quran-cache-v1"]).unwrap();
        assert_eq!(deleted, vec!["pwa-cache-v1", "quran-cache-v0"]);

        let mut remaining: Vec<String> = std::fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        remaining.sort();
        assert_eq!(remaining, vec!["pwa-cache-v2", "quran-cache-v1"]);
    }

    #[test]
    fn test_activation_with_missing_root_is_a_no_op() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("never-created");
        let deleted = activate(&missing, &["pwa-cache-v2"]).unwrap();
        assert!(deleted.is_empty());
    }

    #[test]
    fn test_activation_ignores_stray_files() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join("quran-cache-v1")).unwrap();
        std::fs::write(tmp.path().join("notes.txt"), "keep me").unwrap();

        let deleted = activate(tmp.path(), &["quran-cache-v1"]).unwrap();
        assert!(deleted.is_empty());
        assert!(tmp.path().join("notes.txt").exists());
    }
}
