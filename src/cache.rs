//! Avatar encoding cache for incremental builds.
//!
//! AVIF encoding through rav1e is the only slow step of a build. The cache
//! lets [`crate::avatar`] skip it when neither the source image nor the
//! encoding parameters changed since the previous build.
//!
//! ## Keys
//!
//! Lookups are content-addressed by `source_hash` + `params_hash`, not by
//! output path:
//!
//! - **`source_hash`**: SHA-256 of the source file bytes. Content-based so it
//!   survives `git checkout`, which resets modification times.
//! - **`params_hash`**: SHA-256 of (edge length, quality, sharpening).
//!
//! A hit also requires the previously written file to still exist. Entries
//! for files the current build no longer produces are pruned with
//! [`CacheManifest::retain_outputs`].
//!
//! ## Storage
//!
//! `<output_dir>/.cache-manifest.json`, next to the files it describes.
//! `--no-cache` starts from [`CacheManifest::empty`].

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::Path;

const MANIFEST_FILENAME: &str = ".cache-manifest.json";

/// Bump to invalidate every existing cache.
const MANIFEST_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CacheEntry {
    pub source_hash: String,
    pub params_hash: String,
}

/// Output file name → cache entry, plus a runtime reverse index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheManifest {
    pub version: u32,
    pub entries: HashMap<String, CacheEntry>,
    /// `"{source_hash}:{params_hash}"` → output file name. Never serialized.
    #[serde(skip)]
    by_content: HashMap<String, String>,
}

fn content_key(source_hash: &str, params_hash: &str) -> String {
    format!("{source_hash}:{params_hash}")
}

impl CacheManifest {
    pub fn empty() -> Self {
        Self {
            version: MANIFEST_VERSION,
            entries: HashMap::new(),
            by_content: HashMap::new(),
        }
    }

    /// Load from the output directory.
    ///
    /// A missing, unreadable, or outdated manifest yields an empty one; the
    /// worst case is a re-encode.
    pub fn load(output_dir: &Path) -> Self {
        let path = output_dir.join(MANIFEST_FILENAME);
        let Ok(content) = std::fs::read_to_string(&path) else {
            return Self::empty();
        };
        match serde_json::from_str::<Self>(&content) {
            Ok(mut manifest) if manifest.version == MANIFEST_VERSION => {
                manifest.by_content = manifest
                    .entries
                    .iter()
                    .map(|(output, e)| (content_key(&e.source_hash, &e.params_hash), output.clone()))
                    .collect();
                manifest
            }
            Ok(_) => {
                tracing::debug!("cache manifest version changed, starting fresh");
                Self::empty()
            }
            Err(e) => {
                tracing::debug!("ignoring unreadable cache manifest: {e}");
                Self::empty()
            }
        }
    }

    pub fn save(&self, output_dir: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(output_dir.join(MANIFEST_FILENAME), json)
    }

    /// Stored output file for these hashes, if it is still on disk.
    pub fn find_cached(
        &self,
        source_hash: &str,
        params_hash: &str,
        output_dir: &Path,
    ) -> Option<&str> {
        let stored = self.by_content.get(&content_key(source_hash, params_hash))?;
        output_dir.join(stored).exists().then_some(stored.as_str())
    }

    /// Record an output file. An older entry for the same content is dropped.
    pub fn insert(&mut self, output: String, source_hash: String, params_hash: String) {
        let key = content_key(&source_hash, &params_hash);
        if let Some(old) = self.by_content.get(&key)
            && *old != output
        {
            self.entries.remove(old);
        }
        self.by_content.insert(key, output.clone());
        self.entries.insert(
            output,
            CacheEntry {
                source_hash,
                params_hash,
            },
        );
    }

    /// Drop every entry whose output file is not in `keep`.
    ///
    /// Returns the dropped file names.
    pub fn retain_outputs(&mut self, keep: &[String]) -> Vec<String> {
        let mut dropped: Vec<String> = self
            .entries
            .keys()
            .filter(|name| !keep.contains(name))
            .cloned()
            .collect();
        dropped.sort();
        for name in &dropped {
            self.entries.remove(name);
        }
        self.by_content.retain(|_, output| keep.contains(output));
        dropped
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// SHA-256 of a file's contents as lowercase hex.
pub fn hash_file(path: &Path) -> io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(format!("{:x}", Sha256::digest(&bytes)))
}

/// SHA-256 of the parameters that shape one avatar variant.
pub fn hash_avatar_params(edge: u32, quality: u32, sharpen: Option<(f32, i32)>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"avatar\0");
    hasher.update(edge.to_le_bytes());
    hasher.update(quality.to_le_bytes());
    match sharpen {
        Some((sigma, threshold)) => {
            hasher.update([1u8]);
            hasher.update(sigma.to_le_bytes());
            hasher.update(threshold.to_le_bytes());
        }
        None => hasher.update([0u8]),
    }
    format!("{:x}", hasher.finalize())
}

/// Hit/miss counters for one build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u32,
    pub misses: u32,
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} cached, {} encoded, {} total",
            self.hits,
            self.misses,
            self.hits + self.misses
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_manifest_finds_nothing() {
        let tmp = TempDir::new().unwrap();
        let manifest = CacheManifest::empty();
        assert!(manifest.is_empty());
        assert_eq!(manifest.find_cached("a", "b", tmp.path()), None);
    }

    #[test]
    fn insert_then_find_requires_file() {
        let tmp = TempDir::new().unwrap();
        let mut manifest = CacheManifest::empty();
        manifest.insert("avatar-50.avif".into(), "src".into(), "p50".into());

        // Entry exists but the file doesn't
        assert_eq!(manifest.find_cached("src", "p50", tmp.path()), None);

        std::fs::write(tmp.path().join("avatar-50.avif"), b"x").unwrap();
        assert_eq!(
            manifest.find_cached("src", "p50", tmp.path()),
            Some("avatar-50.avif")
        );
        assert_eq!(manifest.find_cached("src", "p100", tmp.path()), None);
    }

    #[test]
    fn save_and_load_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let mut manifest = CacheManifest::empty();
        manifest.insert("avatar-50.avif".into(), "src".into(), "p50".into());
        manifest.save(tmp.path()).unwrap();
        std::fs::write(tmp.path().join("avatar-50.avif"), b"x").unwrap();

        let loaded = CacheManifest::load(tmp.path());
        assert_eq!(loaded.len(), 1);
        assert_eq!(
            loaded.find_cached("src", "p50", tmp.path()),
            Some("avatar-50.avif")
        );
    }

    #[test]
    fn load_missing_or_corrupt_is_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(CacheManifest::load(tmp.path()).is_empty());

        std::fs::write(tmp.path().join(MANIFEST_FILENAME), "{not json").unwrap();
        assert!(CacheManifest::load(tmp.path()).is_empty());
    }

    #[test]
    fn load_other_version_is_empty() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join(MANIFEST_FILENAME),
            r#"{"version": 999, "entries": {"a.avif": {"source_hash": "s", "params_hash": "p"}}}"#,
        )
        .unwrap();
        assert!(CacheManifest::load(tmp.path()).is_empty());
    }

    #[test]
    fn moved_content_replaces_old_entry() {
        let mut manifest = CacheManifest::empty();
        manifest.insert("old.avif".into(), "src".into(), "p".into());
        manifest.insert("new.avif".into(), "src".into(), "p".into());
        assert_eq!(manifest.len(), 1);
        assert!(manifest.entries.contains_key("new.avif"));
    }

    #[test]
    fn params_hash_changes_with_inputs() {
        let base = hash_avatar_params(50, 90, Some((0.5, 0)));
        assert_eq!(base, hash_avatar_params(50, 90, Some((0.5, 0))));
        assert_ne!(base, hash_avatar_params(100, 90, Some((0.5, 0))));
        assert_ne!(base, hash_avatar_params(50, 80, Some((0.5, 0))));
        assert_ne!(base, hash_avatar_params(50, 90, None));
    }

    #[test]
    fn hash_file_is_content_based() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a.png");
        let b = tmp.path().join("b.png");
        std::fs::write(&a, b"same").unwrap();
        std::fs::write(&b, b"same").unwrap();
        assert_eq!(hash_file(&a).unwrap(), hash_file(&b).unwrap());
        assert_eq!(hash_file(&a).unwrap().len(), 64);
    }

    #[test]
    fn retain_outputs_drops_stale_entries() {
        let tmp = TempDir::new().unwrap();
        let mut manifest = CacheManifest::empty();
        manifest.insert("avatar-50.avif".into(), "src".into(), "p50".into());
        manifest.insert("avatar-100.avif".into(), "src".into(), "p100".into());
        std::fs::write(tmp.path().join("avatar-100.avif"), b"x").unwrap();

        let dropped = manifest.retain_outputs(&["avatar-50.avif".to_string()]);

        assert_eq!(dropped, vec!["avatar-100.avif".to_string()]);
        assert_eq!(manifest.len(), 1);
        assert_eq!(manifest.find_cached("src", "p100", tmp.path()), None);
    }

    #[test]
    fn stats_display() {
        let stats = CacheStats { hits: 2, misses: 1 };
        assert_eq!(stats.to_string(), "2 cached, 1 encoded, 3 total");
        assert_eq!(
            CacheStats::default().to_string(),
            "0 cached, 0 encoded, 0 total"
        );
    }
}
