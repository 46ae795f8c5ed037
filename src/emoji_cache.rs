//! Persisted mapping of emoji name to remote id and content fingerprint
//!
//! The cache is a single JSON document, rewritten wholesale on every save.
//! It is owned by whoever runs the reconciliation; there is no process-wide
//! instance and no file locking, so only one run should use a given cache
//! file at a time.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

use crate::errors::{CacheError, CacheResult};
use crate::models::CacheEntry;

#[derive(Debug, Clone)]
pub struct EmojiCache {
    path: PathBuf,
    entries: BTreeMap<String, CacheEntry>,
}

impl EmojiCache {
    /// An empty cache that will be saved to `path`
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Load the cache stored at `path`.
    ///
    /// A missing or blank file yields an empty cache. A file that exists but
    /// does not parse is reported as [`CacheError::Corrupt`] rather than being
    /// silently discarded.
    pub async fn load(path: impl Into<PathBuf>) -> CacheResult<Self> {
        let path = path.into();

        let contents = match fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No cache file at {:?}, starting empty", path);
                return Ok(Self::empty(path));
            }
            Err(e) => return Err(CacheError::io(path, e)),
        };

        if contents.trim().is_empty() {
            warn!("Cache file {:?} is empty, starting empty", path);
            return Ok(Self::empty(path));
        }

        let entries = serde_json::from_str(&contents)
            .map_err(|source| CacheError::Corrupt {
                path: path.clone(),
                source,
            })?;

        Ok(Self { path, entries })
    }

    /// Write the whole cache back to its file.
    ///
    /// The document is written to a sibling temporary file first and then
    /// renamed over the target, so a failed write never truncates the
    /// previous cache.
    pub async fn save(&self) -> CacheResult<()> {
        let contents = self.to_pretty_json()?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| CacheError::io(parent, e))?;
        }

        let temp_path = self.temp_path();
        fs::write(&temp_path, contents)
            .await
            .map_err(|e| CacheError::io(&temp_path, e))?;
        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| CacheError::io(&self.path, e))?;

        debug!("Saved {} cache entries to {:?}", self.entries.len(), self.path);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&CacheEntry> {
        self.entries.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, entry: CacheEntry) -> Option<CacheEntry> {
        self.entries.insert(name.into(), entry)
    }

    pub fn remove(&mut self, name: &str) -> Option<CacheEntry> {
        self.entries.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CacheEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // Four-space indentation keeps files diffable against hand-edited ones.
    fn to_pretty_json(&self) -> CacheResult<Vec<u8>> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.entries
            .serialize(&mut serializer)
            .map_err(|source| CacheError::Corrupt {
                path: self.path.clone(),
                source,
            })?;
        Ok(buf)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
