use super::{BlobCache, MemoryCache};
use crate::{PolyvisionError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

const CACHE_FILE_EXTENSION: &str = "json";

static TEMP_FILE_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheStats {
    pub total_files: usize,
    pub total_size_mb: f64,
}

/// Memory tier in front of a directory of `<key>.json` files.
///
/// `get` consults memory first and falls back to the file. A file hit is not
/// copied into memory. `set` updates memory, then writes the file; if the
/// file write fails the memory entry stays, so the tiers can diverge. A file
/// edited behind the cache's back stays masked by the memory tier until the
/// process restarts.
#[derive(Debug)]
pub struct LayeredCache {
    memory: MemoryCache,
    cache_dir: PathBuf,
}

impl LayeredCache {
    /// Open (and create if needed) a persistent cache rooted at `cache_dir`.
    pub fn new(cache_dir: impl Into<PathBuf>) -> Result<Self> {
        let cache_dir = cache_dir.into();

        fs::create_dir_all(&cache_dir).map_err(|e| {
            PolyvisionError::cache_with_source(format!("Failed to create cache directory {}", cache_dir.display()), e)
        })?;

        Ok(Self {
            memory: MemoryCache::new(),
            cache_dir,
        })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn memory(&self) -> &MemoryCache {
        &self.memory
    }

    fn cache_path(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.contains('/') || key.contains('\\') || key.contains("..") {
            return Err(PolyvisionError::validation(format!(
                "Cache key '{}' cannot be used as a file name",
                key
            )));
        }

        // ':' separates namespaces but is not a legal file name character on Windows.
        let file_stem = if cfg!(windows) { key.replace(':', "_") } else { key.to_string() };

        Ok(self.cache_dir.join(format!("{}.{}", file_stem, CACHE_FILE_EXTENSION)))
    }

    /// Remove every cache file and empty the memory tier.
    pub fn clear(&self) -> Result<usize> {
        self.memory.clear();

        if !self.cache_dir.exists() {
            return Ok(0);
        }

        let entries = fs::read_dir(&self.cache_dir)
            .map_err(|e| PolyvisionError::cache_with_source("Failed to read cache directory", e))?;

        let mut removed = 0;
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some(CACHE_FILE_EXTENSION) {
                continue;
            }
            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) => debug!("Failed to remove {:?}: {}", path, e),
            }
        }

        Ok(removed)
    }

    pub fn stats(&self) -> Result<CacheStats> {
        if !self.cache_dir.exists() {
            return Ok(CacheStats::default());
        }

        let entries = fs::read_dir(&self.cache_dir)
            .map_err(|e| PolyvisionError::cache_with_source("Failed to read cache directory", e))?;

        let mut total_files = 0;
        let mut total_size_bytes = 0u64;

        for entry in entries.flatten() {
            if entry.path().extension().and_then(|s| s.to_str()) == Some(CACHE_FILE_EXTENSION) {
                total_files += 1;
                if let Ok(metadata) = entry.metadata() {
                    total_size_bytes += metadata.len();
                }
            }
        }

        Ok(CacheStats {
            total_files,
            total_size_mb: total_size_bytes as f64 / 1024.0 / 1024.0,
        })
    }

    async fn write_file(&self, key: &str, path: &Path, value: &Value) -> Result<()> {
        let serialized = serde_json::to_vec(value)?;

        let temp_path = self.cache_dir.join(format!(
            ".{}.tmp.{}.{}",
            path.file_name().and_then(|s| s.to_str()).unwrap_or(key),
            std::process::id(),
            TEMP_FILE_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));

        tokio::fs::write(&temp_path, &serialized)
            .await
            .map_err(|e| PolyvisionError::cache_with_source(format!("Failed to write cache file for '{}'", key), e))?;

        if let Err(e) = tokio::fs::rename(&temp_path, path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(PolyvisionError::cache_with_source(
                format!("Failed to move cache file into place for '{}'", key),
                e,
            ));
        }

        Ok(())
    }
}

#[async_trait]
impl BlobCache for LayeredCache {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        if let Some(value) = self.memory.lookup(key) {
            debug!(key, tier = "memory", "cache hit");
            return Ok(Some(value));
        }

        let path = self.cache_path(key)?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(key, "cache miss");
                return Ok(None);
            }
            Err(e) => return Err(PolyvisionError::Io(e)),
        };

        let value = serde_json::from_slice(&bytes).map_err(|e| {
            warn!(key, path = %path.display(), "cache file is not valid JSON");
            PolyvisionError::serialization_with_source(format!("Failed to deserialize cache file {}", path.display()), e)
        })?;

        debug!(key, tier = "disk", "cache hit");
        Ok(Some(value))
    }

    async fn set(&self, key: &str, value: Value) -> Result<Value> {
        let path = self.cache_path(key)?;
        self.memory.store(key, value.clone());
        self.write_file(key, &path, &value).await?;
        Ok(value)
    }
}
