//! Keyed blob cache shared by the recognition and translation operations.
//!
//! Two backends implement [`BlobCache`]:
//!
//! - [`MemoryCache`]: in-process map, no eviction, gone on restart.
//! - [`LayeredCache`]: a [`MemoryCache`] in front of a directory holding one
//!   `<key>.json` file per entry. Writes go through to both tiers.
//!
//! Values are stored as `serde_json::Value`. Callers that want their own types
//! use `get_typed` and `set_typed` on `dyn BlobCache`.
//!
//! Keys from different operations must not collide, so callers build them
//! with [`namespaced_key`].
//!
//! # Concurrency
//!
//! There is no deduplication of in-flight work. Two requests for the same key
//! that both miss will both compute and both write; the last write wins.

mod layered;
mod memory;

pub use layered::{CacheStats, LayeredCache};
pub use memory::MemoryCache;

use crate::Result;
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Namespace for cached recognition results.
pub const RECOGNITION_NAMESPACE: &str = "vision";

/// Namespace for cached translation results.
pub const TRANSLATION_NAMESPACE: &str = "translate";

/// Build a cache key scoped to one operation.
///
/// ```rust
/// use polyvision::cache::{namespaced_key, RECOGNITION_NAMESPACE};
///
/// assert_eq!(namespaced_key(RECOGNITION_NAMESPACE, "menu-1"), "vision:menu-1");
/// ```
pub fn namespaced_key(namespace: &str, key: &str) -> String {
    format!("{}:{}", namespace, key)
}

/// A string-keyed store of structured values.
#[async_trait]
pub trait BlobCache: Send + Sync {
    /// Look up `key`. `Ok(None)` is a plain miss.
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Store `value` under `key` and hand it back.
    async fn set(&self, key: &str, value: Value) -> Result<Value>;
}

impl dyn BlobCache {
    /// Look up `key` and decode it as `T`.
    ///
    /// A stored value that does not fit `T` is a serialization error, not a miss.
    pub async fn get_typed<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Encode `value`, store it under `key`, and return it.
    pub async fn set_typed<T: Serialize>(&self, key: &str, value: T) -> Result<T> {
        let encoded = serde_json::to_value(&value)?;
        self.set(key, encoded).await?;
        Ok(value)
    }
}
