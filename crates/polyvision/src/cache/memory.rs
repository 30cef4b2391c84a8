use super::BlobCache;
use crate::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;

/// Ephemeral in-process cache. Entries live until the process exits or
/// [`MemoryCache::clear`] is called.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: DashMap<String, Value>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub(crate) fn lookup(&self, key: &str) -> Option<Value> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    pub(crate) fn store(&self, key: &str, value: Value) {
        self.entries.insert(key.to_string(), value);
    }
}

#[async_trait]
impl BlobCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.lookup(key))
    }

    async fn set(&self, key: &str, value: Value) -> Result<Value> {
        self.store(key, value.clone());
        Ok(value)
    }
}
