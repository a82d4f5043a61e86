//! In-memory key-value store used by tests and ephemeral sessions.

use super::{KeyValueStore, StorageError, StorageResult};
use std::collections::BTreeMap;

/// `BTreeMap`-backed store with failure switches and write counters.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    entries: BTreeMap<String, String>,
    quota_bytes: Option<usize>,
    disabled: bool,
    writes: usize,
    removes: usize,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limits the summed byte length of all keys and values.
    pub fn with_quota(mut self, quota_bytes: usize) -> Self {
        self.quota_bytes = Some(quota_bytes);
        self
    }

    /// Seeds a raw entry without touching the counters.
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// When disabled, every operation fails with `StorageError::Unavailable`.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Number of successful `set` calls.
    pub fn write_count(&self) -> usize {
        self.writes
    }

    /// Number of successful `remove` calls.
    pub fn remove_count(&self) -> usize {
        self.removes
    }

    /// Raw stored text for `key`, bypassing failure switches.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn ensure_enabled(&self) -> StorageResult<()> {
        if self.disabled {
            return Err(StorageError::Unavailable("memory store disabled".to_string()));
        }
        Ok(())
    }

    fn used_bytes_without(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(existing, _)| existing.as_str() != key)
            .map(|(existing, value)| existing.len() + value.len())
            .sum()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.ensure_enabled()?;
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.ensure_enabled()?;
        if let Some(quota_bytes) = self.quota_bytes {
            let needed_bytes = self.used_bytes_without(key) + key.len() + value.len();
            if needed_bytes > quota_bytes {
                return Err(StorageError::QuotaExceeded {
                    needed_bytes,
                    quota_bytes,
                });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        self.ensure_enabled()?;
        if self.entries.remove(key).is_some() {
            self.removes += 1;
        }
        Ok(())
    }

    fn keys_with_prefix(&self, prefix: &str) -> StorageResult<Vec<String>> {
        self.ensure_enabled()?;
        Ok(self
            .entries
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.clone())
            .collect())
    }
}
