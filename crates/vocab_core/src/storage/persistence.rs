//! Namespaced JSON persistence over a `KeyValueStore`.
//!
//! # Responsibility
//! - Prefix every logical key with the app namespace (`lv:filters`, ...).
//! - Serialize values as JSON and parse them back on read.
//! - Absorb backend failures: reads fall back, writes are dropped.
//!
//! # Invariants
//! - No method returns an error; failures are logged and counted.
//! - `clear_namespace` only touches keys under this namespace.
//! - The legacy namespace is consulted only for keys absent from the current
//!   one; a present but unparsable current document never falls back.

use super::{KeyValueStore, StorageError, StorageResult};
use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Key separator between namespace and logical key.
pub const NAMESPACE_SEPARATOR: char = ':';

/// Which namespace a fallback-aware read was answered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    Current,
    Legacy,
}

enum Slot {
    Missing,
    /// Key exists; `None` when the document is unparsable or unreadable.
    Stored(Option<Value>),
}

impl Slot {
    fn into_value(self) -> Option<Value> {
        match self {
            Self::Missing => None,
            Self::Stored(value) => value,
        }
    }
}

pub struct Persistence<S: KeyValueStore> {
    backend: S,
    namespace: String,
    legacy_namespace: Option<String>,
    write_failures: u64,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(backend: S, namespace: impl Into<String>) -> Self {
        Self {
            backend,
            namespace: namespace.into(),
            legacy_namespace: None,
            write_failures: 0,
        }
    }

    /// Enables read-only fallback to keys written by an older schema.
    pub fn with_legacy_namespace(mut self, legacy_namespace: impl Into<String>) -> Self {
        self.legacy_namespace = Some(legacy_namespace.into());
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut S {
        &mut self.backend
    }

    pub fn into_backend(self) -> S {
        self.backend
    }

    /// Count of writes/removes the backend rejected during this session.
    pub fn write_failures(&self) -> u64 {
        self.write_failures
    }

    /// Reads and deserializes `key`, returning `fallback` when the key is
    /// missing, malformed, of the wrong shape, or the backend fails.
    pub fn get<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        self.get_value(key)
            .and_then(|value| serde_json::from_value(value).ok())
            .unwrap_or(fallback)
    }

    /// Reads `key` as an untyped JSON document.
    ///
    /// Returns `None` when missing, unparsable, or unreadable.
    pub fn get_value(&self, key: &str) -> Option<Value> {
        self.read_slot(&self.full_key(key), key).into_value()
    }

    /// Reads `key` from the legacy namespace, if one is configured.
    pub fn legacy_value(&self, key: &str) -> Option<Value> {
        let namespace = self.legacy_namespace.as_deref()?;
        self.read_slot(&join_key(namespace, key), key).into_value()
    }

    /// Reads `key`, falling back to the legacy namespace only when the
    /// current key does not exist at all.
    ///
    /// A current document that fails to parse yields `None` without
    /// consulting the legacy record.
    pub fn get_value_or_legacy(&self, key: &str) -> Option<(Value, ValueSource)> {
        match self.read_slot(&self.full_key(key), key) {
            Slot::Stored(value) => value.map(|value| (value, ValueSource::Current)),
            Slot::Missing => self
                .legacy_value(key)
                .map(|value| (value, ValueSource::Legacy)),
        }
    }

    /// Serializes and stores `value` under `key`. Failures are swallowed.
    pub fn set<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        let full_key = self.full_key(key);
        let result = serde_json::to_string(value)
            .map_err(StorageError::from)
            .and_then(|json| self.backend.set(&full_key, &json));
        self.absorb("storage_write", key, result);
    }

    pub fn remove(&mut self, key: &str) {
        let full_key = self.full_key(key);
        let result = self.backend.remove(&full_key);
        self.absorb("storage_remove", key, result);
    }

    /// Removes every key under this namespace and returns how many went.
    pub fn clear_namespace(&mut self) -> usize {
        let namespace = self.namespace.clone();
        self.clear_prefix(&namespace)
    }

    /// Removes every key under the legacy namespace, if one is configured.
    ///
    /// After this, reads of absent current keys resolve to their defaults
    /// instead of older records.
    pub fn clear_legacy_namespace(&mut self) -> usize {
        match self.legacy_namespace.clone() {
            Some(namespace) => self.clear_prefix(&namespace),
            None => 0,
        }
    }

    fn clear_prefix(&mut self, namespace: &str) -> usize {
        let prefix = join_key(namespace, "");
        let keys = match self.backend.keys_with_prefix(&prefix) {
            Ok(keys) => keys,
            Err(err) => {
                self.write_failures += 1;
                warn!(
                    "event=storage_clear module=persistence status=error namespace={} error={}",
                    namespace, err
                );
                return 0;
            }
        };

        let mut removed = 0;
        for key in keys {
            match self.backend.remove(&key) {
                Ok(()) => removed += 1,
                Err(err) => {
                    self.write_failures += 1;
                    warn!(
                        "event=storage_clear module=persistence status=error namespace={} error={}",
                        namespace, err
                    );
                }
            }
        }
        removed
    }

    fn full_key(&self, key: &str) -> String {
        join_key(&self.namespace, key)
    }

    fn read_slot(&self, full_key: &str, key: &str) -> Slot {
        match self.backend.get(full_key) {
            Ok(Some(raw)) => Slot::Stored(serde_json::from_str(&raw).ok()),
            Ok(None) => Slot::Missing,
            Err(err) => {
                warn!(
                    "event=storage_read module=persistence status=error key_kind={} error={}",
                    key_kind(key),
                    err
                );
                Slot::Stored(None)
            }
        }
    }

    fn absorb(&mut self, event: &str, key: &str, result: StorageResult<()>) {
        if let Err(err) = result {
            self.write_failures += 1;
            warn!(
                "event={} module=persistence status=error key_kind={} failures={} error={}",
                event,
                key_kind(key),
                self.write_failures,
                err
            );
        }
    }
}

fn join_key(namespace: &str, key: &str) -> String {
    format!("{namespace}{NAMESPACE_SEPARATOR}{key}")
}

// Term keys carry user text, so logs only keep the leading segment.
fn key_kind(key: &str) -> &str {
    key.split(NAMESPACE_SEPARATOR).next().unwrap_or(key)
}

#[cfg(test)]
mod tests {
    use super::{Persistence, ValueSource};
    use crate::storage::{KeyValueStore, MemoryKeyValueStore};
    use serde_json::json;

    #[test]
    fn get_returns_fallback_for_missing_and_malformed_documents() {
        let backend = MemoryKeyValueStore::new()
            .with_entry("lv:broken", "{not json")
            .with_entry("lv:number", "7");
        let persistence = Persistence::new(backend, "lv");

        assert_eq!(persistence.get("missing", 3_u8), 3);
        assert_eq!(persistence.get("broken", 3_u8), 3);
        assert_eq!(persistence.get("number", 3_u8), 7);
        assert!(!persistence.get("number", false));
    }

    #[test]
    fn set_writes_prefixed_json() {
        let mut persistence = Persistence::new(MemoryKeyValueStore::new(), "lv");
        persistence.set("order", &vec!["w_1", "w_2"]);
        assert_eq!(persistence.backend().raw("lv:order"), Some(r#"["w_1","w_2"]"#));
        assert_eq!(persistence.get_value("order"), Some(json!(["w_1", "w_2"])));
    }

    #[test]
    fn write_failures_are_swallowed_and_counted() {
        let mut persistence = Persistence::new(MemoryKeyValueStore::new().with_quota(4), "lv");
        persistence.set("filters", &json!({"search": "a long search"}));
        persistence.remove("filters");
        assert_eq!(persistence.write_failures(), 1);
        assert!(persistence.get_value("filters").is_none());
    }

    #[test]
    fn clear_namespace_keeps_foreign_keys() {
        let backend = MemoryKeyValueStore::new()
            .with_entry("lv:filters", "{}")
            .with_entry("lv:wt:hola|int", "4")
            .with_entry("v23:wt:hola|int", "2")
            .with_entry("unrelated", "1");
        let mut persistence = Persistence::new(backend, "lv");

        assert_eq!(persistence.clear_namespace(), 2);
        let remaining = persistence
            .backend()
            .keys_with_prefix("")
            .expect("scan should succeed");
        assert_eq!(
            remaining,
            vec!["unrelated".to_string(), "v23:wt:hola|int".to_string()]
        );
    }

    #[test]
    fn legacy_fallback_only_covers_absent_keys() {
        let backend = MemoryKeyValueStore::new()
            .with_entry("lv:filters", "{not json")
            .with_entry("v23:filters", r#"{"starred":true}"#)
            .with_entry("lv:sort", r#"{"key":"pos"}"#)
            .with_entry("v23:sort", r#"{"key":"spanish"}"#)
            .with_entry("v23:order", r#"["w_1"]"#);
        let persistence = Persistence::new(backend, "lv").with_legacy_namespace("v23");

        assert_eq!(persistence.get_value_or_legacy("filters"), None);
        assert_eq!(
            persistence.get_value_or_legacy("sort"),
            Some((json!({"key": "pos"}), ValueSource::Current))
        );
        assert_eq!(
            persistence.get_value_or_legacy("order"),
            Some((json!(["w_1"]), ValueSource::Legacy))
        );
        assert_eq!(persistence.get_value_or_legacy("ui"), None);
    }

    #[test]
    fn clear_legacy_namespace_leaves_current_keys() {
        let backend = MemoryKeyValueStore::new()
            .with_entry("lv:filters", "{}")
            .with_entry("v23:wt:hola|int", "4")
            .with_entry("v23:star:hola|int", "1");
        let mut persistence = Persistence::new(backend.clone(), "lv").with_legacy_namespace("v23");

        assert_eq!(persistence.clear_legacy_namespace(), 2);
        assert_eq!(persistence.backend().raw("lv:filters"), Some("{}"));
        assert!(persistence.legacy_value("wt:hola|int").is_none());

        let mut plain = Persistence::new(backend, "lv");
        assert_eq!(plain.clear_legacy_namespace(), 0);
        assert_eq!(plain.backend().raw("v23:wt:hola|int"), Some("4"));
    }

    #[test]
    fn legacy_reads_require_configured_namespace() {
        let backend = MemoryKeyValueStore::new().with_entry("v23:sort", r#"{"key":"spanish"}"#);
        let plain = Persistence::new(backend.clone(), "lv");
        assert!(plain.legacy_value("sort").is_none());

        let migrating = Persistence::new(backend, "lv").with_legacy_namespace("v23");
        assert_eq!(
            migrating.legacy_value("sort"),
            Some(serde_json::json!({"key": "spanish"}))
        );
    }
}
