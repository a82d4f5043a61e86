//! Key-value substrate abstractions and the namespaced persistence layer.
//!
//! # Responsibility
//! - Define the storage capability the store depends on (`KeyValueStore`).
//! - Provide an in-memory test double and a SQLite-backed implementation.
//! - Wrap a backend in `Persistence`, which namespaces keys, (de)serializes
//!   JSON documents and absorbs every backend failure.
//!
//! # Invariants
//! - Backend errors never cross `Persistence` toward callers.
//! - Every key written by `Persistence` carries the namespace prefix.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;
pub mod persistence;
pub mod sqlite;

pub use memory::MemoryKeyValueStore;
pub use persistence::{Persistence, ValueSource};
pub use sqlite::SqliteKeyValueStore;

pub type StorageResult<T> = Result<T, StorageError>;

/// Failure reported by a key-value backend.
#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    /// The write would grow the store beyond its byte budget.
    QuotaExceeded {
        needed_bytes: usize,
        quota_bytes: usize,
    },
    /// The substrate refuses access (disabled, locked down, torn down).
    Unavailable(String),
    Serialize(serde_json::Error),
    /// The connection does not carry the expected schema.
    MissingTable(&'static str),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::QuotaExceeded {
                needed_bytes,
                quota_bytes,
            } => write!(
                f,
                "storage quota exceeded: need {needed_bytes} bytes, quota is {quota_bytes}"
            ),
            Self::Unavailable(reason) => write!(f, "storage unavailable: {reason}"),
            Self::Serialize(err) => write!(f, "failed to serialize value: {err}"),
            Self::MissingTable(table) => write!(f, "required table `{table}` is missing"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::QuotaExceeded { .. } | Self::Unavailable(_) | Self::MissingTable(_) => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Raw string-to-string storage capability.
///
/// Keys are full keys (namespace included); values are serialized JSON.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;
    fn remove(&mut self, key: &str) -> StorageResult<()>;
    /// Returns every stored key starting with `prefix`, sorted.
    fn keys_with_prefix(&self, prefix: &str) -> StorageResult<Vec<String>>;
}
