//! SQLite-backed key-value store.
//!
//! # Responsibility
//! - Persist namespaced JSON documents in the `kv_entries` table.
//! - Keep SQL details inside the storage boundary.
//!
//! # Invariants
//! - The wrapped connection must have migrations applied (`kv_entries` exists).
//! - `set` is an upsert; `updated_at` tracks the last write in epoch ms.

use super::{KeyValueStore, StorageError, StorageResult};
use crate::db::{open_db, open_db_in_memory, STATE_TABLE};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Production key-value store owning one SQLite connection.
pub struct SqliteKeyValueStore {
    conn: Connection,
}

impl SqliteKeyValueStore {
    /// Wraps a migrated connection, verifying the schema is present.
    pub fn try_new(conn: Connection) -> StorageResult<Self> {
        if !table_exists(&conn, STATE_TABLE)? {
            return Err(StorageError::MissingTable(STATE_TABLE));
        }
        Ok(Self { conn })
    }

    /// Opens or creates the state database at `path`.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        Self::try_new(open_db(path)?)
    }

    /// Opens a throwaway in-memory state database.
    pub fn open_in_memory() -> StorageResult<Self> {
        Self::try_new(open_db_in_memory()?)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn into_inner(self) -> Connection {
        self.conn
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT value FROM kv_entries WHERE key = ?1;")?;
        let value = stmt
            .query_row([key], |row| row.get::<_, String>(0))
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
        )?;
        stmt.execute(params![key, value])?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        let mut stmt = self
            .conn
            .prepare_cached("DELETE FROM kv_entries WHERE key = ?1;")?;
        stmt.execute([key])?;
        Ok(())
    }

    fn keys_with_prefix(&self, prefix: &str) -> StorageResult<Vec<String>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT key
             FROM kv_entries
             WHERE substr(key, 1, length(?1)) = ?1
             ORDER BY key ASC;",
        )?;
        let mut rows = stmt.query([prefix])?;
        let mut keys = Vec::new();
        while let Some(row) = rows.next()? {
            keys.push(row.get(0)?);
        }
        Ok(keys)
    }
}

fn table_exists(conn: &Connection, table: &str) -> StorageResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
