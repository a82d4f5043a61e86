//! On-disk home of the persisted state documents.
//!
//! Every persisted value lives as one row of [`STATE_TABLE`]:
//! `key` is the namespaced logical key (`lv:filters`, `lv:wt:<termKey>`),
//! `value` the JSON document text, and `updated_at` the last write time in
//! epoch milliseconds. Rows from older builds (`v23:*`) share the table.
//!
//! # Invariants
//! - The schema revision is `PRAGMA user_version`; a file stamped with a
//!   revision this build does not know is refused, never downgraded.
//! - Connections handed out by [`open_db`] already carry the table.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

/// Table holding one JSON document per namespaced key.
pub const STATE_TABLE: &str = "kv_entries";

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The state file was written by a newer build.
    SchemaTooNew { found: u32, supported: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "state database error: {err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "state file uses schema {found}; this build reads up to {supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
