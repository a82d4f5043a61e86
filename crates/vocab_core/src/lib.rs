//! Client-side application state engine for the vocabulary trainer.
//! This crate owns persisted UI state, progress records and derived views.

pub mod db;
pub mod events;
pub mod logging;
pub mod model;
pub mod progress;
pub mod sanitize;
pub mod selection;
pub mod selectors;
pub mod storage;
pub mod store;
pub mod timers;

pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use events::{EventBus, EventKind, ListenerId, ProgressChange, StoreEvent, WordsChange};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::{
    ColumnKey, ColumnsState, FilterSet, Filters, LoadMeta, LoaderStatus, SortDirection, SortKey,
    SortState, UiState, VocabEntry, Weight, WordsMeta,
};
pub use progress::{ProgressLedger, ProgressLookup, ProgressRecord, ProgressSnapshot};
pub use selection::{Selection, SelectionInput};
pub use selectors::{
    active_filter_count, apply_filters, facet_values, merge_order, shuffled_ids, sort_words,
    visible_words, FacetValues, ViewSnapshot,
};
pub use storage::{
    KeyValueStore, MemoryKeyValueStore, Persistence, SqliteKeyValueStore, StorageError,
    StorageResult, ValueSource,
};
pub use store::{AppState, StateKey, Store, StoreConfig, TickOutcome};
pub use timers::{Debouncer, LongPressConfig, LongPressWatch, PointerButton, PointerPress};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
