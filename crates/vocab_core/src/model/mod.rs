//! Domain model for the vocabulary app state.
//!
//! # Responsibility
//! - Define the canonical shapes held by the store and persisted as JSON.
//! - Keep serialized field names identical to the stored documents.
//!
//! # Invariants
//! - Every shape here is already sanitized when it lives inside the store;
//!   raw input only enters through `crate::sanitize`.

pub mod entry;
pub mod filters;
pub mod meta;
pub mod view;
pub mod weight;

pub use entry::{map_raw, map_raw_row, normalize_tags_list, stable_id, term_key, VocabEntry};
pub use filters::{CanonicalFilterSet, CanonicalFilters, FilterSet, Filters};
pub use meta::{LoadMeta, LoaderStatus, WordsMeta};
pub use view::{ColumnKey, ColumnsState, SortDirection, SortKey, SortState, UiState};
pub use weight::{clamp_weight, Weight, DEFAULT_WEIGHT, MAX_WEIGHT, MIN_WEIGHT};
