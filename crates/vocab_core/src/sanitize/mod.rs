//! Total, idempotent normalization of persisted state.
//!
//! # Responsibility
//! - Turn any JSON value (including `null` and wrong types) into a valid
//!   domain shape, filling defaults for whatever is missing or invalid.
//! - Migrate fields written by older builds (weight scale 0..=4, the
//!   `spanish`/`english` column names).
//! - Produce canonical comparison forms for filters and filter sets.
//!
//! # Invariants
//! - `sanitize_x(&to_value(sanitize_x(v))) == sanitize_x(v)` for every `v`.
//! - No function in this module can fail or panic on input data.

mod filters;
mod view;

pub use filters::{
    canonical_filter_sets, canonical_filters, filters_equal, filters_key, from_legacy_weight,
    sanitize_filter_sets, sanitize_filters, to_new_weight, to_new_weight_number,
};
pub use view::{sanitize_columns, sanitize_order, sanitize_sort, sanitize_ui};

use serde_json::Value;

/// JavaScript-style truthiness, matching how older builds stored flags.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Maps column/sort names from the bilingual schema to current names.
pub(crate) fn migrate_field_name(name: &str) -> &str {
    match name {
        "spanish" => "word",
        "english" => "definition",
        other => other,
    }
}
