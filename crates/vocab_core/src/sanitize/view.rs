//! Sort, column, UI and order sanitizers.

use super::{is_truthy, migrate_field_name};
use crate::model::view::{ColumnKey, ColumnsState, SortDirection, SortKey, SortState, UiState};
use serde_json::Value;

/// Non-objects reset to the default sort; unknown keys fall back to `word`.
pub fn sanitize_sort(value: &Value) -> SortState {
    if !value.is_object() {
        return SortState::default();
    }

    let key = value
        .get("key")
        .and_then(Value::as_str)
        .map(migrate_field_name)
        .and_then(SortKey::parse)
        .unwrap_or_default();
    let dir = match value.get("dir").and_then(Value::as_str) {
        Some("desc") => SortDirection::Desc,
        _ => SortDirection::Asc,
    };
    SortState { key, dir }
}

/// Starts from all-visible and applies every recognised key.
pub fn sanitize_columns(value: &Value) -> ColumnsState {
    let mut columns = ColumnsState::default();
    let Some(entries) = value.as_object() else {
        return columns;
    };

    for (name, flag) in entries {
        if let Some(column) = ColumnKey::parse(migrate_field_name(name)) {
            columns.set_visible(column, is_truthy(flag));
        }
    }
    columns
}

pub fn sanitize_ui(value: &Value) -> UiState {
    UiState {
        show_translation: value.get("showTranslation").is_some_and(is_truthy),
        current_word_id: value
            .get("currentWordId")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        row_selection_mode: value.get("rowSelectionMode").is_some_and(is_truthy),
        debug_panel: value.get("debugPanel").is_some_and(is_truthy),
    }
}

/// Keeps string members only. Duplicates and stale ids are left for the
/// order-merge to skip.
pub fn sanitize_order(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{sanitize_columns, sanitize_order, sanitize_sort, sanitize_ui};
    use crate::model::view::{ColumnsState, SortDirection, SortKey, SortState};
    use serde_json::json;

    #[test]
    fn sort_migrates_bilingual_keys() {
        assert_eq!(
            sanitize_sort(&json!({"key": "spanish", "dir": "desc"})),
            SortState::new(SortKey::Word, SortDirection::Desc)
        );
        assert_eq!(
            sanitize_sort(&json!({"key": "english"})).key,
            SortKey::Definition
        );
    }

    #[test]
    fn sort_keeps_unsorted_and_defaults_unknown_keys() {
        assert_eq!(sanitize_sort(&json!({"key": ""})).key, SortKey::Unsorted);
        assert_eq!(sanitize_sort(&json!({"key": "rank"})).key, SortKey::Word);
        assert_eq!(sanitize_sort(&json!({"key": 3, "dir": "DESC"})), SortState::default());
        assert_eq!(sanitize_sort(&json!([1, 2])), SortState::default());
    }

    #[test]
    fn columns_map_legacy_names_and_drop_unknown_keys() {
        let columns = sanitize_columns(&json!({
            "spanish": false,
            "english": 0,
            "cefr": null,
            "rank": false
        }));
        assert!(!columns.word);
        assert!(!columns.definition);
        assert!(!columns.cefr);
        assert!(columns.tags);
        assert_eq!(sanitize_columns(&json!("all")), ColumnsState::default());
    }

    #[test]
    fn ui_requires_string_selection() {
        let ui = sanitize_ui(&json!({"currentWordId": 12, "rowSelectionMode": 1}));
        assert_eq!(ui.current_word_id, "");
        assert!(ui.row_selection_mode);
        assert!(!ui.debug_panel);
    }

    #[test]
    fn order_keeps_only_strings() {
        assert_eq!(
            sanitize_order(&json!(["w_1", 2, null, "w_1"])),
            vec!["w_1".to_string(), "w_1".to_string()]
        );
        assert!(sanitize_order(&json!({"0": "w_1"})).is_empty());
    }
}
