//! Filters, filter sets and the weight scale migration.

use super::is_truthy;
use crate::model::filters::{CanonicalFilterSet, CanonicalFilters, FilterSet, Filters};
use crate::model::weight::{Weight, ALL_WEIGHTS, MAX_WEIGHT, MIN_WEIGHT};
use serde_json::Value;
use std::collections::HashSet;

const LEGACY_MAX_WEIGHT: i64 = 4;

/// Reads an integral weight from a JSON number or numeric string.
fn weight_number(value: &Value) -> Option<i64> {
    let number = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !number.is_finite() || number.fract() != 0.0 || number.abs() > 1e9 {
        return None;
    }
    Some(number as i64)
}

/// Maps a weight of unknown scale onto 1..=5.
///
/// 1..=5 are taken as current; `0` only exists on the legacy scale and
/// becomes `1`. Anything else is dropped.
pub fn to_new_weight_number(value: i64) -> Option<Weight> {
    match value {
        n if (i64::from(MIN_WEIGHT)..=i64::from(MAX_WEIGHT)).contains(&n) => Some(n as Weight),
        0 => Some(MIN_WEIGHT),
        _ => None,
    }
}

/// JSON flavour of [`to_new_weight_number`].
pub fn to_new_weight(value: &Value) -> Option<Weight> {
    weight_number(value).and_then(to_new_weight_number)
}

/// Upgrades a value known to be on the legacy 0..=4 scale.
pub fn from_legacy_weight(value: &Value) -> Option<Weight> {
    let number = weight_number(value)?;
    (0..=LEGACY_MAX_WEIGHT)
        .contains(&number)
        .then(|| (number + 1) as Weight)
}

// A list holding 0 but no 5 can only come from the legacy scale.
fn sanitize_weight_list(value: &Value) -> Vec<Weight> {
    let numbers: Vec<i64> = value
        .as_array()
        .map(|items| items.iter().filter_map(weight_number).collect())
        .unwrap_or_default();
    let legacy = numbers.contains(&0) && !numbers.contains(&i64::from(MAX_WEIGHT));

    let mut weights: Vec<Weight> = Vec::new();
    for number in numbers {
        let mapped = if legacy {
            (0..=LEGACY_MAX_WEIGHT)
                .contains(&number)
                .then(|| (number + 1) as Weight)
        } else {
            to_new_weight_number(number)
        };
        if let Some(weight) = mapped {
            if !weights.contains(&weight) {
                weights.push(weight);
            }
        }
    }

    if weights.is_empty() {
        return ALL_WEIGHTS.to_vec();
    }
    weights.sort_unstable();
    weights
}

/// Trims, drops blanks and de-duplicates case-insensitively, keeping the
/// first-seen spelling.
fn sanitize_string_list(value: &Value) -> Vec<String> {
    let mut seen = HashSet::new();
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .filter(|item| seen.insert(item.to_lowercase()))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

pub fn sanitize_filters(value: &Value) -> Filters {
    Filters {
        starred: value.get("starred").is_some_and(is_truthy),
        weight: sanitize_weight_list(value.get("weight").unwrap_or(&Value::Null)),
        search: value
            .get("search")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        pos: sanitize_string_list(value.get("pos").unwrap_or(&Value::Null)),
        cefr: sanitize_string_list(value.get("cefr").unwrap_or(&Value::Null)),
        tags: sanitize_string_list(value.get("tags").unwrap_or(&Value::Null)),
    }
}

/// Sanitizes a filter-set list, repairing ids and names.
///
/// Blank ids become `fs_<index>`; duplicate ids get `_<index>` appended
/// until unique. Blank names become `Set <index + 1>`.
pub fn sanitize_filter_sets(value: &Value) -> Vec<FilterSet> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };

    let mut used_ids = HashSet::new();
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let mut id = item
                .get("id")
                .and_then(Value::as_str)
                .map(str::trim)
                .unwrap_or_default()
                .to_string();
            if id.is_empty() {
                id = format!("fs_{idx}");
            }
            while used_ids.contains(&id) {
                id = format!("{id}_{idx}");
            }
            used_ids.insert(id.clone());

            let name = item
                .get("name")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map_or_else(|| format!("Set {}", idx + 1), str::to_string);

            FilterSet {
                id,
                name,
                filters: sanitize_filters(item.get("filters").unwrap_or(&Value::Null)),
            }
        })
        .collect()
}

fn canonical_list(list: &[String]) -> Vec<String> {
    let mut out: Vec<String> = list
        .iter()
        .map(|item| item.to_lowercase())
        .filter(|item| !item.is_empty())
        .collect();
    out.sort();
    out
}

fn canonicalize(clean: Filters) -> CanonicalFilters {
    CanonicalFilters {
        starred: clean.starred,
        search: clean.search,
        weight: clean.weight,
        pos: canonical_list(&clean.pos),
        cefr: canonical_list(&clean.cefr),
        tags: canonical_list(&clean.tags),
    }
}

/// Canonical comparison form of a filter state.
///
/// The input is re-sanitized first, so hand-built `Filters` values compare
/// the same way stored ones do.
pub fn canonical_filters(filters: &Filters) -> CanonicalFilters {
    let raw = serde_json::to_value(filters).unwrap_or_default();
    canonicalize(sanitize_filters(&raw))
}

pub fn canonical_filter_sets(sets: &[FilterSet]) -> Vec<CanonicalFilterSet> {
    sets.iter()
        .map(|set| CanonicalFilterSet {
            id: set.id.clone(),
            name: set.name.clone(),
            filters: canonical_filters(&set.filters),
        })
        .collect()
}

/// Canonical serialized key for any JSON filter value.
pub fn filters_key(value: &Value) -> String {
    let canonical = canonicalize(sanitize_filters(value));
    serde_json::to_string(&canonical).unwrap_or_default()
}

pub fn filters_equal(left: &Filters, right: &Filters) -> bool {
    canonical_filters(left) == canonical_filters(right)
}
