//! Filter state, saved filter presets and their comparison forms.

use super::weight::{Weight, ALL_WEIGHTS};
use serde::{Deserialize, Serialize};

/// Live filter selection applied to the word list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filters {
    pub starred: bool,
    /// Allowed weights, ascending and unique. Never empty.
    pub weight: Vec<Weight>,
    pub search: String,
    pub pos: Vec<String>,
    pub cefr: Vec<String>,
    pub tags: Vec<String>,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            starred: false,
            weight: ALL_WEIGHTS.to_vec(),
            search: String::new(),
            pos: Vec::new(),
            cefr: Vec::new(),
            tags: Vec::new(),
        }
    }
}

/// Named, persisted filter preset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSet {
    pub id: String,
    pub name: String,
    pub filters: Filters,
}

/// Comparison-only form of [`Filters`].
///
/// Lists are lower-cased and sorted, so two filter states that differ only
/// in insertion order or casing compare (and serialize) equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalFilters {
    pub starred: bool,
    pub search: String,
    pub weight: Vec<Weight>,
    pub pos: Vec<String>,
    pub cefr: Vec<String>,
    pub tags: Vec<String>,
}

/// Comparison-only form of a [`FilterSet`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalFilterSet {
    pub id: String,
    pub name: String,
    pub filters: CanonicalFilters,
}
