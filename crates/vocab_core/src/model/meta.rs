//! Word-list load metadata carried alongside the entries.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoaderStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Error,
}

impl LoaderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Loaded => "loaded",
            Self::Error => "error",
        }
    }
}

/// Metadata supplied by the loader when hydrating words.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadMeta {
    /// Source tag, e.g. `tsv`.
    pub source: String,
    /// Epoch milliseconds; `None` means "now".
    pub loaded_at_ms: Option<i64>,
    /// `None` keeps the current status.
    pub loader_status: Option<LoaderStatus>,
}

/// Metadata about the word list currently held by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WordsMeta {
    pub words_source: String,
    pub words_loaded_at_ms: i64,
    pub loader_status: LoaderStatus,
}
