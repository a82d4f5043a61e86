//! Store construction options.

use crate::timers::{LongPressConfig, DEFAULT_SEARCH_DEBOUNCE};
use std::time::Duration;

pub const DEFAULT_NAMESPACE: &str = "lv";
pub const LEGACY_NAMESPACE: &str = "v23";

#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// Prefix for every persisted key.
    pub namespace: String,
    /// Read-only fallback prefix; `None` disables legacy reads.
    pub legacy_namespace: Option<String>,
    pub search_debounce: Duration,
    pub long_press: LongPressConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            legacy_namespace: Some(LEGACY_NAMESPACE.to_string()),
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
            long_press: LongPressConfig::default(),
        }
    }
}

impl StoreConfig {
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn without_legacy(mut self) -> Self {
        self.legacy_namespace = None;
        self
    }
}
