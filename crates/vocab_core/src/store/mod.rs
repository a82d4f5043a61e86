//! Authoritative application state and its commit pipeline.
//!
//! # Responsibility
//! - Own the state snapshot, its persistence and its listeners.
//! - Route every mutation through sanitize, compare, assign, persist, notify.
//! - Hydrate the word list supplied by the loader.
//!
//! # Invariants
//! - A mutation that is canonically equal to the current value performs no
//!   write and emits no event.
//! - Persistence happens before notification.
//! - An accepted filter change clears the current selection.
//! - Storage failures never reach callers.

mod actions;
mod config;

pub use actions::TickOutcome;
pub use config::{StoreConfig, DEFAULT_NAMESPACE, LEGACY_NAMESPACE};

use crate::events::{
    EventBus, EventKind, ListenerId, ProgressChange, StoreEvent, WordsChange,
};
use crate::model::entry::{map_raw, VocabEntry};
use crate::model::filters::{FilterSet, Filters};
use crate::model::meta::{LoadMeta, LoaderStatus, WordsMeta};
use crate::model::view::{ColumnsState, SortState, UiState};
use crate::model::weight::{clamp_weight, Weight};
use crate::progress::{self, ProgressLedger, ProgressLookup};
use crate::sanitize::{
    canonical_filter_sets, filters_equal, sanitize_columns, sanitize_filter_sets,
    sanitize_filters, sanitize_order, sanitize_sort, sanitize_ui,
};
use crate::selection::{transition, SelectionInput};
use crate::selectors::{self, FacetValues, ViewSnapshot};
use crate::storage::{KeyValueStore, Persistence, ValueSource};
use crate::timers::{Debouncer, LongPressWatch};
use log::{debug, info};
use serde::Serialize;
use serde_json::Value;
use std::time::{SystemTime, UNIX_EPOCH};

/// Snapshot handed to readers and event handlers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub words: Vec<VocabEntry>,
    pub filters: Filters,
    pub filter_sets: Vec<FilterSet>,
    pub sort: SortState,
    pub columns: ColumnsState,
    /// Shuffle order; reconciled against the visible list on read.
    pub order: Vec<String>,
    pub ui: UiState,
    pub meta: WordsMeta,
}

/// Persisted, settable state keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKey {
    Filters,
    FilterSets,
    Sort,
    Columns,
    Order,
    Ui,
}

impl StateKey {
    pub const ALL: [StateKey; 6] = [
        Self::Filters,
        Self::FilterSets,
        Self::Sort,
        Self::Columns,
        Self::Order,
        Self::Ui,
    ];

    /// Logical storage key (without namespace).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Filters => "filters",
            Self::FilterSets => "filterSets",
            Self::Sort => "sort",
            Self::Columns => "columns",
            Self::Order => "order",
            Self::Ui => "ui",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == value)
    }

    pub fn event_kind(self) -> EventKind {
        match self {
            Self::Filters => EventKind::Filters,
            Self::FilterSets => EventKind::FilterSets,
            Self::Sort => EventKind::Sort,
            Self::Columns => EventKind::Columns,
            Self::Order => EventKind::Order,
            Self::Ui => EventKind::Ui,
        }
    }
}

pub struct Store<S: KeyValueStore> {
    state: AppState,
    persistence: Persistence<S>,
    bus: EventBus,
    search: Debouncer<String>,
    long_press: LongPressWatch,
}

impl<S: KeyValueStore> Store<S> {
    /// Opens a store over `backend` with default configuration.
    pub fn new(backend: S) -> Self {
        Self::with_config(backend, StoreConfig::default())
    }

    /// Opens a store and loads persisted state, migrating legacy values.
    pub fn with_config(backend: S, config: StoreConfig) -> Self {
        let mut persistence = Persistence::new(backend, config.namespace);
        if let Some(legacy) = config.legacy_namespace {
            persistence = persistence.with_legacy_namespace(legacy);
        }

        let mut legacy_reads = 0usize;
        let mut load = |key: StateKey| -> Value {
            match persistence.get_value_or_legacy(key.as_str()) {
                Some((value, ValueSource::Current)) => value,
                Some((value, ValueSource::Legacy)) => {
                    legacy_reads += 1;
                    value
                }
                None => Value::Null,
            }
        };

        let state = AppState {
            words: Vec::new(),
            filters: sanitize_filters(&load(StateKey::Filters)),
            filter_sets: sanitize_filter_sets(&load(StateKey::FilterSets)),
            sort: sanitize_sort(&load(StateKey::Sort)),
            columns: sanitize_columns(&load(StateKey::Columns)),
            order: sanitize_order(&load(StateKey::Order)),
            ui: sanitize_ui(&load(StateKey::Ui)),
            meta: WordsMeta::default(),
        };

        info!(
            "event=store_load module=store status=ok namespace={} filter_sets={} order_len={} legacy_reads={}",
            persistence.namespace(),
            state.filter_sets.len(),
            state.order.len(),
            legacy_reads
        );

        Self {
            state,
            persistence,
            bus: EventBus::new(),
            search: Debouncer::new(config.search_debounce),
            long_press: LongPressWatch::new(config.long_press),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    pub fn into_backend(self) -> S {
        self.persistence.into_backend()
    }

    /// Sanitizes `value` for `key` and commits it when it differs.
    ///
    /// Returns `true` when the state changed.
    pub fn set(&mut self, key: StateKey, value: &Value) -> bool {
        match key {
            StateKey::Filters => self.commit_filters(sanitize_filters(value)),
            StateKey::FilterSets => self.commit_filter_sets(sanitize_filter_sets(value)),
            StateKey::Sort => self.commit_sort(sanitize_sort(value)),
            StateKey::Columns => self.commit_columns(sanitize_columns(value)),
            StateKey::Order => self.commit_order(sanitize_order(value)),
            StateKey::Ui => self.commit_ui(sanitize_ui(value)),
        }
    }

    pub fn set_filters(&mut self, filters: &Filters) -> bool {
        self.set(StateKey::Filters, &to_json(filters))
    }

    pub fn set_filter_sets(&mut self, sets: &[FilterSet]) -> bool {
        self.set(StateKey::FilterSets, &to_json(sets))
    }

    pub fn set_sort(&mut self, sort: SortState) -> bool {
        self.set(StateKey::Sort, &to_json(&sort))
    }

    pub fn set_columns(&mut self, columns: ColumnsState) -> bool {
        self.set(StateKey::Columns, &to_json(&columns))
    }

    pub fn set_order(&mut self, order: &[String]) -> bool {
        self.set(StateKey::Order, &to_json(order))
    }

    pub fn clear_order(&mut self) -> bool {
        self.commit_order(Vec::new())
    }

    pub fn set_ui(&mut self, ui: &UiState) -> bool {
        self.set(StateKey::Ui, &to_json(ui))
    }

    fn commit_filters(&mut self, next: Filters) -> bool {
        if filters_equal(&self.state.filters, &next) {
            return self.skip(StateKey::Filters);
        }
        self.state.filters = next;
        self.persist_and_publish(StateKey::Filters);
        self.apply_selection(SelectionInput::FiltersCommitted);
        true
    }

    fn commit_filter_sets(&mut self, next: Vec<FilterSet>) -> bool {
        if canonical_filter_sets(&self.state.filter_sets) == canonical_filter_sets(&next) {
            return self.skip(StateKey::FilterSets);
        }
        self.state.filter_sets = next;
        self.persist_and_publish(StateKey::FilterSets);
        true
    }

    fn commit_sort(&mut self, next: SortState) -> bool {
        if self.state.sort == next {
            return self.skip(StateKey::Sort);
        }
        self.state.sort = next;
        self.persist_and_publish(StateKey::Sort);
        true
    }

    fn commit_columns(&mut self, next: ColumnsState) -> bool {
        if self.state.columns == next {
            return self.skip(StateKey::Columns);
        }
        self.state.columns = next;
        self.persist_and_publish(StateKey::Columns);
        true
    }

    fn commit_order(&mut self, next: Vec<String>) -> bool {
        if self.state.order == next {
            return self.skip(StateKey::Order);
        }
        self.state.order = next;
        self.persist_and_publish(StateKey::Order);
        true
    }

    fn commit_ui(&mut self, next: UiState) -> bool {
        if self.state.ui == next {
            return self.skip(StateKey::Ui);
        }
        self.state.ui = next;
        self.persist_and_publish(StateKey::Ui);
        true
    }

    fn skip(&self, key: StateKey) -> bool {
        debug!(
            "event=store_commit module=store status=skip key={}",
            key.as_str()
        );
        false
    }

    fn persist_and_publish(&mut self, key: StateKey) {
        let name = key.as_str();
        let state = &self.state;
        let event = match key {
            StateKey::Filters => {
                self.persistence.set(name, &state.filters);
                StoreEvent::FiltersChanged(state.filters.clone())
            }
            StateKey::FilterSets => {
                self.persistence.set(name, &state.filter_sets);
                StoreEvent::FilterSetsChanged(state.filter_sets.clone())
            }
            StateKey::Sort => {
                self.persistence.set(name, &state.sort);
                StoreEvent::SortChanged(state.sort)
            }
            StateKey::Columns => {
                self.persistence.set(name, &state.columns);
                StoreEvent::ColumnsChanged(state.columns)
            }
            StateKey::Order => {
                self.persistence.set(name, &state.order);
                StoreEvent::OrderChanged(state.order.clone())
            }
            StateKey::Ui => {
                self.persistence.set(name, &state.ui);
                StoreEvent::UiChanged(state.ui.clone())
            }
        };
        debug!("event=store_commit module=store status=ok key={name}");
        self.bus.publish(&event, &self.state);
    }

    pub(crate) fn apply_selection(&mut self, input: SelectionInput<'_>) -> bool {
        let next = transition(&self.state.ui, input);
        self.commit_ui(next)
    }

    /// Replaces the word list with mapped loader rows and emits
    /// `WordsChanged`. Word lists are not persisted.
    pub fn hydrate_words(&mut self, rows: &[Value], meta: LoadMeta) -> usize {
        let words = map_raw(rows);
        let count = words.len();
        self.state.words = words;
        self.state.meta = WordsMeta {
            words_source: meta.source,
            words_loaded_at_ms: meta.loaded_at_ms.unwrap_or_else(now_epoch_ms),
            loader_status: meta
                .loader_status
                .unwrap_or(self.state.meta.loader_status),
        };

        info!(
            "event=words_hydrate module=store status=ok count={} source={} loader_status={}",
            count,
            self.state.meta.words_source,
            self.state.meta.loader_status.as_str()
        );

        let event = StoreEvent::WordsChanged(WordsChange {
            count,
            meta: self.state.meta.clone(),
        });
        self.bus.publish(&event, &self.state);
        count
    }

    /// Updates loader status only; listeners are not notified.
    pub fn set_loader_status(&mut self, status: LoaderStatus) {
        self.state.meta.loader_status = status;
    }

    /// Clears every persisted key, legacy records included, then returns
    /// each domain key to its default. Only keys that actually change emit
    /// events.
    pub fn reset_persistent_state(&mut self) {
        let removed = self.persistence.clear_namespace();
        let legacy_removed = self.persistence.clear_legacy_namespace();
        info!(
            "event=store_reset module=store status=ok removed_keys={} legacy_removed_keys={}",
            removed, legacy_removed
        );

        self.commit_filters(Filters::default());
        self.commit_filter_sets(Vec::new());
        self.commit_sort(SortState::default());
        self.commit_columns(ColumnsState::default());
        self.commit_order(Vec::new());
        self.commit_ui(UiState::default());
    }

    /// Notifies generic subscribers without changing state.
    pub fn force_refresh(&mut self) {
        self.bus.notify_subscribers();
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut() + 'static) -> ListenerId {
        self.bus.subscribe(subscriber)
    }

    pub fn on(
        &mut self,
        kind: EventKind,
        handler: impl FnMut(&StoreEvent, &AppState) + 'static,
    ) -> ListenerId {
        self.bus.on(kind, handler)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.bus.remove(id)
    }

    pub fn off(&mut self, id: ListenerId) -> bool {
        self.bus.remove(id)
    }

    /// Emissions of `kind` that reached at least one handler.
    pub fn event_count(&self, kind: EventKind) -> u64 {
        self.bus.event_count(kind)
    }

    pub fn write_failures(&self) -> u64 {
        self.persistence.write_failures()
    }

    pub fn set_star(&mut self, term_key: &str, value: bool) {
        let change = progress::write_star(&mut self.persistence, term_key, value);
        self.publish_progress(change);
    }

    /// Stores the clamped weight and returns it.
    pub fn set_weight(&mut self, term_key: &str, value: i64) -> Weight {
        let change = progress::write_weight(&mut self.persistence, term_key, value);
        self.publish_progress(change);
        clamp_weight(value)
    }

    /// Like [`Store::set_weight`] without notifying listeners.
    pub fn set_weight_silently(&mut self, term_key: &str, value: i64) -> Weight {
        progress::write_weight(&mut self.persistence, term_key, value);
        clamp_weight(value)
    }

    fn publish_progress(&mut self, change: ProgressChange) {
        debug!(
            "event=progress_write module=store status=ok field={}",
            match change {
                ProgressChange::Star { .. } => "star",
                ProgressChange::Weight { .. } => "weight",
            }
        );
        self.bus
            .publish(&StoreEvent::ProgressChanged(change), &self.state);
    }

    /// Filtered, sorted and order-merged entries.
    pub fn visible_words(&self) -> Vec<&VocabEntry> {
        let snapshot = ViewSnapshot {
            words: &self.state.words,
            filters: &self.state.filters,
            sort: self.state.sort,
            order: &self.state.order,
            progress: self,
        };
        selectors::visible_words(&snapshot)
    }

    pub fn facet_values(&self) -> FacetValues {
        selectors::facet_values(&self.state.words)
    }

    pub fn active_filter_count(&self) -> usize {
        selectors::active_filter_count(&self.state.filters)
    }
}

impl<S: KeyValueStore> ProgressLookup for Store<S> {
    fn star(&self, term_key: &str) -> bool {
        ProgressLedger::new(&self.persistence).star(term_key)
    }

    fn weight(&self, term_key: &str) -> Weight {
        ProgressLedger::new(&self.persistence).weight(term_key)
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_default()
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or_default()
}
