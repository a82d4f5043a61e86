//! Change notification for store consumers.
//!
//! # Responsibility
//! - Dispatch payload-free "something changed" callbacks (subscribers).
//! - Dispatch typed per-kind events to handlers registered with `on`.
//! - Count emissions per kind for diagnostics.
//!
//! # Invariants
//! - Subscribers always run before per-kind handlers for the same change.
//! - Listeners run synchronously in registration order.
//! - Handlers see the store state only through `&AppState`, so they cannot
//!   mutate the store while a notification is in flight.

use crate::model::filters::{FilterSet, Filters};
use crate::model::meta::WordsMeta;
use crate::model::view::{ColumnsState, SortState, UiState};
use crate::model::weight::Weight;
use crate::store::AppState;
use std::collections::HashMap;

/// Closed set of per-domain events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Filters,
    FilterSets,
    Sort,
    Columns,
    Order,
    Ui,
    Words,
    Progress,
}

impl EventKind {
    pub const ALL: [EventKind; 8] = [
        Self::Filters,
        Self::FilterSets,
        Self::Sort,
        Self::Columns,
        Self::Order,
        Self::Ui,
        Self::Words,
        Self::Progress,
    ];

    /// Stable event name used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Filters => "filtersChanged",
            Self::FilterSets => "filterSetsChanged",
            Self::Sort => "sortChanged",
            Self::Columns => "columnsChanged",
            Self::Order => "orderChanged",
            Self::Ui => "uiChanged",
            Self::Words => "wordsChanged",
            Self::Progress => "progressChanged",
        }
    }
}

/// Payload of a word-list replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordsChange {
    pub count: usize,
    pub meta: WordsMeta,
}

/// Payload of a progress write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressChange {
    Star { term_key: String, value: bool },
    Weight { term_key: String, value: Weight },
}

impl ProgressChange {
    pub fn term_key(&self) -> &str {
        match self {
            Self::Star { term_key, .. } | Self::Weight { term_key, .. } => term_key,
        }
    }
}

/// A committed change together with its new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    FiltersChanged(Filters),
    FilterSetsChanged(Vec<FilterSet>),
    SortChanged(SortState),
    ColumnsChanged(ColumnsState),
    OrderChanged(Vec<String>),
    UiChanged(UiState),
    WordsChanged(WordsChange),
    ProgressChanged(ProgressChange),
}

impl StoreEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::FiltersChanged(_) => EventKind::Filters,
            Self::FilterSetsChanged(_) => EventKind::FilterSets,
            Self::SortChanged(_) => EventKind::Sort,
            Self::ColumnsChanged(_) => EventKind::Columns,
            Self::OrderChanged(_) => EventKind::Order,
            Self::UiChanged(_) => EventKind::Ui,
            Self::WordsChanged(_) => EventKind::Words,
            Self::ProgressChanged(_) => EventKind::Progress,
        }
    }
}

/// Handle returned on registration; pass it back to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Subscriber = Box<dyn FnMut()>;
type Handler = Box<dyn FnMut(&StoreEvent, &AppState)>;

#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    subscribers: Vec<(ListenerId, Subscriber)>,
    handlers: HashMap<EventKind, Vec<(ListenerId, Handler)>>,
    counts: HashMap<EventKind, u64>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut() + 'static) -> ListenerId {
        let id = self.allocate_id();
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    pub fn on(
        &mut self,
        kind: EventKind,
        handler: impl FnMut(&StoreEvent, &AppState) + 'static,
    ) -> ListenerId {
        let id = self.allocate_id();
        self.handlers
            .entry(kind)
            .or_default()
            .push((id, Box::new(handler)));
        id
    }

    /// Removes a subscriber or handler. Returns `false` for unknown ids.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        if let Some(pos) = self.subscribers.iter().position(|(known, _)| *known == id) {
            self.subscribers.remove(pos);
            return true;
        }

        let mut emptied = None;
        let mut removed = false;
        for (kind, handlers) in &mut self.handlers {
            if let Some(pos) = handlers.iter().position(|(known, _)| *known == id) {
                handlers.remove(pos);
                removed = true;
                if handlers.is_empty() {
                    emptied = Some(*kind);
                }
                break;
            }
        }
        if let Some(kind) = emptied {
            self.handlers.remove(&kind);
        }
        removed
    }

    pub fn notify_subscribers(&mut self) {
        for (_, subscriber) in &mut self.subscribers {
            subscriber();
        }
    }

    /// Runs handlers for `event.kind()` only.
    pub fn emit(&mut self, event: &StoreEvent, state: &AppState) {
        let kind = event.kind();
        let Some(handlers) = self.handlers.get_mut(&kind) else {
            return;
        };
        if handlers.is_empty() {
            return;
        }
        *self.counts.entry(kind).or_default() += 1;
        for (_, handler) in handlers.iter_mut() {
            handler(event, state);
        }
    }

    /// Subscribers first, then per-kind handlers.
    pub fn publish(&mut self, event: &StoreEvent, state: &AppState) {
        self.notify_subscribers();
        self.emit(event, state);
    }

    /// Emissions of `kind` that reached at least one handler.
    pub fn event_count(&self, kind: EventKind) -> u64 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    pub fn listener_count(&self) -> usize {
        self.subscribers.len() + self.handlers.values().map(Vec::len).sum::<usize>()
    }

    fn allocate_id(&mut self) -> ListenerId {
        self.next_id += 1;
        ListenerId(self.next_id)
    }
}
