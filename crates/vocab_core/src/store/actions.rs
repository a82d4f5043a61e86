//! User-level actions composed from store commits.

use super::Store;
use crate::model::filters::FilterSet;
use crate::model::view::{SortDirection, SortKey, SortState};
use crate::sanitize::filters_equal;
use crate::selection::SelectionInput;
use crate::selectors::{apply_filters, shuffled_ids, sort_words};
use crate::storage::KeyValueStore;
use crate::timers::PointerPress;
use log::{debug, info};
use rand::Rng;
use std::time::Instant;
use uuid::Uuid;

/// What a [`Store::tick`] call committed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub search_committed: bool,
    /// Row whose long-press fired.
    pub long_pressed: Option<String>,
}

impl<S: KeyValueStore> Store<S> {
    /// Shuffles the current filtered and sorted list, then drops the sort
    /// back to an unsorted ascending state.
    pub fn shuffle_view(&mut self) -> usize {
        self.shuffle_view_with(&mut rand::rng())
    }

    pub fn shuffle_view_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        let order = {
            let this = &*self;
            let mut words = apply_filters(&this.state.words, &this.state.filters, this);
            sort_words(&mut words, this.state.sort, this);
            shuffled_ids(&words, rng)
        };
        let count = order.len();
        info!(
            "event=view_shuffle module=store status=ok count={}",
            count
        );

        self.set_order(&order);
        self.set_sort(SortState::new(SortKey::Unsorted, SortDirection::Asc));
        count
    }

    /// Column-header click: clears the shuffle, then sorts by `key`,
    /// flipping direction when `key` is already active.
    pub fn toggle_sort(&mut self, key: SortKey) -> SortState {
        self.clear_order();
        let current = self.state.sort;
        let dir = if current.key == key {
            current.dir.reversed()
        } else {
            SortDirection::Asc
        };
        self.set_sort(SortState::new(key, dir));
        self.state.sort
    }

    /// Saves the live filters under `name`.
    ///
    /// A set with the same name (ignoring case) is overwritten in place and
    /// takes the newly typed name; otherwise a new set with a fresh id is
    /// appended. Returns the set id.
    pub fn save_filter_set(&mut self, name: &str) -> String {
        let mut sets = self.state.filter_sets.clone();
        let trimmed = name.trim();
        let name = if trimmed.is_empty() {
            format!("Set {}", sets.len() + 1)
        } else {
            trimmed.to_string()
        };
        let lowered = name.to_lowercase();

        let id = match sets
            .iter_mut()
            .find(|set| set.name.to_lowercase() == lowered)
        {
            Some(existing) => {
                existing.name = name;
                existing.filters = self.state.filters.clone();
                existing.id.clone()
            }
            None => {
                let id = Uuid::new_v4().to_string();
                sets.push(FilterSet {
                    id: id.clone(),
                    name,
                    filters: self.state.filters.clone(),
                });
                id
            }
        };

        self.set_filter_sets(&sets);
        info!(
            "event=filter_set_save module=store status=ok sets={}",
            self.state.filter_sets.len()
        );
        id
    }

    /// Overwrites the filters stored in set `id` with the live filters.
    pub fn update_filter_set(&mut self, id: &str) -> bool {
        let mut sets = self.state.filter_sets.clone();
        let Some(target) = sets.iter_mut().find(|set| set.id == id) else {
            debug!("event=filter_set_update module=store status=skip reason=unknown_id");
            return false;
        };
        target.filters = self.state.filters.clone();
        self.set_filter_sets(&sets)
    }

    pub fn delete_filter_set(&mut self, id: &str) -> bool {
        let sets: Vec<FilterSet> = self
            .state
            .filter_sets
            .iter()
            .filter(|set| set.id != id)
            .cloned()
            .collect();
        if sets.len() == self.state.filter_sets.len() {
            debug!("event=filter_set_delete module=store status=skip reason=unknown_id");
            return false;
        }
        self.set_filter_sets(&sets)
    }

    /// Makes set `id` the live filters. Returns `false` for unknown ids or
    /// when the filters already match.
    pub fn apply_filter_set(&mut self, id: &str) -> bool {
        let Some(filters) = self
            .state
            .filter_sets
            .iter()
            .find(|set| set.id == id)
            .map(|set| set.filters.clone())
        else {
            debug!("event=filter_set_apply module=store status=skip reason=unknown_id");
            return false;
        };
        self.set_filters(&filters)
    }

    /// First saved set canonically equal to the live filters.
    pub fn matching_filter_set(&self) -> Option<&FilterSet> {
        self.state
            .filter_sets
            .iter()
            .find(|set| filters_equal(&set.filters, &self.state.filters))
    }

    pub fn select_word(&mut self, id: &str) -> bool {
        self.apply_selection(SelectionInput::Select(id))
    }

    pub fn clear_selection(&mut self) -> bool {
        self.apply_selection(SelectionInput::Clear)
    }

    /// Enters or leaves row selection mode. Entering with nothing selected
    /// selects `trigger`.
    pub fn set_row_selection_mode(&mut self, enabled: bool, trigger: Option<&str>) -> bool {
        if enabled {
            self.apply_selection(SelectionInput::EnterMode { trigger })
        } else {
            self.apply_selection(SelectionInput::LeaveMode)
        }
    }

    pub fn long_press_row(&mut self, id: &str) -> bool {
        self.apply_selection(SelectionInput::LongPress(id))
    }

    pub fn tap_row(&mut self, id: &str) -> bool {
        self.apply_selection(SelectionInput::Tap(id))
    }

    /// Debounces search input; the latest text is committed by [`Store::tick`].
    pub fn queue_search(&mut self, text: impl Into<String>, now: Instant) {
        self.search.schedule(text.into(), now);
    }

    pub fn press_row(&mut self, press: PointerPress, now: Instant) {
        self.long_press.press(press, now);
    }

    pub fn move_pointer(&mut self, pointer_id: u32, x: f64, y: f64) {
        self.long_press.move_to(pointer_id, x, y);
    }

    pub fn release_pointer(&mut self, pointer_id: u32) {
        self.long_press.release(pointer_id);
    }

    /// Commits a due search and fires a due long-press.
    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        if let Some(search) = self.search.poll(now) {
            debug!(
                "event=search_commit module=store status=ok search_len={}",
                search.chars().count()
            );
            let mut filters = self.state.filters.clone();
            filters.search = search;
            outcome.search_committed = self.set_filters(&filters);
        }

        if let Some(row) = self.long_press.poll(now) {
            self.long_press_row(&row);
            outcome.long_pressed = Some(row);
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use crate::model::view::{SortDirection, SortKey};
    use crate::storage::MemoryKeyValueStore;
    use crate::store::Store;

    #[test]
    fn toggle_sort_flips_only_the_active_key() {
        let mut store = Store::new(MemoryKeyValueStore::new());
        assert_eq!(store.toggle_sort(SortKey::Word).dir, SortDirection::Desc);
        assert_eq!(store.toggle_sort(SortKey::Word).dir, SortDirection::Asc);

        let sort = store.toggle_sort(SortKey::Pos);
        assert_eq!(sort.key, SortKey::Pos);
        assert_eq!(sort.dir, SortDirection::Asc);
    }

    #[test]
    fn save_filter_set_replaces_same_name_ignoring_case() {
        let mut store = Store::new(MemoryKeyValueStore::new());
        let first = store.save_filter_set("Verbs");
        let again = store.save_filter_set("  verbs ");
        assert_eq!(first, again);
        assert_eq!(store.state().filter_sets.len(), 1);
        assert_eq!(store.state().filter_sets[0].name, "verbs");

        let other = store.save_filter_set("");
        assert_ne!(other, first);
        assert_eq!(store.state().filter_sets[1].name, "Set 2");
    }
}
