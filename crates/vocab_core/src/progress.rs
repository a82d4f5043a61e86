//! Per-term star/weight records.
//!
//! # Responsibility
//! - Read and write progress under `star:<termKey>` / `wt:<termKey>`.
//! - Upgrade records written by older builds on read.
//! - Expose a lookup trait so selectors stay independent of storage.
//!
//! # Invariants
//! - Records are keyed by term key, never by entry id, and are not touched by
//!   word-list changes.
//! - Reads never fail: absent or invalid records read as unstarred/weight 3.
//! - Written weights are always within 1..=5.

use crate::events::ProgressChange;
use crate::model::entry::VocabEntry;
use crate::model::weight::{clamp_weight, Weight, DEFAULT_WEIGHT};
use crate::sanitize::{from_legacy_weight, is_truthy, to_new_weight};
use crate::storage::{KeyValueStore, Persistence, ValueSource};
use std::collections::HashMap;

const STAR_PREFIX: &str = "star";
const WEIGHT_PREFIX: &str = "wt";

/// Read access to progress, as needed by filters and sorting.
pub trait ProgressLookup {
    fn star(&self, term_key: &str) -> bool;
    fn weight(&self, term_key: &str) -> Weight;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressRecord {
    pub star: bool,
    pub weight: Weight,
}

impl Default for ProgressRecord {
    fn default() -> Self {
        Self {
            star: false,
            weight: DEFAULT_WEIGHT,
        }
    }
}

pub fn star_key(term_key: &str) -> String {
    format!("{STAR_PREFIX}:{term_key}")
}

pub fn weight_key(term_key: &str) -> String {
    format!("{WEIGHT_PREFIX}:{term_key}")
}

/// Read-only ledger view over a persistence layer.
pub struct ProgressLedger<'p, S: KeyValueStore> {
    persistence: &'p Persistence<S>,
}

impl<'p, S: KeyValueStore> ProgressLedger<'p, S> {
    pub fn new(persistence: &'p Persistence<S>) -> Self {
        Self { persistence }
    }

    pub fn record(&self, term_key: &str) -> ProgressRecord {
        ProgressRecord {
            star: self.star(term_key),
            weight: self.weight(term_key),
        }
    }
}

impl<S: KeyValueStore> ProgressLookup for ProgressLedger<'_, S> {
    fn star(&self, term_key: &str) -> bool {
        self.persistence
            .get_value_or_legacy(&star_key(term_key))
            .is_some_and(|(value, _)| is_truthy(&value))
    }

    fn weight(&self, term_key: &str) -> Weight {
        let weight = match self.persistence.get_value_or_legacy(&weight_key(term_key)) {
            Some((value, ValueSource::Current)) => to_new_weight(&value),
            Some((value, ValueSource::Legacy)) => from_legacy_weight(&value),
            None => None,
        };
        weight.unwrap_or(DEFAULT_WEIGHT)
    }
}

pub(crate) fn write_star<S: KeyValueStore>(
    persistence: &mut Persistence<S>,
    term_key: &str,
    value: bool,
) -> ProgressChange {
    persistence.set(&star_key(term_key), &value);
    ProgressChange::Star {
        term_key: term_key.to_string(),
        value,
    }
}

pub(crate) fn write_weight<S: KeyValueStore>(
    persistence: &mut Persistence<S>,
    term_key: &str,
    value: i64,
) -> ProgressChange {
    let clamped = clamp_weight(value);
    persistence.set(&weight_key(term_key), &clamped);
    ProgressChange::Weight {
        term_key: term_key.to_string(),
        value: clamped,
    }
}

/// Detached progress values, e.g. captured once for a whole render pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    records: HashMap<String, ProgressRecord>,
}

impl ProgressSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Captures the records of every entry's term key.
    pub fn capture(lookup: &impl ProgressLookup, words: &[VocabEntry]) -> Self {
        let records = words
            .iter()
            .map(|entry| {
                let record = ProgressRecord {
                    star: lookup.star(&entry.term_key),
                    weight: lookup.weight(&entry.term_key),
                };
                (entry.term_key.clone(), record)
            })
            .collect();
        Self { records }
    }

    pub fn insert(&mut self, term_key: impl Into<String>, record: ProgressRecord) {
        self.records.insert(term_key.into(), record);
    }

    pub fn with_star(mut self, term_key: &str, star: bool) -> Self {
        self.records.entry(term_key.to_string()).or_default().star = star;
        self
    }

    pub fn with_weight(mut self, term_key: &str, weight: i64) -> Self {
        self.records.entry(term_key.to_string()).or_default().weight = clamp_weight(weight);
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ProgressLookup for ProgressSnapshot {
    fn star(&self, term_key: &str) -> bool {
        self.records.get(term_key).is_some_and(|record| record.star)
    }

    fn weight(&self, term_key: &str) -> Weight {
        self.records
            .get(term_key)
            .map_or(DEFAULT_WEIGHT, |record| record.weight)
    }
}

#[cfg(test)]
mod tests {
    use super::{write_weight, ProgressLedger, ProgressLookup, ProgressRecord, ProgressSnapshot};
    use crate::model::entry::VocabEntry;
    use crate::storage::{MemoryKeyValueStore, Persistence};

    fn ledger_backend() -> MemoryKeyValueStore {
        MemoryKeyValueStore::new()
            .with_entry("lv:wt:hola|int", "0")
            .with_entry("lv:wt:adios|int", "\"oops\"")
            .with_entry("lv:star:adios|int", "true")
            .with_entry("v23:wt:comer|verb", "2")
            .with_entry("v23:star:comer|verb", "1")
            .with_entry("v23:wt:beber|verb", "9")
            .with_entry("v23:wt:vivir|verb", "4")
            .with_entry("lv:wt:dormir|verb", "2")
            .with_entry("v23:wt:dormir|verb", "0")
            .with_entry("lv:wt:correr|verb", "\"x\"")
            .with_entry("v23:wt:correr|verb", "4")
            .with_entry("lv:star:correr|verb", "false")
            .with_entry("v23:star:correr|verb", "1")
    }

    #[test]
    fn weight_reads_upgrade_and_default() {
        let persistence = Persistence::new(ledger_backend(), "lv").with_legacy_namespace("v23");
        let ledger = ProgressLedger::new(&persistence);

        assert_eq!(ledger.weight("hola|int"), 1);
        assert_eq!(ledger.weight("adios|int"), 3);
        assert_eq!(ledger.weight("comer|verb"), 3);
        assert_eq!(ledger.weight("beber|verb"), 3);
        assert_eq!(ledger.weight("vivir|verb"), 5);
        assert_eq!(ledger.weight("missing|unknown"), 3);
    }

    #[test]
    fn present_current_records_never_consult_legacy() {
        let persistence = Persistence::new(ledger_backend(), "lv").with_legacy_namespace("v23");
        let ledger = ProgressLedger::new(&persistence);

        assert_eq!(ledger.weight("dormir|verb"), 2);
        assert_eq!(ledger.weight("correr|verb"), 3);
        assert!(!ledger.star("correr|verb"));
    }

    #[test]
    fn stars_fall_back_to_legacy_records() {
        let persistence = Persistence::new(ledger_backend(), "lv").with_legacy_namespace("v23");
        let ledger = ProgressLedger::new(&persistence);

        assert_eq!(
            ledger.record("adios|int"),
            ProgressRecord {
                star: true,
                weight: 3
            }
        );
        assert!(ledger.star("comer|verb"));
        assert!(!ledger.star("hola|int"));
    }

    #[test]
    fn current_record_shadows_legacy_record() {
        let mut persistence =
            Persistence::new(ledger_backend(), "lv").with_legacy_namespace("v23");
        write_weight(&mut persistence, "comer|verb", 5);
        assert_eq!(ProgressLedger::new(&persistence).weight("comer|verb"), 5);
    }

    #[test]
    fn snapshot_captures_records_per_term() {
        let persistence = Persistence::new(ledger_backend(), "lv").with_legacy_namespace("v23");
        let words = vec![
            VocabEntry::new("comer", "to eat", "verb", "A1", ""),
            VocabEntry::new("Comer", "eating", "VERB", "A2", ""),
            VocabEntry::new("hola", "hello", "int", "A1", ""),
        ];
        let snapshot = ProgressSnapshot::capture(&ProgressLedger::new(&persistence), &words);

        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.star("comer|verb"));
        assert_eq!(snapshot.weight("hola|int"), 1);
        assert_eq!(snapshot.weight("absent|noun"), 3);
    }
}
