//! Derived views over a state snapshot.
//!
//! # Responsibility
//! - Filter, sort and order-merge entries for display.
//! - Compute facet values and the active-filter badge count.
//!
//! # Invariants
//! - Pure: inputs are borrowed and never mutated; results depend only on the
//!   arguments (and the injected RNG for shuffles).
//! - `sort_words` is stable in both directions.
//! - The order-merge returns every target item exactly once.

use crate::model::entry::VocabEntry;
use crate::model::filters::Filters;
use crate::model::view::{SortDirection, SortKey, SortState};
use crate::model::weight::ALL_WEIGHTS;
use crate::progress::ProgressLookup;
use rand::seq::SliceRandom;
use rand::Rng;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// Maximum number of tag values offered as facets.
pub const MAX_TAG_FACETS: usize = 150;

/// Everything the visible-list pipeline reads.
pub struct ViewSnapshot<'a, P: ProgressLookup + ?Sized> {
    pub words: &'a [VocabEntry],
    pub filters: &'a Filters,
    pub sort: SortState,
    pub order: &'a [String],
    pub progress: &'a P,
}

/// Entries that pass every active filter, in input order.
pub fn apply_filters<'a, P: ProgressLookup + ?Sized>(
    words: &'a [VocabEntry],
    filters: &Filters,
    progress: &P,
) -> Vec<&'a VocabEntry> {
    let needle = filters.search.trim().to_lowercase();
    let narrowed_weight = filters.weight.len() < ALL_WEIGHTS.len();
    let pos = lowered_set(&filters.pos);
    let cefr = lowered_set(&filters.cefr);
    let tags = lowered_set(&filters.tags);

    words
        .iter()
        .filter(|entry| !filters.starred || progress.star(&entry.term_key))
        .filter(|entry| {
            !narrowed_weight || filters.weight.contains(&progress.weight(&entry.term_key))
        })
        .filter(|entry| {
            needle.is_empty()
                || entry.word.to_lowercase().contains(&needle)
                || entry.definition.to_lowercase().contains(&needle)
        })
        .filter(|entry| facet_matches(&pos, &entry.pos))
        .filter(|entry| facet_matches(&cefr, &entry.cefr))
        .filter(|entry| {
            tags.is_empty() || entry.tag_list().iter().any(|tag| tags.contains(tag))
        })
        .collect()
}

fn lowered_set(values: &[String]) -> HashSet<String> {
    values.iter().map(|value| value.to_lowercase()).collect()
}

fn facet_matches(selected: &HashSet<String>, value: &str) -> bool {
    if selected.is_empty() {
        return true;
    }
    let value = value.trim();
    !value.is_empty() && selected.contains(&value.to_lowercase())
}

/// Stable sort by `sort`. `SortKey::Unsorted` leaves the input untouched.
pub fn sort_words<P: ProgressLookup + ?Sized>(
    words: &mut [&VocabEntry],
    sort: SortState,
    progress: &P,
) {
    if !sort.is_sorted() {
        return;
    }

    let compare = |left: &&VocabEntry, right: &&VocabEntry| -> Ordering {
        match sort.key {
            SortKey::Unsorted => Ordering::Equal,
            SortKey::Star => progress
                .star(&left.term_key)
                .cmp(&progress.star(&right.term_key)),
            SortKey::Weight => progress
                .weight(&left.term_key)
                .cmp(&progress.weight(&right.term_key)),
            SortKey::Word => folded_cmp(&left.word, &right.word),
            SortKey::Definition => folded_cmp(&left.definition, &right.definition),
            SortKey::Pos => folded_cmp(&left.pos, &right.pos),
            SortKey::Cefr => folded_cmp(&left.cefr, &right.cefr),
            SortKey::Tags => folded_cmp(&left.tags, &right.tags),
        }
    };

    match sort.dir {
        SortDirection::Asc => words.sort_by(compare),
        SortDirection::Desc => words.sort_by(|left, right| compare(right, left)),
    }
}

fn folded_cmp(left: &str, right: &str) -> Ordering {
    left.to_lowercase().cmp(&right.to_lowercase())
}

/// Uniform Fisher-Yates permutation of the entries' ids.
pub fn shuffled_ids<R: Rng + ?Sized>(words: &[&VocabEntry], rng: &mut R) -> Vec<String> {
    let mut ids: Vec<String> = words.iter().map(|entry| entry.id.clone()).collect();
    ids.shuffle(rng);
    ids
}

/// Reorders `items` so ids listed in `order` come first, in `order` order.
///
/// Ids in `order` missing from `items` and repeated ids are skipped; the rest
/// of `items` follows in its own order. When no id of `order` is present the
/// items are returned unchanged.
pub fn merge_order_by<T, F>(order: &[String], items: Vec<T>, id_of: F) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    if order.is_empty() || items.is_empty() {
        return items;
    }

    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    let positions: HashMap<String, usize> = slots
        .iter()
        .enumerate()
        .filter_map(|(index, slot)| slot.as_ref().map(|item| (id_of(item).to_string(), index)))
        .collect();

    let mut merged = Vec::with_capacity(slots.len());
    for id in order {
        if let Some(&index) = positions.get(id.as_str()) {
            if let Some(item) = slots[index].take() {
                merged.push(item);
            }
        }
    }
    merged.extend(slots.into_iter().flatten());
    merged
}

/// Id-only form of [`merge_order_by`].
pub fn merge_order(order: &[String], target: &[String]) -> Vec<String> {
    merge_order_by(order, target.to_vec(), |id| id.as_str())
}

/// Filter, then sort, then apply the shuffle order.
pub fn visible_words<'a, P: ProgressLookup + ?Sized>(
    snapshot: &ViewSnapshot<'a, P>,
) -> Vec<&'a VocabEntry> {
    let mut words = apply_filters(snapshot.words, snapshot.filters, snapshot.progress);
    sort_words(&mut words, snapshot.sort, snapshot.progress);
    merge_order_by(snapshot.order, words, |entry| entry.id.as_str())
}

/// Values offered by the facet pickers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetValues {
    pub pos: Vec<String>,
    pub cefr: Vec<String>,
    /// Most frequent first; ties keep first appearance.
    pub tags: Vec<String>,
}

pub fn facet_values(words: &[VocabEntry]) -> FacetValues {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for tag in words.iter().flat_map(VocabEntry::tag_list) {
        match index.get(&tag) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                index.insert(tag.clone(), counts.len());
                counts.push((tag, 1));
            }
        }
    }
    counts.sort_by(|left, right| right.1.cmp(&left.1));

    FacetValues {
        pos: distinct_sorted(words.iter().map(|entry| entry.pos.as_str())),
        cefr: distinct_sorted(words.iter().map(|entry| entry.cefr.as_str())),
        tags: counts
            .into_iter()
            .take(MAX_TAG_FACETS)
            .map(|(tag, _)| tag)
            .collect(),
    }
}

fn distinct_sorted<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut distinct: Vec<String> = values
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    distinct.sort();
    distinct
}

/// Badge count: starred, a narrowed weight set, and each selected facet value.
pub fn active_filter_count(filters: &Filters) -> usize {
    usize::from(filters.starred)
        + usize::from(filters.weight.len() < ALL_WEIGHTS.len())
        + filters.pos.len()
        + filters.cefr.len()
        + filters.tags.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::ProgressSnapshot;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn entry(word: &str, definition: &str, pos: &str, tags: &str) -> VocabEntry {
        VocabEntry::new(word, definition, pos, "A1", tags)
    }

    fn ids(words: &[&VocabEntry]) -> Vec<String> {
        words.iter().map(|entry| entry.id.clone()).collect()
    }

    #[test]
    fn search_matches_word_or_definition() {
        let words = vec![
            entry("hola", "hello", "int", ""),
            entry("adios", "bye", "int", ""),
        ];
        let filters = Filters {
            search: " ad ".into(),
            ..Filters::default()
        };
        let matched = apply_filters(&words, &filters, &ProgressSnapshot::new());
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].word, "adios");
    }

    #[test]
    fn facets_require_a_value() {
        let words = vec![
            entry("comer", "to eat", "verb", "food, daily"),
            entry("casa", "house", "", "home"),
        ];
        let filters = Filters {
            pos: vec!["VERB".into()],
            ..Filters::default()
        };
        let progress = ProgressSnapshot::new();
        assert_eq!(apply_filters(&words, &filters, &progress).len(), 1);

        let by_tag = Filters {
            tags: vec!["Daily".into()],
            ..Filters::default()
        };
        let matched = apply_filters(&words, &by_tag, &progress);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].word, "comer");
    }

    #[test]
    fn starred_and_weight_read_progress() {
        let words = vec![entry("a", "1", "n", ""), entry("b", "2", "n", "")];
        let progress = ProgressSnapshot::new()
            .with_star("a|n", true)
            .with_weight("b|n", 5);

        let starred = Filters {
            starred: true,
            ..Filters::default()
        };
        assert_eq!(apply_filters(&words, &starred, &progress)[0].word, "a");

        let heavy = Filters {
            weight: vec![5],
            ..Filters::default()
        };
        assert_eq!(apply_filters(&words, &heavy, &progress)[0].word, "b");
    }

    #[test]
    fn sort_is_stable_in_both_directions() {
        let words = vec![
            entry("b", "x", "n", ""),
            entry("a", "y", "n", ""),
            entry("B", "z", "n", ""),
        ];
        let progress = ProgressSnapshot::new();

        let mut asc: Vec<&VocabEntry> = words.iter().collect();
        sort_words(
            &mut asc,
            SortState::new(SortKey::Word, SortDirection::Asc),
            &progress,
        );
        let asc_defs: Vec<&str> = asc.iter().map(|e| e.definition.as_str()).collect();
        assert_eq!(asc_defs, ["y", "x", "z"]);

        let mut desc: Vec<&VocabEntry> = words.iter().collect();
        sort_words(
            &mut desc,
            SortState::new(SortKey::Word, SortDirection::Desc),
            &progress,
        );
        let desc_defs: Vec<&str> = desc.iter().map(|e| e.definition.as_str()).collect();
        assert_eq!(desc_defs, ["x", "z", "y"]);
    }

    #[test]
    fn unsorted_key_keeps_input() {
        let words = vec![entry("b", "1", "n", ""), entry("a", "2", "n", "")];
        let mut view: Vec<&VocabEntry> = words.iter().collect();
        sort_words(
            &mut view,
            SortState::new(SortKey::Unsorted, SortDirection::Desc),
            &ProgressSnapshot::new(),
        );
        assert_eq!(ids(&view), ids(&words.iter().collect::<Vec<_>>()));
    }

    #[test]
    fn merge_puts_known_order_first() {
        let order = vec!["b".to_string(), "a".to_string()];
        let target = vec!["a".to_string(), "c".to_string(), "b".to_string()];
        assert_eq!(merge_order(&order, &target), ["b", "a", "c"]);
    }

    #[test]
    fn merge_skips_stale_and_repeated_ids() {
        let order = vec!["x".to_string(), "c".to_string(), "c".to_string()];
        let target = vec!["a".to_string(), "c".to_string()];
        assert_eq!(merge_order(&order, &target), ["c", "a"]);

        let stale = vec!["x".to_string()];
        assert_eq!(merge_order(&stale, &target), target);
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let words: Vec<VocabEntry> = (0..5)
            .map(|n| entry(&format!("w{n}"), "d", "n", ""))
            .collect();
        let refs: Vec<&VocabEntry> = words.iter().collect();
        let mut expected = ids(&refs);
        expected.sort();

        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = HashSet::new();
        for _ in 0..20 {
            let mut shuffled = shuffled_ids(&refs, &mut rng);
            seen.insert(shuffled.clone());
            shuffled.sort();
            assert_eq!(shuffled, expected);
        }
        assert!(seen.len() > 1);
    }

    #[test]
    fn facet_values_rank_tags_by_frequency() {
        let words = vec![
            entry("a", "1", "verb", "food|daily"),
            entry("b", "2", "noun", "daily"),
            entry("c", "3", "verb", "travel"),
        ];
        let facets = facet_values(&words);
        assert_eq!(facets.pos, ["noun", "verb"]);
        assert_eq!(facets.cefr, ["A1"]);
        assert_eq!(facets.tags, ["daily", "food", "travel"]);
    }

    #[test]
    fn active_count_ignores_search() {
        let filters = Filters {
            starred: true,
            weight: vec![4, 5],
            search: "hola".into(),
            pos: vec!["verb".into()],
            cefr: vec![],
            tags: vec!["food".into(), "daily".into()],
        };
        assert_eq!(active_filter_count(&filters), 5);
        assert_eq!(active_filter_count(&Filters::default()), 0);
    }
}
