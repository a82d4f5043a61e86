//! Vocabulary entries and raw-row mapping.
//!
//! # Invariants
//! - `id` depends only on `(word, definition)`.
//! - `term_key` depends only on `(word, pos)`, so progress survives
//!   definition edits.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const WORD_FIELDS: &[&str] = &["word", "term", "lemma", "Spanish", "es"];
const DEFINITION_FIELDS: &[&str] = &["definition", "gloss", "meaning", "English", "en"];
const UNKNOWN_TERM_PART: &str = "unknown";

const FNV_OFFSET_BASIS: u32 = 2_166_136_261;
const FNV_PRIME: u32 = 16_777_619;

static TAG_SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[|,;]+|\s+").expect("valid tag separator regex"));

/// One row of the word list after mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabEntry {
    pub id: String,
    pub term_key: String,
    pub word: String,
    pub definition: String,
    pub pos: String,
    pub cefr: String,
    /// Delimiter-separated tag text as loaded; see [`normalize_tags_list`].
    pub tags: String,
}

impl VocabEntry {
    /// Builds an entry, deriving `id` and `term_key` from the texts.
    pub fn new(
        word: impl Into<String>,
        definition: impl Into<String>,
        pos: impl Into<String>,
        cefr: impl Into<String>,
        tags: impl Into<String>,
    ) -> Self {
        let word = word.into();
        let definition = definition.into();
        let pos = pos.into();
        Self {
            id: stable_id(&word, &definition),
            term_key: term_key(&word, &pos),
            word,
            definition,
            pos,
            cefr: cefr.into(),
            tags: tags.into(),
        }
    }

    /// Lower-cased, split tag values.
    pub fn tag_list(&self) -> Vec<String> {
        normalize_tags_list(&self.tags)
    }
}

/// Canonical `word|pos` key used for progress records.
pub fn term_key(word: &str, pos: &str) -> String {
    format!(
        "{}|{}",
        normalize_term_part(word),
        normalize_term_part(pos)
    )
}

fn normalize_term_part(value: &str) -> String {
    let normalized = value.trim().to_lowercase();
    if normalized.is_empty() {
        UNKNOWN_TERM_PART.to_string()
    } else {
        normalized
    }
}

/// FNV-1a over the UTF-16 code units of `word|definition`.
///
/// Hashing UTF-16 keeps ids identical to the ones already stored in
/// persisted shuffle orders.
pub fn stable_id(word: &str, definition: &str) -> String {
    let hash = format!("{word}|{definition}")
        .encode_utf16()
        .fold(FNV_OFFSET_BASIS, |hash, unit| {
            (hash ^ u32::from(unit)).wrapping_mul(FNV_PRIME)
        });
    format!("w_{hash:x}")
}

/// Splits a tag string on `|`, `,`, `;` and whitespace; lower-cases parts.
pub fn normalize_tags_list(source: &str) -> Vec<String> {
    TAG_SEPARATOR_RE
        .split(source)
        .map(|tag| tag.trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Maps loader rows into entries. Rows of any JSON shape are accepted.
pub fn map_raw(rows: &[Value]) -> Vec<VocabEntry> {
    rows.iter().map(map_raw_row).collect()
}

/// Maps a single loader row, tolerating legacy column names.
pub fn map_raw_row(row: &Value) -> VocabEntry {
    let word = pick_non_blank(row, WORD_FIELDS);
    let definition = pick_non_blank(row, DEFINITION_FIELDS);
    let pos = pick_first_present(row, &["POS", "pos"]);
    let cefr = pick_first_present(row, &["CEFR", "cefr"]);
    let tags = pick_first_present(row, &["Tags", "tags"]);
    VocabEntry::new(word, definition, pos, cefr, tags)
}

fn pick_non_blank(row: &Value, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|key| row.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .unwrap_or_default()
        .to_string()
}

// First non-empty string wins even if it trims to nothing.
fn pick_first_present(row: &Value, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|key| row.get(*key).and_then(Value::as_str))
        .find(|value| !value.is_empty())
        .map(str::trim)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::{map_raw_row, normalize_tags_list, stable_id, term_key};
    use serde_json::json;

    #[test]
    fn term_key_lowercases_and_falls_back_to_unknown() {
        assert_eq!(term_key(" Hola ", "INT"), "hola|int");
        assert_eq!(term_key("", "  "), "unknown|unknown");
    }

    #[test]
    fn stable_id_matches_known_fnv_values() {
        assert_eq!(stable_id("", ""), "w_f90c4a3b");
        assert_ne!(stable_id("hola", "hello"), stable_id("hola", "hi"));
        assert_eq!(stable_id("hola", "hello"), stable_id("hola", "hello"));
    }

    #[test]
    fn tag_list_splits_on_every_separator() {
        assert_eq!(
            normalize_tags_list("Food, verb;A1|daily  life"),
            vec!["food", "verb", "a1", "daily", "life"]
        );
        assert!(normalize_tags_list("  ").is_empty());
    }

    #[test]
    fn raw_rows_use_legacy_columns_when_current_ones_are_blank() {
        let entry = map_raw_row(&json!({
            "word": "  ",
            "Spanish": " comer ",
            "English": "to eat",
            "POS": "verb",
            "tags": "food"
        }));
        assert_eq!(entry.word, "comer");
        assert_eq!(entry.definition, "to eat");
        assert_eq!(entry.term_key, "comer|verb");
        assert_eq!(entry.tags, "food");
        assert_eq!(entry.id, stable_id("comer", "to eat"));
    }

    #[test]
    fn non_object_rows_map_to_blank_entries() {
        let entry = map_raw_row(&json!(42));
        assert_eq!(entry.word, "");
        assert_eq!(entry.term_key, "unknown|unknown");
    }
}
