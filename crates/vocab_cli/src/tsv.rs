//! Word-list TSV parsing into loader rows.
//!
//! # Invariants
//! - Header names are matched case-insensitively after trimming.
//! - Blank lines and rows whose cells are all blank are skipped.
//! - Missing columns yield empty strings, never errors.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};

static WORD_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(word|spanish)$").expect("valid word header regex"));
static DEFINITION_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(definition|english)$").expect("valid definition header regex")
});
static POS_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^pos$").expect("valid pos header regex"));
static CEFR_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^cefr$").expect("valid cefr header regex"));
static TAGS_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^tags?$").expect("valid tags header regex"));

struct ColumnMap {
    word: Option<usize>,
    definition: Option<usize>,
    pos: Option<usize>,
    cefr: Option<usize>,
    tags: Option<usize>,
}

impl ColumnMap {
    fn from_header(line: &str) -> Self {
        let headers: Vec<&str> = line.split('\t').map(str::trim).collect();
        let find = |pattern: &Regex| headers.iter().position(|header| pattern.is_match(header));
        Self {
            word: find(&WORD_HEADER),
            definition: find(&DEFINITION_HEADER),
            pos: find(&POS_HEADER),
            cefr: find(&CEFR_HEADER),
            tags: find(&TAGS_HEADER),
        }
    }
}

fn cell(cells: &[&str], index: Option<usize>) -> String {
    index
        .and_then(|index| cells.get(index))
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}

/// Parses TSV text into rows shaped like `{word, definition, POS, CEFR, Tags}`.
pub fn parse_tsv(text: &str) -> Vec<Value> {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());
    let Some(header) = lines.next() else {
        return Vec::new();
    };
    let columns = ColumnMap::from_header(header);

    lines
        .filter_map(|line| {
            let cells: Vec<&str> = line.split('\t').collect();
            if cells.iter().all(|cell| cell.trim().is_empty()) {
                return None;
            }
            Some(json!({
                "word": cell(&cells, columns.word),
                "definition": cell(&cells, columns.definition),
                "POS": cell(&cells, columns.pos),
                "CEFR": cell(&cells, columns.cefr),
                "Tags": cell(&cells, columns.tags),
            }))
        })
        .collect()
}
