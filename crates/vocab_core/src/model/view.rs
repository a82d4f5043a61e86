//! Presentation state persisted with the word list: sort, columns, UI flags.

use serde::{Deserialize, Serialize};

/// Sort column. `Unsorted` is stored as the empty string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortKey {
    #[serde(rename = "")]
    Unsorted,
    #[serde(rename = "star")]
    Star,
    #[serde(rename = "weight")]
    Weight,
    #[default]
    #[serde(rename = "word")]
    Word,
    #[serde(rename = "definition")]
    Definition,
    #[serde(rename = "pos")]
    Pos,
    #[serde(rename = "cefr")]
    Cefr,
    #[serde(rename = "tags")]
    Tags,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unsorted => "",
            Self::Star => "star",
            Self::Weight => "weight",
            Self::Word => "word",
            Self::Definition => "definition",
            Self::Pos => "pos",
            Self::Cefr => "cefr",
            Self::Tags => "tags",
        }
    }

    /// Parses a current-schema key name.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "" => Some(Self::Unsorted),
            "star" => Some(Self::Star),
            "weight" => Some(Self::Weight),
            "word" => Some(Self::Word),
            "definition" => Some(Self::Definition),
            "pos" => Some(Self::Pos),
            "cefr" => Some(Self::Cefr),
            "tags" => Some(Self::Tags),
            _ => None,
        }
    }
}

impl From<ColumnKey> for SortKey {
    fn from(value: ColumnKey) -> Self {
        match value {
            ColumnKey::Star => Self::Star,
            ColumnKey::Weight => Self::Weight,
            ColumnKey::Word => Self::Word,
            ColumnKey::Definition => Self::Definition,
            ColumnKey::Pos => Self::Pos,
            ColumnKey::Cefr => Self::Cefr,
            ColumnKey::Tags => Self::Tags,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub key: SortKey,
    pub dir: SortDirection,
}

impl SortState {
    pub fn new(key: SortKey, dir: SortDirection) -> Self {
        Self { key, dir }
    }

    pub fn is_sorted(&self) -> bool {
        self.key != SortKey::Unsorted
    }
}

/// Fixed word-list column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKey {
    Star,
    Weight,
    Word,
    Definition,
    Pos,
    Cefr,
    Tags,
}

impl ColumnKey {
    pub const ALL: [ColumnKey; 7] = [
        Self::Star,
        Self::Weight,
        Self::Word,
        Self::Definition,
        Self::Pos,
        Self::Cefr,
        Self::Tags,
    ];

    pub fn as_str(self) -> &'static str {
        SortKey::from(self).as_str()
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|column| column.as_str() == value)
    }
}

/// Column visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnsState {
    pub star: bool,
    pub weight: bool,
    pub word: bool,
    pub definition: bool,
    pub pos: bool,
    pub cefr: bool,
    pub tags: bool,
}

impl Default for ColumnsState {
    fn default() -> Self {
        Self {
            star: true,
            weight: true,
            word: true,
            definition: true,
            pos: true,
            cefr: true,
            tags: true,
        }
    }
}

impl ColumnsState {
    pub fn is_visible(&self, column: ColumnKey) -> bool {
        match column {
            ColumnKey::Star => self.star,
            ColumnKey::Weight => self.weight,
            ColumnKey::Word => self.word,
            ColumnKey::Definition => self.definition,
            ColumnKey::Pos => self.pos,
            ColumnKey::Cefr => self.cefr,
            ColumnKey::Tags => self.tags,
        }
    }

    pub fn set_visible(&mut self, column: ColumnKey, visible: bool) {
        let slot = match column {
            ColumnKey::Star => &mut self.star,
            ColumnKey::Weight => &mut self.weight,
            ColumnKey::Word => &mut self.word,
            ColumnKey::Definition => &mut self.definition,
            ColumnKey::Pos => &mut self.pos,
            ColumnKey::Cefr => &mut self.cefr,
            ColumnKey::Tags => &mut self.tags,
        };
        *slot = visible;
    }
}

/// UI flags shared across views.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    pub show_translation: bool,
    /// Selected entry id; empty means no selection.
    pub current_word_id: String,
    pub row_selection_mode: bool,
    pub debug_panel: bool,
}
