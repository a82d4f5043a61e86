//! Current-row selection and row selection mode.
//!
//! # Invariants
//! - Selection lives in `UiState::current_word_id`; empty means none.
//! - Only the inputs listed in [`SelectionInput`] change selection.
//! - Leaving row selection mode always clears selection.

use crate::model::view::UiState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    None,
    Selected(String),
}

impl Selection {
    pub fn of(ui: &UiState) -> Self {
        if ui.current_word_id.is_empty() {
            Self::None
        } else {
            Self::Selected(ui.current_word_id.clone())
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Self::None => None,
            Self::Selected(id) => Some(id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionInput<'a> {
    Select(&'a str),
    Clear,
    /// An accepted filter mutation.
    FiltersCommitted,
    EnterMode { trigger: Option<&'a str> },
    LeaveMode,
    LongPress(&'a str),
    Tap(&'a str),
}

/// Returns the UI state after `input`. Other UI flags are carried over.
pub fn transition(ui: &UiState, input: SelectionInput<'_>) -> UiState {
    let mut next = ui.clone();
    match input {
        SelectionInput::Select(id) => next.current_word_id = id.to_string(),
        SelectionInput::Clear | SelectionInput::FiltersCommitted => next.current_word_id.clear(),
        SelectionInput::EnterMode { trigger } => {
            next.row_selection_mode = true;
            if let (true, Some(id)) = (next.current_word_id.is_empty(), trigger) {
                next.current_word_id = id.to_string();
            }
        }
        SelectionInput::LeaveMode => {
            next.row_selection_mode = false;
            next.current_word_id.clear();
        }
        SelectionInput::LongPress(id) => {
            if !ui.row_selection_mode {
                next.row_selection_mode = true;
                next.current_word_id = id.to_string();
            } else if ui.current_word_id == id {
                return transition(ui, SelectionInput::LeaveMode);
            } else {
                next.current_word_id = id.to_string();
            }
        }
        SelectionInput::Tap(id) => {
            if ui.row_selection_mode {
                next.current_word_id = id.to_string();
            }
        }
    }
    next
}
