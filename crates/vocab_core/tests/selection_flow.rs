use serde_json::json;
use std::time::{Duration, Instant};
use vocab_core::{
    LoadMeta, MemoryKeyValueStore, PointerButton, PointerPress, StateKey, Store, StoreConfig,
};

fn store_with_words() -> Store<MemoryKeyValueStore> {
    let mut store = Store::new(MemoryKeyValueStore::new());
    store.hydrate_words(
        &[
            json!({"word": "hola", "definition": "hello", "POS": "int"}),
            json!({"word": "adios", "definition": "goodbye", "POS": "int"}),
        ],
        LoadMeta::default(),
    );
    store
}

fn press(row_id: &str) -> PointerPress {
    PointerPress {
        pointer_id: 7,
        button: PointerButton::Primary,
        x: 10.0,
        y: 10.0,
        row_id: row_id.to_string(),
    }
}

#[test]
fn long_press_gesture_enters_selection_mode() {
    let mut store = store_with_words();
    let start = Instant::now();

    store.press_row(press("w_row"), start);
    let early = store.tick(start + Duration::from_millis(300));
    assert_eq!(early.long_pressed, None);

    let fired = store.tick(start + Duration::from_millis(650));
    assert_eq!(fired.long_pressed.as_deref(), Some("w_row"));
    assert!(store.state().ui.row_selection_mode);
    assert_eq!(store.state().ui.current_word_id, "w_row");

    store.tap_row("w_other");
    assert_eq!(store.state().ui.current_word_id, "w_other");
}

#[test]
fn moving_finger_cancels_long_press() {
    let mut store = store_with_words();
    let start = Instant::now();

    store.press_row(press("w_row"), start);
    store.move_pointer(7, 30.0, 10.0);
    let outcome = store.tick(start + Duration::from_secs(1));

    assert_eq!(outcome.long_pressed, None);
    assert!(!store.state().ui.row_selection_mode);
}

#[test]
fn debounced_search_commits_latest_text_and_clears_selection() {
    let mut store = store_with_words();
    let start = Instant::now();
    store.select_word("w_row");

    store.queue_search("a", start);
    store.queue_search("ad", start + Duration::from_millis(120));
    assert!(!store.tick(start + Duration::from_millis(250)).search_committed);

    let outcome = store.tick(start + Duration::from_millis(330));
    assert!(outcome.search_committed);
    assert_eq!(store.state().filters.search, "ad");
    assert_eq!(store.state().ui.current_word_id, "");

    let visible = store.visible_words();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].word, "adios");
}

#[test]
fn custom_config_changes_timings_and_namespace() {
    let config = StoreConfig {
        search_debounce: Duration::from_millis(50),
        ..StoreConfig::default()
    }
    .with_namespace("alt")
    .without_legacy();
    let backend = MemoryKeyValueStore::new().with_entry("v23:sort", r#"{"key":"pos"}"#);
    let mut store = Store::with_config(backend, config);

    assert!(store.state().sort.key.as_str() == "word");
    let start = Instant::now();
    store.queue_search("x", start);
    assert!(store.tick(start + Duration::from_millis(60)).search_committed);
    assert!(store.persistence().backend().raw("alt:filters").is_some());
}

#[test]
fn leaving_selection_mode_clears_selection() {
    let mut store = store_with_words();
    store.set_row_selection_mode(true, Some("w_1"));
    assert_eq!(store.state().ui.current_word_id, "w_1");

    store.set_row_selection_mode(false, None);
    assert!(!store.state().ui.row_selection_mode);
    assert_eq!(store.state().ui.current_word_id, "");

    store.set(StateKey::Ui, &json!({"currentWordId": 42}));
    assert_eq!(store.state().ui.current_word_id, "");
}
