use std::cell::RefCell;
use std::rc::Rc;
use vocab_core::{
    EventKind, MemoryKeyValueStore, ProgressChange, ProgressLookup, Store, StoreEvent,
};

#[test]
fn weight_writes_are_clamped_and_announced() {
    let mut store = Store::new(MemoryKeyValueStore::new());
    let changes = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&changes);
    store.on(EventKind::Progress, move |event, _| {
        if let StoreEvent::ProgressChanged(change) = event {
            sink.borrow_mut().push(change.clone());
        }
    });

    assert_eq!(store.set_weight("comer|verb", 9), 5);
    assert_eq!(store.set_weight("beber|verb", -3), 1);
    assert_eq!(store.weight("comer|verb"), 5);
    assert_eq!(store.weight("beber|verb"), 1);
    assert_eq!(
        store.persistence().backend().raw("lv:wt:comer|verb"),
        Some("5")
    );
    assert_eq!(
        *changes.borrow(),
        [
            ProgressChange::Weight {
                term_key: "comer|verb".to_string(),
                value: 5
            },
            ProgressChange::Weight {
                term_key: "beber|verb".to_string(),
                value: 1
            },
        ]
    );
}

#[test]
fn legacy_weights_shift_up_one_step() {
    let backend = MemoryKeyValueStore::new()
        .with_entry("v23:wt:hola|int", "4")
        .with_entry("v23:wt:adios|int", "0")
        .with_entry("v23:wt:comer|verb", "2");
    let store = Store::new(backend);
    assert_eq!(store.weight("hola|int"), 5);
    assert_eq!(store.weight("adios|int"), 1);
    assert_eq!(store.weight("comer|verb"), 3);
    assert_eq!(store.weight("nunca|adv"), 3);
}

#[test]
fn current_weight_wins_over_legacy_weight() {
    let backend = MemoryKeyValueStore::new()
        .with_entry("lv:wt:hola|int", "2")
        .with_entry("v23:wt:hola|int", "0")
        .with_entry("lv:wt:comer|verb", "\"?\"")
        .with_entry("v23:wt:comer|verb", "4");
    let store = Store::new(backend);
    assert_eq!(store.weight("hola|int"), 2);
    assert_eq!(store.weight("comer|verb"), 3);
}

#[test]
fn reset_forgets_legacy_progress_across_reload() {
    let backend = MemoryKeyValueStore::new()
        .with_entry("v23:wt:hola|int", "4")
        .with_entry("v23:star:hola|int", "1");
    let mut store = Store::new(backend);
    assert_eq!(store.weight("hola|int"), 5);
    assert_eq!(store.set_weight("hola|int", 2), 2);

    store.reset_persistent_state();
    assert_eq!(store.weight("hola|int"), 3);
    assert!(!store.star("hola|int"));

    let reloaded = Store::new(store.into_backend());
    assert_eq!(reloaded.weight("hola|int"), 3);
    assert!(!reloaded.star("hola|int"));
}

#[test]
fn silent_weight_writes_skip_listeners() {
    let mut store = Store::new(MemoryKeyValueStore::new());
    let hits = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&hits);
    store.subscribe(move || *counter.borrow_mut() += 1);

    assert_eq!(store.set_weight_silently("hola|int", 4), 4);
    assert_eq!(store.weight("hola|int"), 4);
    assert_eq!(*hits.borrow(), 0);
    assert_eq!(store.event_count(EventKind::Progress), 0);
}

#[test]
fn stars_toggle_and_persist_per_term() {
    let mut store = Store::new(MemoryKeyValueStore::new());
    store.set_star("hola|int", true);
    assert!(store.star("hola|int"));
    assert!(!store.star("adios|int"));

    store.set_star("hola|int", false);
    assert!(!store.star("hola|int"));
    assert_eq!(
        store.persistence().backend().raw("lv:star:hola|int"),
        Some("false")
    );
}
