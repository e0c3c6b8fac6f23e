use notepad_core::{
    JsonFileStorage, NoteField, NoteStorage, NoteStore, StoreConfig, UNTITLED_LABEL,
};
use serde_json::{json, Value};
use std::time::Duration;

fn read_store_file(config: &StoreConfig) -> Value {
    let raw = std::fs::read_to_string(config.store_path()).unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn end_to_end_scenario_against_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::new(dir.path()).unwrap();
    let mut store = NoteStore::open(&config).unwrap();
    assert!(store.is_empty());
    assert_eq!(store.selection(), None);

    let n1 = store.create();
    assert_eq!(store.len(), 1);
    assert_eq!(store.selection(), Some(&n1));

    assert!(store.update(&n1, NoteField::Content, "hello"));
    store.flush().unwrap();
    assert_eq!(
        read_store_file(&config),
        json!([{ "id": n1.as_str(), "title": "Untitled", "content": "hello" }])
    );
    assert_eq!(store.notes()[0].display_title(), UNTITLED_LABEL);

    let n2 = store.create();
    let order: Vec<_> = store.notes().iter().map(|note| note.id.clone()).collect();
    assert_eq!(order, vec![n2.clone(), n1.clone()]);
    assert_eq!(store.selection(), Some(&n2));

    assert!(store.delete(&n2));
    assert_eq!(store.len(), 1);
    assert_eq!(store.notes()[0].id, n1);
    assert_eq!(store.selection(), Some(&n1));

    store.flush().unwrap();
    assert_eq!(
        read_store_file(&config),
        json!([{ "id": n1.as_str(), "title": "Untitled", "content": "hello" }])
    );
}

#[test]
fn reopen_restores_same_collection() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::new(dir.path()).unwrap();

    let saved = {
        let mut store = NoteStore::open(&config).unwrap();
        let first = store.create();
        store.update(&first, NoteField::Title, "Shopping");
        store.update(&first, NoteField::Content, "milk\neggs");
        let second = store.create();
        store.update(&second, NoteField::Title, "Ideas \u{1F4A1}");
        store.notes().to_vec()
    };

    let reopened = NoteStore::open(&config).unwrap();
    assert_eq!(reopened.notes(), saved.as_slice());
    assert_eq!(reopened.selection(), Some(&saved[0].id));
}

#[test]
fn rapid_edits_settle_to_latest_state() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::new(dir.path())
        .unwrap()
        .with_write_debounce(Duration::from_millis(20));
    let mut store = NoteStore::open(&config).unwrap();
    let id = store.create();

    let mut typed = String::new();
    for ch in "the quick brown fox".chars() {
        typed.push(ch);
        store.update(&id, NoteField::Content, typed.clone());
    }
    store.flush().unwrap();

    let on_disk = JsonFileStorage::new(config.store_path())
        .load()
        .unwrap()
        .expect("file written");
    assert_eq!(on_disk, store.notes());
    assert_eq!(on_disk[0].content, "the quick brown fox");
    assert_eq!(
        store.persist_status().written_generation,
        store.generation()
    );
}

#[test]
fn malformed_file_starts_empty_and_is_replaced_on_next_write() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::new(dir.path()).unwrap();
    std::fs::write(config.store_path(), "[{\"id\": 3").unwrap();

    let mut store = NoteStore::open(&config).unwrap();
    assert!(store.is_empty());

    let id = store.create();
    store.flush().unwrap();
    assert_eq!(
        read_store_file(&config),
        json!([{ "id": id.as_str(), "title": "Untitled", "content": "" }])
    );
}

#[test]
fn custom_file_name_is_used() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::new(dir.path())
        .unwrap()
        .with_file_name("scratch.json")
        .unwrap();
    let mut store = NoteStore::open(&config).unwrap();
    store.create();
    store.flush().unwrap();

    assert!(dir.path().join("scratch.json").exists());
    assert!(!dir.path().join("notes.json").exists());
}
