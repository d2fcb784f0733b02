//! 绑定存储集成测试

mod common;

use std::sync::Arc;

use common::{build_registry, FakeBackend};
use hotbind::store::{BindingStore, DEFAULT_KEY_PREFIX, TOMBSTONE};
use hotbind::{BindingState, JsonFileStore, Key, KeyValueStore, MemoryStore, Modifier, Name, Shortcut};

fn name(raw: &str) -> Name {
    Name::new(raw, None)
}

#[test]
fn test_binding_states() {
    let memory = Arc::new(MemoryStore::new());
    let bindings = BindingStore::new(memory.clone(), DEFAULT_KEY_PREFIX);
    let toggle = name("toggle");
    let shortcut = Shortcut::with_key(Key::T, [Modifier::Command]);

    assert_eq!(bindings.load(&toggle), BindingState::Absent);

    bindings.save(&toggle, &shortcut).unwrap();
    assert_eq!(bindings.load(&toggle), BindingState::Bound(shortcut));

    bindings.clear(&toggle).unwrap();
    assert_eq!(bindings.load(&toggle), BindingState::Cleared);
    assert_eq!(memory.get("KeyboardShortcuts_toggle").as_deref(), Some(TOMBSTONE));

    memory.set("KeyboardShortcuts_toggle", b"???").unwrap();
    assert_eq!(bindings.load(&toggle), BindingState::Corrupt);
    assert!(bindings.has_entry(&toggle));
}

#[test]
fn test_custom_prefix() {
    let memory = Arc::new(MemoryStore::new());
    let bindings = BindingStore::new(memory.clone(), "app.shortcuts.");

    bindings
        .save(&name("mute"), &Shortcut::with_key(Key::M, [Modifier::Control]))
        .unwrap();

    assert_eq!(memory.keys(), vec!["app.shortcuts.mute".to_string()]);
}

#[test]
fn test_file_store_persists_across_opens() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("bindings.json");

    {
        let store = JsonFileStore::open(path.clone()).unwrap();
        store.set("a", b"alpha").unwrap();
        store.set("b", TOMBSTONE).unwrap();
        store.remove("a").unwrap();
    }

    let store = JsonFileStore::open(path.clone()).unwrap();
    assert!(!store.exists("a"));
    assert_eq!(store.get("b").as_deref(), Some(TOMBSTONE));
    assert!(path.exists());
}

#[test]
fn test_file_store_malformed_file_degrades_to_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bindings.json");
    std::fs::write(&path, r#"{"KeyboardShortcuts_toggle": 42"#).unwrap();

    let store = JsonFileStore::open(path.clone()).unwrap();
    assert!(!store.exists("KeyboardShortcuts_toggle"));
    assert!(dir.path().join("bindings.json.corrupt").exists());
}

#[test]
fn test_registry_builds_over_malformed_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bindings.json");
    std::fs::write(&path, "{{{").unwrap();

    let store = Arc::new(JsonFileStore::open(path).unwrap());
    let backend = FakeBackend::new();
    let registry = build_registry(&backend, store);
    let toggle = Shortcut::with_key(Key::T, [Modifier::Command]);
    let name = registry.declare("toggle", Some(toggle));

    assert_eq!(registry.shortcut(&name), Some(toggle));
    assert!(backend.is_live(&toggle));
}
