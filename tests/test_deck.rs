//! Deck and deck persistence tests.

mod common;

use character_forge::{Deck, DeckStore, FileStore, KeyValueStore, MemoryStore};
use common::sample_card;

// ---------------------------------------------------------------------------
// append / remove
// ---------------------------------------------------------------------------

#[test]
fn append_preserves_order() {
    let deck = Deck::new()
        .append(sample_card("Aerion"))
        .append(sample_card("Lyra"))
        .append(sample_card("Kael"));
    assert_eq!(deck.names(), vec!["Aerion", "Lyra", "Kael"]);
}

#[test]
fn append_rejects_duplicate_name() {
    let deck = Deck::new().append(sample_card("Lyra"));
    let again = deck.append(sample_card("Lyra"));
    assert_eq!(again.len(), 1);
    assert_eq!(again, deck);
}

#[test]
fn append_duplicate_with_different_contents_keeps_original() {
    let deck = Deck::new().append(sample_card("Lyra"));
    let mut other = sample_card("Lyra");
    other.backstory = "A different tale.".to_string();
    let again = deck.append(other);
    assert_eq!(again.get("Lyra").unwrap().backstory, "Lyra was born under a falling star.");
}

#[test]
fn append_and_remove_leave_receiver_untouched() {
    let deck = Deck::new().append(sample_card("Lyra"));
    let bigger = deck.append(sample_card("Kael"));
    let smaller = bigger.remove("Lyra");
    assert_eq!(deck.names(), vec!["Lyra"]);
    assert_eq!(bigger.names(), vec!["Lyra", "Kael"]);
    assert_eq!(smaller.names(), vec!["Kael"]);
}

#[test]
fn remove_missing_name_is_noop() {
    let deck = Deck::new().append(sample_card("Lyra"));
    assert_eq!(deck.remove("Nobody"), deck);
}

// ---------------------------------------------------------------------------
// DeckStore
// ---------------------------------------------------------------------------

#[test]
fn load_from_fresh_storage_is_empty() {
    let store = DeckStore::new(MemoryStore::new());
    assert!(store.load().is_empty());
}

#[test]
fn load_from_malformed_storage_is_empty() {
    for raw in ["not json", "{\"name\": \"Lyra\"}", "[{\"name\": 3}]", ""] {
        let store = DeckStore::new(MemoryStore::new().with_entry("character-deck", raw));
        assert!(store.load().is_empty(), "expected empty deck for {:?}", raw);
    }
}

#[test]
fn remove_then_save_and_load_round_trips() {
    let deck = Deck::new()
        .append(sample_card("Aerion"))
        .append(sample_card("Lyra"))
        .append(sample_card("Kael"));
    let result = deck.remove("Lyra");

    let mut store = DeckStore::new(MemoryStore::new());
    store.save(&result).unwrap();
    assert_eq!(store.load(), result);
}

#[test]
fn saved_layout_is_array_of_flat_records() {
    let mut store = DeckStore::new(MemoryStore::new());
    store.save(&Deck::new().append(sample_card("Seraphina"))).unwrap();

    let raw = store.storage().get("character-deck").unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let record = &value.as_array().unwrap()[0];
    for field in ["name", "class", "health", "mana", "strength", "portraitUrl", "backstory"] {
        assert!(record.get(field).is_some(), "missing field {}", field);
    }
    assert_eq!(record["class"], "Mage");
}

#[test]
fn load_drops_duplicate_names_keeping_first() {
    let first = sample_card("Lyra");
    let mut second = sample_card("Lyra");
    second.backstory = "Second telling.".to_string();
    let raw = serde_json::to_string(&vec![first.clone(), second]).unwrap();

    let store = DeckStore::new(MemoryStore::new().with_entry("character-deck", raw));
    let deck = store.load();
    assert_eq!(deck.len(), 1);
    assert_eq!(deck.get("Lyra"), Some(&first));
}

#[test]
fn file_store_persists_across_instances() {
    let tmp = tempfile::tempdir().unwrap();
    let deck = Deck::new().append(sample_card("Roric"));

    let mut store = DeckStore::new(FileStore::new(Some(tmp.path().to_path_buf())).unwrap());
    store.save(&deck).unwrap();

    let reopened = DeckStore::new(FileStore::new(Some(tmp.path().to_path_buf())).unwrap());
    assert_eq!(reopened.load(), deck);
    assert!(tmp.path().join("character-deck.json").exists());
}

#[test]
fn custom_key_is_isolated() {
    let mut a = DeckStore::with_key(MemoryStore::new(), "deck-a");
    a.save(&Deck::new().append(sample_card("Lyra"))).unwrap();
    let b = DeckStore::with_key(a.storage().clone(), "deck-b");
    assert!(b.load().is_empty());
}
