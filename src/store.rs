//! Key-value storage and deck persistence.
//!
//! [`KeyValueStore`] is the storage boundary. [`FileStore`] keeps one
//! `<key>.json` file per key in a directory and replaces it atomically on
//! write; [`MemoryStore`] keeps everything in a map. [`DeckStore`] reads and
//! writes the serialized deck under a single key.

use crate::config;
use crate::deck::Deck;
use crate::error::{ForgeError, Result};
use crate::models::DeckCard;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

// ---------------------------------------------------------------------------
// KeyValueStore
// ---------------------------------------------------------------------------

pub trait KeyValueStore {
    /// Read the value under `key`, or `None` if the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value under `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

// ---------------------------------------------------------------------------
// FileStore
// ---------------------------------------------------------------------------

pub struct FileStore {
    /// Directory holding one file per key.
    pub dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    ///
    /// If `dir` is `None`, uses the platform-appropriate data directory.
    pub fn new(dir: Option<PathBuf>) -> Result<Self> {
        let dir = dir.unwrap_or_else(config::default_storage_dir);
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty()
            || key
                .chars()
                .any(|c| !(c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.'))
            || key.starts_with('.')
        {
            return Err(ForgeError::InvalidArgument(format!(
                "Invalid storage key: {:?}",
                key
            )));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&path)?))
    }

    /// Writes to a temp file in the same directory and renames it over the
    /// target, so a failed write never leaves a truncated value behind.
    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.flush()?;
        tmp.persist(&path).map_err(|e| ForgeError::Io(e.error))?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with a raw value, e.g. to simulate data left by an older run.
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// DeckStore
// ---------------------------------------------------------------------------

/// Persists a [`Deck`] as a JSON array under one storage key.
pub struct DeckStore<S> {
    storage: S,
    key: String,
}

impl<S: KeyValueStore> DeckStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, config::DECK_KEY)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// Load the stored deck.
    ///
    /// An absent key, an unreadable value or a value that does not parse as a
    /// list of cards all yield an empty deck; the failure is logged.
    pub fn load(&self) -> Deck {
        let raw = match self.storage.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Deck::new(),
            Err(e) => {
                log::warn!("Failed to read deck '{}' from storage: {}", self.key, e);
                return Deck::new();
            }
        };

        match serde_json::from_str::<Vec<DeckCard>>(&raw) {
            Ok(cards) => {
                let count = cards.len();
                let deck = Deck::from_cards(cards);
                if deck.len() != count {
                    log::warn!(
                        "Dropped {} duplicate card(s) from stored deck '{}'",
                        count - deck.len(),
                        self.key
                    );
                }
                deck
            }
            Err(e) => {
                log::warn!("Failed to parse stored deck '{}': {} -- starting empty", self.key, e);
                Deck::new()
            }
        }
    }

    /// Serialize the whole deck and write it under the deck key.
    pub fn save(&mut self, deck: &Deck) -> Result<()> {
        let raw = serde_json::to_string(deck)?;
        self.storage.set(&self.key, &raw)?;
        log::debug!("Saved deck '{}' with {} card(s)", self.key, deck.len());
        Ok(())
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }
}
