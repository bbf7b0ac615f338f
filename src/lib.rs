//! Fantasy character forge.
//!
//! Generates a fantasy name, portrait and backstory through Google's
//! generative-AI API, rolls class and stats locally, and lets the user collect
//! finished characters into a deck persisted to local storage.
//!
//! # Quick start
//!
//! ```no_run
//! use character_forge::CharacterForge;
//!
//! let mut forge = CharacterForge::builder().api_key("AIza...").build().unwrap();
//!
//! let hero = forge.generate_character().unwrap();
//! forge.generate_portrait().unwrap();
//! forge.generate_backstory().unwrap();
//! forge.save_to_deck().unwrap();
//!
//! println!("{} joins a deck of {}", hero.name, forge.deck().len());
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod client;
pub mod config;
pub mod deck;
pub mod error;
pub mod models;
pub mod roll;
pub mod session;
pub mod state;
pub mod store;

#[cfg(feature = "async")]
pub use async_client::AsyncCharacterForge;
pub use client::{ContentGenerator, GeminiClient};
pub use deck::Deck;
pub use error::{ForgeError, Result};
pub use models::{Character, CharacterClass, DeckCard, Portrait};
pub use session::{Outcome, Session};
pub use state::ForgeState;
pub use store::{DeckStore, FileStore, KeyValueStore, MemoryStore};

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ---------------------------------------------------------------------------
// CharacterForgeBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`CharacterForge`].
///
/// Use [`CharacterForge::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](CharacterForgeBuilder::build).
#[derive(Clone)]
pub struct CharacterForgeBuilder {
    api_key: Option<String>,
    storage_dir: Option<PathBuf>,
    base_url: String,
    text_model: String,
    image_model: String,
    timeout: Duration,
}

impl Default for CharacterForgeBuilder {
    fn default() -> Self {
        Self {
            api_key: None,
            storage_dir: None,
            base_url: config::API_BASE.to_string(),
            text_model: config::DEFAULT_TEXT_MODEL.to_string(),
            image_model: config::DEFAULT_IMAGE_MODEL.to_string(),
            timeout: config::DEFAULT_TIMEOUT,
        }
    }
}

impl CharacterForgeBuilder {
    /// Set the API key.
    ///
    /// If not set, `API_KEY` and then `GEMINI_API_KEY` are read from the
    /// environment.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the directory the deck is stored in.
    ///
    /// If not set, the platform data directory is used (e.g.
    /// `~/.local/share/character-forge` on Linux).
    pub fn storage_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.storage_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Override the API base URL (useful for proxies).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Model used for names and backstories. Defaults to `gemini-2.5-flash`.
    pub fn text_model(mut self, model: impl Into<String>) -> Self {
        self.text_model = model.into();
        self
    }

    /// Model used for portraits. Defaults to `imagen-4.0-generate-001`.
    pub fn image_model(mut self, model: impl Into<String>) -> Self {
        self.image_model = model.into();
        self
    }

    /// Set the HTTP request timeout. Defaults to 120 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the forge: resolve the API key, open the storage directory and
    /// load the saved deck.
    pub fn build(self) -> Result<CharacterForge> {
        let api_key = self
            .api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .or_else(config::api_key_from_env)
            .ok_or(ForgeError::MissingApiKey)?;

        let generator = GeminiClient::new(api_key)
            .base_url(self.base_url)
            .text_model(self.text_model)
            .image_model(self.image_model)
            .timeout(self.timeout);
        let storage = FileStore::new(self.storage_dir)?;

        Ok(CharacterForge::from_parts(generator, storage))
    }
}

// ---------------------------------------------------------------------------
// CharacterForge
// ---------------------------------------------------------------------------

/// Blocking entry point: generates characters and manages the deck.
///
/// Each `generate_*` call blocks on one remote request. For overlapping
/// portrait and backstory requests use `AsyncCharacterForge` (feature
/// `async`).
pub struct CharacterForge<G = GeminiClient, S = FileStore> {
    generator: G,
    state: ForgeState<S>,
}

impl CharacterForge {
    /// Create a new builder for configuring the forge.
    pub fn builder() -> CharacterForgeBuilder {
        CharacterForgeBuilder::default()
    }
}

impl<G: ContentGenerator, S: KeyValueStore> CharacterForge<G, S> {
    /// Assemble a forge from a generator and a storage backend, loading the
    /// deck stored under the default key.
    pub fn from_parts(generator: G, storage: S) -> Self {
        Self {
            generator,
            state: ForgeState::load(DeckStore::new(storage)),
        }
    }

    /// Generate a new character: a remote name plus locally rolled class and
    /// stats. Clears any portrait and backstory of the previous character.
    pub fn generate_character(&mut self) -> Result<Character> {
        let ticket = self.state.session_mut().begin_character();
        let name = client::generate_name(&self.generator);
        let character = roll::roll_character(name);
        let outcome = self
            .state
            .session_mut()
            .finish_character(ticket, Ok(character))?;
        applied(outcome, "character")
    }

    /// Generate a portrait for the current character.
    ///
    /// On failure the error is returned, the session records a message and
    /// no portrait is set.
    pub fn generate_portrait(&mut self) -> Result<Portrait> {
        let request = self.state.session_mut().begin_portrait()?;
        let result = client::generate_portrait(&self.generator, &request.name, request.class);
        let outcome = self
            .state
            .session_mut()
            .finish_portrait(request.ticket, result)?;
        applied(outcome, "portrait")
    }

    /// Generate a backstory for the current character.
    pub fn generate_backstory(&mut self) -> Result<String> {
        let request = self.state.session_mut().begin_backstory()?;
        let result = client::generate_backstory(&self.generator, &request.name, request.class);
        let outcome = self
            .state
            .session_mut()
            .finish_backstory(request.ticket, result)?;
        applied(outcome, "backstory")
    }

    /// Save the current character to the deck. See [`ForgeState::save_to_deck`].
    pub fn save_to_deck(&mut self) -> Result<bool> {
        self.state.save_to_deck()
    }

    /// Remove a card from the deck by name.
    pub fn remove_from_deck(&mut self, name: &str) -> Result<bool> {
        self.state.remove_from_deck(name)
    }

    /// Re-read the deck from storage.
    pub fn reload_deck(&mut self) -> &Deck {
        self.state.reload_deck()
    }

    pub fn can_save(&self) -> bool {
        self.state.can_save()
    }

    pub fn deck(&self) -> &Deck {
        self.state.deck()
    }

    pub fn session(&self) -> &Session {
        self.state.session()
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Split the forge into its generator and state.
    pub fn into_parts(self) -> (G, ForgeState<S>) {
        (self.generator, self.state)
    }
}

fn applied<T>(outcome: Outcome<T>, what: &str) -> Result<T> {
    outcome.applied().ok_or_else(|| {
        ForgeError::InvalidState(format!("{} result was superseded by a newer character", what))
    })
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl<G, S> fmt::Display for CharacterForge<G, S>
where
    S: KeyValueStore,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let current = self
            .state
            .session()
            .character()
            .value()
            .map(|c| c.name.as_str())
            .unwrap_or("-");
        write!(
            f,
            "CharacterForge(deck_key={}, deck=[{}], current={})",
            self.state.store().key(),
            self.state.deck().names().join(", "),
            current
        )
    }
}
