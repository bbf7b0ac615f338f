//! Async wrapper around the forge for use in async runtimes (Tokio, etc.).
//!
//! Remote calls run on Tokio's blocking thread pool via
//! [`tokio::task::spawn_blocking`]. The shared [`ForgeState`] sits behind a
//! mutex that is held only while a transition is applied, never across a
//! remote call, so a portrait and a backstory can be generated at the same
//! time. Results for a character that was replaced in the meantime come back
//! as [`Outcome::Discarded`].
//!
//! # Example
//!
//! ```no_run
//! use character_forge::AsyncCharacterForge;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let forge = AsyncCharacterForge::builder().build().await.unwrap();
//!
//!     forge.generate_character().await.unwrap();
//!     let (portrait, backstory) =
//!         tokio::join!(forge.generate_portrait(), forge.generate_backstory());
//!     portrait.unwrap();
//!     backstory.unwrap();
//!     forge.save_to_deck().await.unwrap();
//! }
//! ```

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::client::{self, ContentGenerator, GeminiClient};
use crate::deck::Deck;
use crate::error::{ForgeError, Result};
use crate::models::{Character, Portrait};
use crate::roll;
use crate::session::{Outcome, Session};
use crate::state::ForgeState;
use crate::store::{DeckStore, FileStore, KeyValueStore};
use crate::{CharacterForge, CharacterForgeBuilder};

// ---------------------------------------------------------------------------
// AsyncCharacterForgeBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncCharacterForge`].
#[derive(Clone, Default)]
pub struct AsyncCharacterForgeBuilder {
    inner: CharacterForgeBuilder,
}

impl AsyncCharacterForgeBuilder {
    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.inner = self.inner.api_key(key);
        self
    }

    /// Set the directory the deck is stored in.
    pub fn storage_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.inner = self.inner.storage_dir(path);
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.inner = self.inner.base_url(url);
        self
    }

    pub fn text_model(mut self, model: impl Into<String>) -> Self {
        self.inner = self.inner.text_model(model);
        self
    }

    pub fn image_model(mut self, model: impl Into<String>) -> Self {
        self.inner = self.inner.image_model(model);
        self
    }

    /// Set the HTTP request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.inner = self.inner.timeout(timeout);
        self
    }

    /// Build the async forge.
    ///
    /// Loading the deck touches the filesystem, so this runs on the blocking
    /// thread pool.
    pub async fn build(self) -> Result<AsyncCharacterForge> {
        let builder = self.inner;
        let forge = tokio::task::spawn_blocking(move || builder.build())
            .await
            .map_err(join_error)??;
        Ok(AsyncCharacterForge::from(forge))
    }
}

// ---------------------------------------------------------------------------
// AsyncCharacterForge
// ---------------------------------------------------------------------------

/// Async counterpart of [`CharacterForge`].
///
/// Cheap to clone; clones share the same generator and state.
pub struct AsyncCharacterForge<G = GeminiClient, S = FileStore> {
    generator: Arc<G>,
    state: Arc<Mutex<ForgeState<S>>>,
}

impl<G, S> Clone for AsyncCharacterForge<G, S> {
    fn clone(&self) -> Self {
        Self {
            generator: Arc::clone(&self.generator),
            state: Arc::clone(&self.state),
        }
    }
}

impl AsyncCharacterForge {
    /// Create a new builder for configuring the async forge.
    pub fn builder() -> AsyncCharacterForgeBuilder {
        AsyncCharacterForgeBuilder::default()
    }
}

impl<G, S> From<CharacterForge<G, S>> for AsyncCharacterForge<G, S>
where
    G: ContentGenerator,
    S: KeyValueStore,
{
    fn from(forge: CharacterForge<G, S>) -> Self {
        let (generator, state) = forge.into_parts();
        Self {
            generator: Arc::new(generator),
            state: Arc::new(Mutex::new(state)),
        }
    }
}

impl<G, S> AsyncCharacterForge<G, S>
where
    G: ContentGenerator + Send + Sync + 'static,
    S: KeyValueStore + Send + 'static,
{
    /// Assemble a forge from a generator and a storage backend, loading the
    /// deck stored under the default key.
    pub fn from_parts(generator: G, storage: S) -> Self {
        Self {
            generator: Arc::new(generator),
            state: Arc::new(Mutex::new(ForgeState::load(DeckStore::new(storage)))),
        }
    }

    /// Generate a new character. Invalidates in-flight portrait and backstory
    /// requests for the previous one.
    pub async fn generate_character(&self) -> Result<Outcome<Character>> {
        let ticket = lock(&self.state)?.session_mut().begin_character();
        let generator = Arc::clone(&self.generator);
        let name = tokio::task::spawn_blocking(move || client::generate_name(&*generator))
            .await
            .map_err(join_error)?;
        let character = roll::roll_character(name);
        lock(&self.state)?
            .session_mut()
            .finish_character(ticket, Ok(character))
    }

    /// Generate a portrait for the current character.
    pub async fn generate_portrait(&self) -> Result<Outcome<Portrait>> {
        let request = lock(&self.state)?.session_mut().begin_portrait()?;
        let generator = Arc::clone(&self.generator);
        let (name, class) = (request.name, request.class);
        let result = tokio::task::spawn_blocking(move || {
            client::generate_portrait(&*generator, &name, class)
        })
        .await
        .map_err(join_error)?;
        lock(&self.state)?
            .session_mut()
            .finish_portrait(request.ticket, result)
    }

    /// Generate a backstory for the current character.
    pub async fn generate_backstory(&self) -> Result<Outcome<String>> {
        let request = lock(&self.state)?.session_mut().begin_backstory()?;
        let generator = Arc::clone(&self.generator);
        let (name, class) = (request.name, request.class);
        let result = tokio::task::spawn_blocking(move || {
            client::generate_backstory(&*generator, &name, class)
        })
        .await
        .map_err(join_error)?;
        lock(&self.state)?
            .session_mut()
            .finish_backstory(request.ticket, result)
    }

    /// Save the current character to the deck.
    pub async fn save_to_deck(&self) -> Result<bool> {
        self.run(|state| state.save_to_deck()).await
    }

    /// Remove a card from the deck by name.
    pub async fn remove_from_deck(&self, name: &str) -> Result<bool> {
        let name = name.to_string();
        self.run(move |state| state.remove_from_deck(&name)).await
    }

    /// Re-read the deck from storage and return a snapshot of it.
    pub async fn reload_deck(&self) -> Result<Deck> {
        self.run(|state| Ok(state.reload_deck().clone())).await
    }

    /// Snapshot of the current deck.
    pub fn deck(&self) -> Result<Deck> {
        Ok(lock(&self.state)?.deck().clone())
    }

    /// Snapshot of the current session.
    pub fn session(&self) -> Result<Session> {
        Ok(lock(&self.state)?.session().clone())
    }

    pub fn can_save(&self) -> Result<bool> {
        Ok(lock(&self.state)?.can_save())
    }

    /// Run a closure against the shared state on the blocking thread pool.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut ForgeState<S>) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let state = Arc::clone(&self.state);
        tokio::task::spawn_blocking(move || {
            let mut guard = lock(&state)?;
            f(&mut guard)
        })
        .await
        .map_err(join_error)?
    }

    /// Release the forge on the blocking thread pool, so the blocking HTTP
    /// client is never dropped on the async event loop.
    pub async fn close(self) -> Result<()> {
        tokio::task::spawn_blocking(move || drop(self))
            .await
            .map_err(join_error)
    }
}

fn lock<S>(state: &Mutex<ForgeState<S>>) -> Result<MutexGuard<'_, ForgeState<S>>> {
    state
        .lock()
        .map_err(|_| ForgeError::InvalidState("forge state lock poisoned".into()))
}

fn join_error(e: tokio::task::JoinError) -> ForgeError {
    ForgeError::InvalidState(format!("Task join error: {e}"))
}
