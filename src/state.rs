//! Session plus deck, with the deck persisted after every mutation.

use crate::deck::Deck;
use crate::error::Result;
use crate::session::Session;
use crate::store::{DeckStore, KeyValueStore};

/// Everything a forge mutates: the session, the in-memory deck and the store
/// the deck is written to.
pub struct ForgeState<S> {
    session: Session,
    deck: Deck,
    store: DeckStore<S>,
}

impl<S: KeyValueStore> ForgeState<S> {
    /// Load the deck from `store` and start with an empty session.
    pub fn load(store: DeckStore<S>) -> Self {
        let deck = store.load();
        log::info!("Loaded deck '{}' with {} card(s)", store.key(), deck.len());
        Self {
            session: Session::new(),
            deck,
            store,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn store(&self) -> &DeckStore<S> {
        &self.store
    }

    /// True when the current session can be saved as a new card.
    pub fn can_save(&self) -> bool {
        self.session.can_save(&self.deck)
    }

    /// Save the current session as a card.
    ///
    /// Returns `Ok(false)` without touching anything when saving is not
    /// possible (incomplete session or name already in the deck).
    pub fn save_to_deck(&mut self) -> Result<bool> {
        let card = match self.session.to_deck_card() {
            Some(card) if !self.deck.contains(card.name()) => card,
            _ => return Ok(false),
        };
        let name = card.name().to_string();
        let next = self.deck.append(card);
        self.commit(next)?;
        log::info!("Saved '{}' to the deck", name);
        Ok(true)
    }

    /// Remove the card named `name`. Returns `Ok(false)` if no such card.
    pub fn remove_from_deck(&mut self, name: &str) -> Result<bool> {
        if !self.deck.contains(name) {
            return Ok(false);
        }
        let next = self.deck.remove(name);
        self.commit(next)?;
        log::info!("Removed '{}' from the deck", name);
        Ok(true)
    }

    /// Discard the in-memory deck and read it again from storage.
    pub fn reload_deck(&mut self) -> &Deck {
        self.deck = self.store.load();
        &self.deck
    }

    /// Persist `next` and only then make it the current deck, so a failed
    /// write leaves the previous deck in place.
    fn commit(&mut self, next: Deck) -> Result<()> {
        if let Err(e) = self.store.save(&next) {
            log::error!("Failed to persist deck '{}': {}", self.store.key(), e);
            return Err(e);
        }
        self.deck = next;
        Ok(())
    }
}
