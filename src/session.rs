//! Character session state.
//!
//! Holds the character currently on display plus its optional portrait and
//! backstory. Each concern is an independent [`Slot`] with its own in-flight
//! and error flags. Every operation is split into a `begin_*` call, which
//! hands out a [`Ticket`], and a `finish_*` call, which applies the result
//! only if the ticket still matches the session's generation. Starting a new
//! character bumps the generation, so results for a replaced character are
//! discarded.

use crate::deck::Deck;
use crate::error::{ForgeError, Result};
use crate::models::{Character, CharacterClass, DeckCard, Portrait};

// ---------------------------------------------------------------------------
// Slot
// ---------------------------------------------------------------------------

/// One asynchronously produced value with its loading and error flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot<T> {
    value: Option<T>,
    loading: bool,
    error: Option<String>,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self {
            value: None,
            loading: false,
            error: None,
        }
    }
}

impl<T> Slot<T> {
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_present(&self) -> bool {
        self.value.is_some()
    }

    fn start(&mut self) {
        self.value = None;
        self.error = None;
        self.loading = true;
    }

    fn succeed(&mut self, value: T) {
        self.value = Some(value);
        self.error = None;
        self.loading = false;
    }

    fn fail(&mut self, message: String) {
        self.value = None;
        self.error = Some(message);
        self.loading = false;
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

// ---------------------------------------------------------------------------
// Ticket / EnrichmentRequest
// ---------------------------------------------------------------------------

/// Generation captured when an operation starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
}

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Everything a portrait or backstory call needs, captured at launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentRequest {
    pub ticket: Ticket,
    pub name: String,
    pub class: CharacterClass,
}

/// Result of applying a finished operation to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The result belonged to the current character and was stored.
    Applied(T),
    /// The character was replaced while the call was in flight.
    Discarded,
}

impl<T> Outcome<T> {
    pub fn applied(self) -> Option<T> {
        match self {
            Outcome::Applied(v) => Some(v),
            Outcome::Discarded => None,
        }
    }

    pub fn is_discarded(&self) -> bool {
        matches!(self, Outcome::Discarded)
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Session {
    generation: u64,
    character: Slot<Character>,
    portrait: Slot<Portrait>,
    backstory: Slot<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn character(&self) -> &Slot<Character> {
        &self.character
    }

    pub fn portrait(&self) -> &Slot<Portrait> {
        &self.portrait
    }

    pub fn backstory(&self) -> &Slot<String> {
        &self.backstory
    }

    // -- Character ---------------------------------------------------------

    /// Start generating a new character.
    ///
    /// Clears the current character, portrait and backstory and invalidates
    /// every ticket issued before.
    pub fn begin_character(&mut self) -> Ticket {
        self.generation += 1;
        self.character.start();
        self.portrait.reset();
        self.backstory.reset();
        Ticket {
            generation: self.generation,
        }
    }

    pub fn finish_character(
        &mut self,
        ticket: Ticket,
        result: Result<Character>,
    ) -> Result<Outcome<Character>> {
        if !self.is_current(ticket) {
            log::debug!("Discarding stale character result (generation {})", ticket.generation);
            return Ok(Outcome::Discarded);
        }
        match result {
            Ok(character) => {
                self.character.succeed(character.clone());
                Ok(Outcome::Applied(character))
            }
            Err(e) => {
                self.character
                    .fail("Failed to generate character. Please try again.".into());
                Err(e)
            }
        }
    }

    // -- Portrait ----------------------------------------------------------

    /// Start generating a portrait for the current character.
    ///
    /// Fails if there is no character or a portrait is already in flight.
    pub fn begin_portrait(&mut self) -> Result<EnrichmentRequest> {
        let request = self.enrichment_request("portrait", self.portrait.loading)?;
        self.portrait.start();
        Ok(request)
    }

    pub fn finish_portrait(
        &mut self,
        ticket: Ticket,
        result: Result<Portrait>,
    ) -> Result<Outcome<Portrait>> {
        if !self.is_current(ticket) {
            log::debug!("Discarding stale portrait result (generation {})", ticket.generation);
            return Ok(Outcome::Discarded);
        }
        match result {
            Ok(portrait) => {
                self.portrait.succeed(portrait.clone());
                Ok(Outcome::Applied(portrait))
            }
            Err(e) => {
                self.portrait
                    .fail("Failed to generate portrait. Please try again.".into());
                Err(e)
            }
        }
    }

    // -- Backstory ---------------------------------------------------------

    /// Start generating a backstory for the current character.
    ///
    /// Fails if there is no character or a backstory is already in flight.
    pub fn begin_backstory(&mut self) -> Result<EnrichmentRequest> {
        let request = self.enrichment_request("backstory", self.backstory.loading)?;
        self.backstory.start();
        Ok(request)
    }

    pub fn finish_backstory(
        &mut self,
        ticket: Ticket,
        result: Result<String>,
    ) -> Result<Outcome<String>> {
        if !self.is_current(ticket) {
            log::debug!("Discarding stale backstory result (generation {})", ticket.generation);
            return Ok(Outcome::Discarded);
        }
        match result {
            Ok(backstory) => {
                self.backstory.succeed(backstory.clone());
                Ok(Outcome::Applied(backstory))
            }
            Err(e) => {
                self.backstory
                    .fail("Failed to generate backstory. Please try again.".into());
                Err(e)
            }
        }
    }

    // -- Deck --------------------------------------------------------------

    /// Build a card from the current character, portrait and backstory.
    ///
    /// Returns `None` unless all three are present.
    pub fn to_deck_card(&self) -> Option<DeckCard> {
        let character = self.character.value()?;
        let portrait = self.portrait.value()?;
        let backstory = self.backstory.value()?;
        DeckCard::new(character.clone(), portrait.data_uri(), backstory.clone()).ok()
    }

    /// True when the session holds a complete card whose name is not yet in
    /// `deck`.
    pub fn can_save(&self, deck: &Deck) -> bool {
        match self.to_deck_card() {
            Some(card) => !deck.contains(card.name()),
            None => false,
        }
    }

    fn is_current(&self, ticket: Ticket) -> bool {
        ticket.generation == self.generation
    }

    fn enrichment_request(&self, what: &str, in_flight: bool) -> Result<EnrichmentRequest> {
        let character = self.character.value().ok_or_else(|| {
            ForgeError::InvalidState(format!("no character to generate a {} for", what))
        })?;
        if in_flight {
            return Err(ForgeError::InvalidState(format!(
                "a {} is already being generated",
                what
            )));
        }
        Ok(EnrichmentRequest {
            ticket: Ticket {
                generation: self.generation,
            },
            name: character.name.clone(),
            class: character.class,
        })
    }
}
