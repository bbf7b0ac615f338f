//! The deck: an ordered collection of [`DeckCard`]s, unique by name.
//!
//! Mutations return a new deck and leave the receiver untouched, so a caller
//! can persist the result first and only then commit it.

use crate::models::DeckCard;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Deck {
    cards: Vec<DeckCard>,
}

impl Deck {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a deck from cards in order, dropping later duplicates by name.
    pub fn from_cards<I: IntoIterator<Item = DeckCard>>(cards: I) -> Self {
        cards
            .into_iter()
            .fold(Deck::new(), |deck, card| deck.append(card))
    }

    /// Return a deck with `card` appended, or an unchanged copy if a card with
    /// the same name is already present.
    pub fn append(&self, card: DeckCard) -> Deck {
        if self.contains(card.name()) {
            return self.clone();
        }
        let mut cards = self.cards.clone();
        cards.push(card);
        Deck { cards }
    }

    /// Return a deck without the card named `name`.
    pub fn remove(&self, name: &str) -> Deck {
        Deck {
            cards: self
                .cards
                .iter()
                .filter(|c| c.name() != name)
                .cloned()
                .collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.cards.iter().any(|c| c.name() == name)
    }

    pub fn get(&self, name: &str) -> Option<&DeckCard> {
        self.cards.iter().find(|c| c.name() == name)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DeckCard> {
        self.cards.iter()
    }

    pub fn cards(&self) -> &[DeckCard] {
        &self.cards
    }

    pub fn names(&self) -> Vec<&str> {
        self.cards.iter().map(|c| c.name()).collect()
    }
}

impl<'a> IntoIterator for &'a Deck {
    type Item = &'a DeckCard;
    type IntoIter = std::slice::Iter<'a, DeckCard>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.iter()
    }
}
