use serde::{Deserialize, Serialize};

use super::character::{Character, CharacterClass};
use crate::error::{ForgeError, Result};

// ---------------------------------------------------------------------------
// DeckCard — A fully enriched character, eligible for the deck
// ---------------------------------------------------------------------------

/// A character together with its portrait and backstory.
///
/// Serialized flat, so a stored record carries `name, class, health, mana,
/// strength, portraitUrl, backstory` side by side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckCard {
    #[serde(flatten)]
    pub character: Character,
    pub portrait_url: String,
    pub backstory: String,
}

impl DeckCard {
    /// Build a card, rejecting an empty name, portrait URL or backstory.
    pub fn new(
        character: Character,
        portrait_url: impl Into<String>,
        backstory: impl Into<String>,
    ) -> Result<Self> {
        let portrait_url = portrait_url.into();
        let backstory = backstory.into();
        if character.name.trim().is_empty() {
            return Err(ForgeError::InvalidArgument(
                "card name must not be empty".into(),
            ));
        }
        if portrait_url.is_empty() {
            return Err(ForgeError::InvalidArgument(format!(
                "card '{}' has no portrait",
                character.name
            )));
        }
        if backstory.trim().is_empty() {
            return Err(ForgeError::InvalidArgument(format!(
                "card '{}' has no backstory",
                character.name
            )));
        }
        Ok(Self {
            character,
            portrait_url,
            backstory,
        })
    }

    pub fn name(&self) -> &str {
        &self.character.name
    }

    pub fn class(&self) -> CharacterClass {
        self.character.class
    }
}
