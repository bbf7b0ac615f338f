use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

// ---------------------------------------------------------------------------
// CharacterClass
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterClass {
    Mage,
    Rogue,
    Warrior,
}

impl CharacterClass {
    pub const ALL: [CharacterClass; 3] = [
        CharacterClass::Mage,
        CharacterClass::Rogue,
        CharacterClass::Warrior,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CharacterClass::Mage => "Mage",
            CharacterClass::Rogue => "Rogue",
            CharacterClass::Warrior => "Warrior",
        }
    }

    /// One-line flavour text shown alongside the class name.
    pub fn description(&self) -> &'static str {
        match self {
            CharacterClass::Mage => {
                "A master of arcane energies, weaving potent spells to decimate foes or protect allies."
            }
            CharacterClass::Rogue => {
                "A shadowy figure who thrives in the darkness, striking with precision and vanishing without a trace."
            }
            CharacterClass::Warrior => {
                "A stalwart combatant and expert of arms, standing firm on the front lines of battle."
            }
        }
    }

    /// Inclusive stat ranges a character of this class is rolled from.
    pub fn stat_ranges(&self) -> StatRanges {
        match self {
            CharacterClass::Warrior => StatRanges {
                health: 80..=120,
                mana: 10..=30,
                strength: 15..=25,
            },
            CharacterClass::Mage => StatRanges {
                health: 50..=80,
                mana: 80..=120,
                strength: 5..=10,
            },
            CharacterClass::Rogue => StatRanges {
                health: 60..=90,
                mana: 40..=60,
                strength: 10..=20,
            },
        }
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatRanges {
    pub health: RangeInclusive<i32>,
    pub mana: RangeInclusive<i32>,
    pub strength: RangeInclusive<i32>,
}

// ---------------------------------------------------------------------------
// Character
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub class: CharacterClass,
    pub health: i32,
    pub mana: i32,
    pub strength: i32,
}
