//! Random attribute generator.
//!
//! Picks a character class uniformly and draws its stats from the class's
//! inclusive ranges. The `_with` variants take an explicit RNG so callers can
//! seed them; the plain variants use the thread-local generator.

use crate::models::{Character, CharacterClass};
use rand::prelude::*;
use std::ops::RangeInclusive;

/// Roll a character with the given name using the thread-local RNG.
pub fn roll_character(name: impl Into<String>) -> Character {
    let mut rng = thread_rng();
    roll_character_with(&mut rng, name)
}

/// Roll a character with the given name from `rng`.
pub fn roll_character_with<R: Rng + ?Sized>(rng: &mut R, name: impl Into<String>) -> Character {
    let class = roll_class(rng);
    roll_stats(rng, name, class)
}

/// Pick one of the three classes uniformly.
pub fn roll_class<R: Rng + ?Sized>(rng: &mut R) -> CharacterClass {
    CharacterClass::ALL[rng.gen_range(0..CharacterClass::ALL.len())]
}

/// Draw stats for a fixed class.
pub fn roll_stats<R: Rng + ?Sized>(
    rng: &mut R,
    name: impl Into<String>,
    class: CharacterClass,
) -> Character {
    let ranges = class.stat_ranges();
    Character {
        name: name.into(),
        class,
        health: random_stat(rng, ranges.health),
        mana: random_stat(rng, ranges.mana),
        strength: random_stat(rng, ranges.strength),
    }
}

/// Uniform draw from an inclusive range.
pub fn random_stat<R: Rng + ?Sized>(rng: &mut R, range: RangeInclusive<i32>) -> i32 {
    rng.gen_range(range)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn random_stat_hits_both_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen_min = false;
        let mut seen_max = false;
        for _ in 0..2000 {
            let v = random_stat(&mut rng, 5..=10);
            assert!((5..=10).contains(&v));
            seen_min |= v == 5;
            seen_max |= v == 10;
        }
        assert!(seen_min && seen_max);
    }

    #[test]
    fn roll_class_covers_every_class() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..300 {
            seen.insert(roll_class(&mut rng));
        }
        assert_eq!(seen.len(), 3);
    }
}
