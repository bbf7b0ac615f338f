//! Shared test fixtures for the character forge integration tests.
//!
//! Provides a scripted [`FakeGenerator`] standing in for the remote service,
//! a [`FailingStore`] whose writes always fail, and sample characters/cards.

#![allow(dead_code)]

use character_forge::error::{ForgeError, Result};
use character_forge::{Character, CharacterClass, ContentGenerator, DeckCard, KeyValueStore, Portrait};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::Receiver;
use std::sync::Mutex;

/// Scripted stand-in for the remote generation service.
///
/// A `None` reply makes the corresponding call fail with a 503 API error.
pub struct FakeGenerator {
    pub name_reply: Option<String>,
    pub backstory_reply: Option<String>,
    pub image_reply: Option<Portrait>,
    pub text_calls: AtomicUsize,
    pub image_calls: AtomicUsize,
    pub prompts: Mutex<Vec<String>>,
    /// When set, `generate_image` blocks until a message arrives.
    pub image_gate: Mutex<Option<Receiver<()>>>,
}

impl FakeGenerator {
    /// A generator where every call succeeds.
    pub fn working() -> Self {
        Self {
            name_reply: Some("**Thalindor**\n".to_string()),
            backstory_reply: Some("  Raised by storm giants, Thalindor learned to speak with thunder.\n".to_string()),
            image_reply: Some(Portrait::new("image/jpeg", "/9j/4AAQSkZJRg==")),
            text_calls: AtomicUsize::new(0),
            image_calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
            image_gate: Mutex::new(None),
        }
    }

    /// A generator where every call fails.
    pub fn broken() -> Self {
        Self {
            name_reply: None,
            backstory_reply: None,
            image_reply: None,
            ..Self::working()
        }
    }

    pub fn with_name(mut self, reply: Option<&str>) -> Self {
        self.name_reply = reply.map(str::to_string);
        self
    }

    pub fn with_backstory(mut self, reply: Option<&str>) -> Self {
        self.backstory_reply = reply.map(str::to_string);
        self
    }

    pub fn with_image(mut self, reply: Option<Portrait>) -> Self {
        self.image_reply = reply;
        self
    }

    pub fn gated(self, gate: Receiver<()>) -> Self {
        *self.image_gate.lock().unwrap() = Some(gate);
        self
    }

    pub fn text_calls(&self) -> usize {
        self.text_calls.load(Ordering::SeqCst)
    }

    pub fn image_calls(&self) -> usize {
        self.image_calls.load(Ordering::SeqCst)
    }
}

fn unavailable() -> ForgeError {
    ForgeError::Api {
        status: 503,
        message: "service unavailable".to_string(),
    }
}

impl ContentGenerator for FakeGenerator {
    fn complete_text(&self, prompt: &str) -> Result<String> {
        self.text_calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        let reply = if prompt.contains("one-word fantasy character name") {
            &self.name_reply
        } else {
            &self.backstory_reply
        };
        reply.clone().ok_or_else(unavailable)
    }

    fn generate_image(&self, prompt: &str) -> Result<Portrait> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        let gate = self.image_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.recv();
        }
        self.image_reply.clone().ok_or(ForgeError::NoImageInResponse)
    }
}

/// Storage whose reads succeed (empty) and whose writes always fail.
#[derive(Default)]
pub struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
        Err(ForgeError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only storage",
        )))
    }
}

pub fn sample_character(name: &str, class: CharacterClass) -> Character {
    let ranges = class.stat_ranges();
    Character {
        name: name.to_string(),
        class,
        health: *ranges.health.start(),
        mana: *ranges.mana.end(),
        strength: *ranges.strength.start(),
    }
}

pub fn sample_card(name: &str) -> DeckCard {
    DeckCard::new(
        sample_character(name, CharacterClass::Mage),
        format!("data:image/jpeg;base64,{}", name),
        format!("{} was born under a falling star.", name),
    )
    .unwrap()
}
