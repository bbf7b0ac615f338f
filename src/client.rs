//! Remote content client.
//!
//! The remote service is reached through the [`ContentGenerator`] trait: one
//! text-completion call and one image-generation call. [`GeminiClient`]
//! implements it against the Google Generative Language REST API. The three
//! content operations ([`generate_name`], [`generate_portrait`],
//! [`generate_backstory`]) each issue exactly one request and never retry.

use crate::config;
use crate::error::{ForgeError, Result};
use crate::models::{CharacterClass, Portrait};
use rand::prelude::*;
use reqwest::blocking::Client;
use serde_json::{json, Value};
use std::sync::OnceLock;
use std::time::Duration;

const NAME_PROMPT: &str =
    "Generate a single, unique, one-word fantasy character name appropriate for a high fantasy setting.";

// ---------------------------------------------------------------------------
// ContentGenerator
// ---------------------------------------------------------------------------

/// Boundary to an external text and image generation service.
pub trait ContentGenerator {
    /// Complete a text prompt, returning plain text.
    fn complete_text(&self, prompt: &str) -> Result<String>;

    /// Generate a single image for a prompt.
    ///
    /// Returns [`ForgeError::NoImageInResponse`] when the service answers
    /// without an image.
    fn generate_image(&self, prompt: &str) -> Result<Portrait>;
}

// ---------------------------------------------------------------------------
// Content operations
// ---------------------------------------------------------------------------

/// Ask for a one-word fantasy name.
///
/// Never fails: any remote error, or a reply with no usable token, yields a
/// random name from [`config::FALLBACK_NAMES`].
pub fn generate_name<G: ContentGenerator + ?Sized>(generator: &G) -> String {
    match generator.complete_text(NAME_PROMPT) {
        Ok(text) => match clean_name(&text) {
            Some(name) => name,
            None => {
                log::warn!("Name reply {:?} had no usable token, using fallback", text);
                fallback_name()
            }
        },
        Err(e) => {
            log::error!("Error generating fantasy name: {}", e);
            fallback_name()
        }
    }
}

/// Request a portrait for a named character of the given class.
pub fn generate_portrait<G: ContentGenerator + ?Sized>(
    generator: &G,
    name: &str,
    class: CharacterClass,
) -> Result<Portrait> {
    let prompt = portrait_prompt(name, class);
    generator.generate_image(&prompt).map_err(|e| {
        log::error!("Error generating portrait for {}: {}", name, e);
        e
    })
}

/// Request a short origin story for a named character of the given class.
pub fn generate_backstory<G: ContentGenerator + ?Sized>(
    generator: &G,
    name: &str,
    class: CharacterClass,
) -> Result<String> {
    let prompt = backstory_prompt(name, class);
    let text = generator.complete_text(&prompt).map_err(|e| {
        log::error!("Error generating backstory for {}: {}", name, e);
        e
    })?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ForgeError::InvalidResponse(
            "backstory reply was empty".into(),
        ));
    }
    Ok(trimmed.to_string())
}

pub fn portrait_prompt(name: &str, class: CharacterClass) -> String {
    format!(
        "A dramatic high fantasy character portrait of {}, a {}. \
         Head and shoulders, painterly digital art, moody lighting, no text.",
        name,
        class.as_str().to_lowercase()
    )
}

pub fn backstory_prompt(name: &str, class: CharacterClass) -> String {
    format!(
        "Write a one or two sentence origin story for {}, a {} in a high fantasy world. \
         Reply with the story only.",
        name,
        class.as_str().to_lowercase()
    )
}

/// Strip markdown and control characters and return the first word.
pub fn clean_name(raw: &str) -> Option<String> {
    let stripped: String = raw
        .chars()
        .filter(|&c| {
            !matches!(c, '*' | '`' | '#' | '_' | '"') && (!c.is_control() || c.is_whitespace())
        })
        .collect();
    let token = stripped.split_whitespace().next()?;
    let token = token.trim_matches(|c: char| matches!(c, '.' | ',' | '!' | ':' | ';'));
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

pub fn fallback_name() -> String {
    let mut rng = thread_rng();
    config::FALLBACK_NAMES[rng.gen_range(0..config::FALLBACK_NAMES.len())].to_string()
}

// ---------------------------------------------------------------------------
// GeminiClient
// ---------------------------------------------------------------------------

/// [`ContentGenerator`] backed by the Gemini (text) and Imagen (image) REST
/// endpoints.
pub struct GeminiClient {
    api_key: String,
    base_url: String,
    text_model: String,
    image_model: String,
    timeout: Duration,
    client: OnceLock<Client>,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into().trim().to_string(),
            base_url: config::API_BASE.to_string(),
            text_model: config::DEFAULT_TEXT_MODEL.to_string(),
            image_model: config::DEFAULT_IMAGE_MODEL.to_string(),
            timeout: config::DEFAULT_TIMEOUT,
            client: OnceLock::new(),
        }
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn text_model(mut self, model: impl Into<String>) -> Self {
        self.text_model = model.into();
        self
    }

    pub fn image_model(mut self, model: impl Into<String>) -> Self {
        self.image_model = model.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Lazy HTTP client, created on first use.
    fn client(&self) -> Result<&Client> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }
        let client = Client::builder()
            .timeout(self.timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(self.client.get_or_init(|| client))
    }

    fn post(&self, url: &str, body: &Value) -> Result<Value> {
        let resp = self
            .client()?
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().unwrap_or_default();
            return Err(ForgeError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(resp.json()?)
    }
}

impl ContentGenerator for GeminiClient {
    fn complete_text(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.text_model);
        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }]
        });
        log::debug!("POST {}", url);
        let data = self.post(&url, &body)?;
        parse_text_response(&data)
    }

    fn generate_image(&self, prompt: &str) -> Result<Portrait> {
        let url = format!("{}/models/{}:predict", self.base_url, self.image_model);
        let body = json!({
            "instances": [{ "prompt": prompt }],
            "parameters": {
                "sampleCount": 1,
                "aspectRatio": "1:1",
                "outputOptions": { "mimeType": "image/jpeg" }
            }
        });
        log::debug!("POST {}", url);
        let data = self.post(&url, &body)?;
        parse_image_response(&data)
    }
}

/// Extract the text of the first candidate of a `generateContent` reply.
pub fn parse_text_response(data: &Value) -> Result<String> {
    let parts = data["candidates"]
        .as_array()
        .and_then(|arr| arr.first())
        .and_then(|c| c["content"]["parts"].as_array())
        .ok_or_else(|| ForgeError::InvalidResponse("Missing content".into()))?;

    let text: String = parts.iter().filter_map(|p| p["text"].as_str()).collect();
    if text.is_empty() {
        return Err(ForgeError::InvalidResponse("Missing text part".into()));
    }
    Ok(text)
}

/// Extract the first image of a `predict` reply.
pub fn parse_image_response(data: &Value) -> Result<Portrait> {
    let prediction = data["predictions"]
        .as_array()
        .and_then(|arr| arr.first())
        .ok_or(ForgeError::NoImageInResponse)?;

    let bytes = prediction["bytesBase64Encoded"]
        .as_str()
        .filter(|s| !s.is_empty())
        .ok_or(ForgeError::NoImageInResponse)?;
    let mime_type = prediction["mimeType"].as_str().unwrap_or("image/jpeg");

    Ok(Portrait::new(mime_type, bytes))
}
