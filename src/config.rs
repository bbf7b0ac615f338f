use std::path::PathBuf;
use std::time::Duration;

pub const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_IMAGE_MODEL: &str = "imagen-4.0-generate-001";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Environment variables consulted, in order, when no API key is configured.
pub const API_KEY_ENV_VARS: [&str; 2] = ["API_KEY", "GEMINI_API_KEY"];

/// Storage key holding the serialized deck.
pub const DECK_KEY: &str = "character-deck";

pub const FALLBACK_NAMES: [&str; 5] = ["Aerion", "Lyra", "Kael", "Seraphina", "Roric"];

pub fn api_key_from_env() -> Option<String> {
    API_KEY_ENV_VARS
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .map(|key| key.trim().to_string())
        .find(|key| !key.is_empty())
}

pub fn default_storage_dir() -> PathBuf {
    if let Some(data) = dirs::data_dir() {
        data.join("character-forge")
    } else {
        PathBuf::from(".character-forge")
    }
}
