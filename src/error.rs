#[derive(Debug, thiserror::Error)]
pub enum ForgeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("No image in response")]
    NoImageInResponse,

    #[error("No API key configured (set API_KEY or GEMINI_API_KEY)")]
    MissingApiKey,

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl ForgeError {
    /// True for failures of a call to the remote generation service.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            ForgeError::Http(_)
                | ForgeError::Api { .. }
                | ForgeError::InvalidResponse(_)
                | ForgeError::NoImageInResponse
        )
    }
}

pub type Result<T> = std::result::Result<T, ForgeError>;
