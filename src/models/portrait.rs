use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Portrait — Encoded image payload returned by the image model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portrait {
    pub mime_type: String,
    /// Base64-encoded image bytes.
    pub data: String,
}

impl Portrait {
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Render as a `data:` URI suitable for a card's `portraitUrl`.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}
