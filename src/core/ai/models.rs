use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiMessage {
    pub role: String,
    pub content: String,
}

impl AiMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Sampling parameters sent with every request. These come from process
/// configuration, never from the user.
#[derive(Debug, Clone, PartialEq)]
pub struct AiConfig {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

/// Result of one generation call.
///
/// Providers report "no usable text" as `Empty` rather than an error so the
/// caller can tell a silent model apart from a failed request.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    Generated(String),
    Empty,
    /// The request failed. Holds the diagnostic detail for logging only.
    Failed(String),
}
