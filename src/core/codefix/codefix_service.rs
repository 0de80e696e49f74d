// Code-fix service - sends a submitted snippet to the model with a fixed
// system prompt and turns the answer into something the command can relay.
//
// NO Discord dependencies here. The command layer owns the modal and the
// follow-up messages.

use crate::core::ai::{AiConfig, AiMessage, AiProvider, AiService, GenerationOutcome};

pub const DEFAULT_FIX_SYSTEM_PROMPT: &str = "You are an expert Python developer. \
The user sends a Python snippet. Find the bugs, return the corrected code in a \
```python block, then briefly list what you changed.";

/// What the command should tell the user after a fix request.
#[derive(Debug, Clone, PartialEq)]
pub enum FixOutcome {
    /// No model is configured; nothing was sent.
    NoModel,
    Fixed(String),
    Empty,
    /// Holds the diagnostic detail. Never shown to the user.
    Failed(String),
}

impl FixOutcome {
    /// Catalog key for outcomes that are answered with a canned message.
    pub fn message_key(&self) -> Option<&'static str> {
        match self {
            FixOutcome::NoModel => Some("errors.no_available_model"),
            FixOutcome::Fixed(_) => None,
            FixOutcome::Empty => Some("errors.ai_response_generation_failed"),
            FixOutcome::Failed(_) => Some("errors.fixpy_command_processing_error"),
        }
    }
}

pub struct CodeFixService<P: AiProvider> {
    ai: AiService<P>,
    system_prompt: String,
    /// `None` means no model is available for this feature.
    config: Option<AiConfig>,
}

impl<P: AiProvider> CodeFixService<P> {
    pub fn new(provider: P, system_prompt: String, config: Option<AiConfig>) -> Self {
        Self {
            ai: AiService::new(provider),
            system_prompt,
            config,
        }
    }

    pub fn is_available(&self) -> bool {
        self.config.is_some()
    }

    /// Ask the model to fix `code`.
    ///
    /// Model availability is checked again here because the form can be
    /// submitted long after the command started.
    pub async fn fix(&self, code: &str) -> FixOutcome {
        let Some(config) = &self.config else {
            return FixOutcome::NoModel;
        };

        let messages = [AiMessage::user(code)];
        match self.ai.generate(&self.system_prompt, &messages, config).await {
            GenerationOutcome::Generated(text) => FixOutcome::Fixed(text),
            GenerationOutcome::Empty => FixOutcome::Empty,
            GenerationOutcome::Failed(detail) => FixOutcome::Failed(detail),
        }
    }
}
