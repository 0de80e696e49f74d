use super::models::{AiConfig, AiMessage, GenerationOutcome};
use async_trait::async_trait;
use std::error::Error;

#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Sends a completion request to the AI provider.
    ///
    /// Returns `Ok(None)` when the provider answered but produced no text.
    async fn chat_complete(
        &self,
        system_prompt: &str,
        messages: &[AiMessage],
        config: &AiConfig,
    ) -> Result<Option<String>, Box<dyn Error + Send + Sync>>;
}

pub struct AiService<P: AiProvider> {
    provider: P,
}

impl<P: AiProvider> AiService<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    #[cfg(test)]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Single attempt, no retries. Errors are folded into
    /// `GenerationOutcome::Failed` so callers match on one enum.
    pub async fn generate(
        &self,
        system_prompt: &str,
        messages: &[AiMessage],
        config: &AiConfig,
    ) -> GenerationOutcome {
        match self
            .provider
            .chat_complete(system_prompt, messages, config)
            .await
        {
            Ok(Some(text)) if !text.trim().is_empty() => GenerationOutcome::Generated(text),
            Ok(_) => GenerationOutcome::Empty,
            Err(e) => GenerationOutcome::Failed(e.to_string()),
        }
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    /// Provider returning a canned reply and recording what it was sent.
    pub struct MockProvider {
        pub reply: Result<Option<String>, String>,
        pub calls: Mutex<Vec<(String, Vec<AiMessage>, AiConfig)>>,
    }

    impl MockProvider {
        pub fn replying(reply: Result<Option<String>, String>) -> Self {
            Self {
                reply,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl AiProvider for MockProvider {
        async fn chat_complete(
            &self,
            system_prompt: &str,
            messages: &[AiMessage],
            config: &AiConfig,
        ) -> Result<Option<String>, Box<dyn Error + Send + Sync>> {
            self.calls.lock().unwrap().push((
                system_prompt.to_string(),
                messages.to_vec(),
                config.clone(),
            ));
            self.reply.clone().map_err(|e| e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockProvider;
    use super::*;

    fn config() -> AiConfig {
        AiConfig {
            model: "claude-test".to_string(),
            max_tokens: 256,
            temperature: 0.0,
            top_p: 1.0,
        }
    }

    #[tokio::test]
    async fn test_generated_text_is_passed_through() {
        let service = AiService::new(MockProvider::replying(Ok(Some("fixed".to_string()))));
        let outcome = service
            .generate("sys", &[AiMessage::user("code")], &config())
            .await;
        assert_eq!(outcome, GenerationOutcome::Generated("fixed".to_string()));
    }

    #[tokio::test]
    async fn test_missing_or_blank_text_is_empty() {
        let service = AiService::new(MockProvider::replying(Ok(None)));
        assert_eq!(
            service.generate("sys", &[], &config()).await,
            GenerationOutcome::Empty
        );

        let service = AiService::new(MockProvider::replying(Ok(Some("  \n".to_string()))));
        assert_eq!(
            service.generate("sys", &[], &config()).await,
            GenerationOutcome::Empty
        );
    }

    #[tokio::test]
    async fn test_provider_error_is_failed() {
        let service = AiService::new(MockProvider::replying(Err("HTTP 529".to_string())));
        assert_eq!(
            service.generate("sys", &[], &config()).await,
            GenerationOutcome::Failed("HTTP 529".to_string())
        );
    }
}
