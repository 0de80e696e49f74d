use crate::core::ai::{AiConfig, AiMessage, AiProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::error::Error;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: &'a [AiMessage],
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

pub struct AnthropicClient {
    client: Client,
    api_key: String,
}

impl AnthropicClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
        }
    }

    /// Join the text blocks of a response. `None` when there are none.
    fn extract_text(response: MessagesResponse) -> Option<String> {
        let text = response
            .content
            .into_iter()
            .filter(|block| block.block_type == "text")
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join("");

        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[async_trait]
impl AiProvider for AnthropicClient {
    async fn chat_complete(
        &self,
        system_prompt: &str,
        messages: &[AiMessage],
        config: &AiConfig,
    ) -> Result<Option<String>, Box<dyn Error + Send + Sync>> {
        let payload = MessagesRequest {
            model: &config.model,
            max_tokens: config.max_tokens,
            system: Some(system_prompt).filter(|s| !s.is_empty()),
            messages,
            temperature: config.temperature,
            top_p: config.top_p,
        };

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await?;
            return Err(format!("Anthropic API error: {} - {}", status, text).into());
        }

        let body: MessagesResponse = response.json().await?;
        let text = Self::extract_text(body);

        tracing::debug!(
            "Anthropic response received: {} chars",
            text.as_ref().map(|t| t.len()).unwrap_or(0)
        );

        Ok(text)
    }
}
