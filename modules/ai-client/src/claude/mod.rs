mod client;
pub(crate) mod types;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::provider::Provider;
use crate::traits::{ChatModel, ChatPrompt, Completion, TokenUsage};

use client::ClaudeClient;
use types::*;

// =============================================================================
// Claude Agent
// =============================================================================

#[derive(Clone)]
pub struct Claude {
    api_key: String,
    pub(crate) model: String,
    base_url: Option<String>,
}

impl Claude {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub(crate) fn client(&self) -> ClaudeClient {
        let client = ClaudeClient::new(&self.api_key);
        if let Some(ref url) = self.base_url {
            client.with_base_url(url)
        } else {
            client
        }
    }
}

#[async_trait]
impl ChatModel for Claude {
    fn provider(&self) -> Provider {
        Provider::Anthropic
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &ChatPrompt) -> Result<Completion> {
        let mut request = ChatRequest::new(&self.model).message(WireMessage::user(&prompt.input));
        if let Some(ref preamble) = prompt.preamble {
            request = request.system(preamble);
        }
        if let Some(max) = prompt.max_tokens {
            request = request.max_tokens(max);
        }
        if let Some(t) = prompt.temperature {
            request = request.temperature(t);
        }

        let response = self.client().chat(&request).await?;

        let text = response
            .text()
            .ok_or_else(|| anyhow!("No response from Claude"))?;

        let mut completion = Completion::text(text);
        if let Some(usage) = response.usage {
            completion = completion.with_usage(TokenUsage::new(usage.input_tokens, usage.output_tokens));
        }
        Ok(completion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_claude_new() {
        let ai = Claude::new("sk-ant-test", "claude-3-haiku-20240307");
        assert_eq!(ai.model, "claude-3-haiku-20240307");
        assert_eq!(ai.api_key, "sk-ant-test");
    }

    #[test]
    fn test_claude_with_base_url() {
        let ai = Claude::new("sk-ant-test", "claude-3-haiku-20240307")
            .with_base_url("https://custom.api.com");
        assert_eq!(ai.base_url, Some("https://custom.api.com".to_string()));
    }

    #[tokio::test]
    async fn test_complete_sends_system_and_reads_usage() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/messages"))
            .and(header("x-api-key", "sk-ant-test"))
            .and(body_partial_json(serde_json::json!({
                "system": "You are a wolf.",
                "max_tokens": 150,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "content": [{"type": "text", "text": "The pack moves at dusk."}],
                "stop_reason": "end_turn",
                "usage": {"input_tokens": 40, "output_tokens": 12}
            })))
            .mount(&server)
            .await;

        let ai = Claude::new("sk-ant-test", "claude-3-haiku-20240307").with_base_url(server.uri());
        let prompt = ChatPrompt::new("Where do you hunt?")
            .preamble("You are a wolf.")
            .max_tokens(150);
        let completion = ai.complete(&prompt).await.unwrap();

        assert_eq!(completion.text, "The pack moves at dusk.");
        assert_eq!(completion.usage, Some(TokenUsage::new(40, 12)));
        assert_eq!(completion.cost_usd, None);
    }
}
