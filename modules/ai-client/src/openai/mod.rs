mod client;
pub mod pricing;
pub(crate) mod types;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::provider::Provider;
use crate::traits::{ChatModel, ChatPrompt, Completion, TokenUsage};

use client::OpenAiClient;

// =============================================================================
// OpenAi Agent
// =============================================================================

#[derive(Clone)]
pub struct OpenAi {
    api_key: String,
    pub(crate) model: String,
    base_url: Option<String>,
}

impl OpenAi {
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

    pub(crate) fn client(&self) -> OpenAiClient {
        let client = OpenAiClient::new(&self.api_key);
        if let Some(ref url) = self.base_url {
            client.with_base_url(url)
        } else {
            client
        }
    }

    fn request(&self, prompt: &ChatPrompt) -> types::ChatRequest {
        let mut request = types::ChatRequest::new(&self.model);
        if let Some(ref preamble) = prompt.preamble {
            request = request.message(types::WireMessage::system(preamble));
        }
        request = request.message(types::WireMessage::user(&prompt.input));

        // Reasoning models reject both temperature and max_tokens.
        if types::uses_max_completion_tokens(&self.model) {
            if let Some(max) = prompt.max_tokens {
                request = request.max_completion_tokens(max);
            }
        } else {
            if let Some(max) = prompt.max_tokens {
                request = request.max_tokens(max);
            }
            if let Some(t) = prompt.temperature {
                request = request.temperature(t);
            }
        }
        request
    }
}

#[async_trait]
impl ChatModel for OpenAi {
    fn provider(&self) -> Provider {
        Provider::OpenAi
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &ChatPrompt) -> Result<Completion> {
        let response = self.client().chat(&self.request(prompt)).await?;

        let text = response
            .text()
            .ok_or_else(|| anyhow!("No response from OpenAI"))?;

        let mut completion = Completion::text(text);
        if let Some(usage) = response.usage {
            let usage = TokenUsage {
                prompt_tokens: usage.prompt_tokens,
                completion_tokens: usage.completion_tokens,
                total_tokens: usage.total_tokens,
            };
            completion = completion
                .with_cost(pricing::cost_usd(&self.model, &usage))
                .with_usage(usage);
        }
        Ok(completion)
    }
}
