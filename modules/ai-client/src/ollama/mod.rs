mod client;
pub(crate) mod types;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::provider::Provider;
use crate::traits::{ChatModel, ChatPrompt, Completion, TokenUsage};

use client::OllamaClient;
use types::*;

// =============================================================================
// Ollama Agent (local, no credential)
// =============================================================================

#[derive(Clone)]
pub struct Ollama {
    pub(crate) model: String,
    base_url: Option<String>,
}

impl Ollama {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub(crate) fn client(&self) -> OllamaClient {
        let client = OllamaClient::new();
        if let Some(ref url) = self.base_url {
            client.with_base_url(url)
        } else {
            client
        }
    }
}

#[async_trait]
impl ChatModel for Ollama {
    fn provider(&self) -> Provider {
        Provider::Ollama
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &ChatPrompt) -> Result<Completion> {
        let mut messages = Vec::with_capacity(2);
        if let Some(ref preamble) = prompt.preamble {
            messages.push(WireMessage::system(preamble));
        }
        messages.push(WireMessage::user(&prompt.input));

        let request = ChatRequest {
            model: self.model.clone(),
            messages,
            stream: false,
            options: Options {
                temperature: prompt.temperature,
                num_predict: prompt.max_tokens,
            },
        };

        let response = self.client().chat(&request).await?;
        if response.message.content.is_empty() {
            return Err(anyhow!("No response from Ollama"));
        }

        let usage = match (response.prompt_eval_count, response.eval_count) {
            (Some(prompt_tokens), Some(completion_tokens)) => {
                Some(TokenUsage::new(prompt_tokens, completion_tokens))
            }
            _ => None,
        };

        Ok(Completion {
            text: response.message.content,
            usage,
            cost_usd: None,
        })
    }
}
