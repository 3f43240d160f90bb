mod client;
pub(crate) mod types;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::provider::Provider;
use crate::traits::{ChatModel, ChatPrompt, Completion};

use client::GeminiClient;
use types::*;

// =============================================================================
// Gemini Agent
// =============================================================================

#[derive(Clone)]
pub struct Gemini {
    api_key: String,
    pub(crate) model: String,
    base_url: Option<String>,
}

impl Gemini {
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

    pub(crate) fn client(&self) -> GeminiClient {
        let client = GeminiClient::new(&self.api_key);
        if let Some(ref url) = self.base_url {
            client.with_base_url(url)
        } else {
            client
        }
    }
}

#[async_trait]
impl ChatModel for Gemini {
    fn provider(&self) -> Provider {
        Provider::Google
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &ChatPrompt) -> Result<Completion> {
        let request = GenerateRequest {
            system_instruction: prompt.preamble.as_deref().map(Content::instruction),
            contents: vec![Content::user(&prompt.input)],
            generation_config: GenerationConfig {
                temperature: prompt.temperature,
                max_output_tokens: prompt.max_tokens,
            },
        };

        let response = self.client().generate(&self.model, &request).await?;

        let text = response
            .text()
            .ok_or_else(|| anyhow!("No response from Gemini"))?;

        let mut completion = Completion::text(text);
        let usage = response
            .usage_metadata
            .as_ref()
            .and_then(UsageMetadata::token_usage);
        if let Some(usage) = usage {
            completion = completion.with_usage(usage);
        }
        Ok(completion)
    }
}
