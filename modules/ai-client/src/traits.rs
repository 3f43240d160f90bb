use anyhow::Result;
use async_trait::async_trait;

use crate::provider::Provider;

// =============================================================================
// Prompt
// =============================================================================

/// A single-turn chat prompt: optional system preamble plus one user input.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatPrompt {
    pub preamble: Option<String>,
    pub input: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl ChatPrompt {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            preamble: None,
            input: input.into(),
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn preamble(mut self, preamble: impl Into<String>) -> Self {
        self.preamble = Some(preamble.into());
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

// =============================================================================
// Completion
// =============================================================================

/// Token counts as reported by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl TokenUsage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Generated text plus whatever accounting the provider exposed.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    /// `None` when the provider response carried no usage block.
    pub usage: Option<TokenUsage>,
    /// `None` when the provider has no pricing table for the model.
    pub cost_usd: Option<f64>,
}

impl Completion {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            usage: None,
            cost_usd: None,
        }
    }

    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = Some(usage);
        self
    }

    pub fn with_cost(mut self, cost_usd: f64) -> Self {
        self.cost_usd = Some(cost_usd);
        self
    }
}

// =============================================================================
// ChatModel Trait
// =============================================================================

#[async_trait]
pub trait ChatModel: Send + Sync {
    fn provider(&self) -> Provider;

    fn model(&self) -> &str;

    async fn complete(&self, prompt: &ChatPrompt) -> Result<Completion>;
}
