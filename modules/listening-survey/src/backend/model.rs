use std::sync::Arc;

use ai_client::{build_chat_model, estimate_tokens, ChatModel, ChatPrompt, Provider};
use async_trait::async_trait;
use listening_common::{ListeningError, Persona, Result};
use tracing::{debug, warn};

use super::prompt::persona_preamble;
use super::{ResponseBackend, ResponseResult, UsageSource};

const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 150;

/// Language-model backend: role-plays each persona through a chat model.
pub struct ModelBackend {
    chat: Arc<dyn ChatModel>,
    id: String,
}

impl ModelBackend {
    pub fn new(chat: Arc<dyn ChatModel>) -> Self {
        let id = chat.provider().as_str().to_string();
        Self { chat, id }
    }

    pub fn from_provider(
        provider: Provider,
        api_key: Option<&str>,
        model: Option<&str>,
        base_url: Option<&str>,
    ) -> Result<Self> {
        let chat = build_chat_model(provider, api_key, model, base_url)
            .map_err(|e| ListeningError::Configuration(e.to_string()))?;
        Ok(Self::new(chat))
    }

    pub fn model(&self) -> &str {
        self.chat.model()
    }
}

#[async_trait]
impl ResponseBackend for ModelBackend {
    fn id(&self) -> &str {
        &self.id
    }

    async fn respond(&self, persona: &Persona, question: &str) -> ResponseResult {
        let prompt = ChatPrompt::new(question)
            .preamble(persona_preamble(persona))
            .temperature(TEMPERATURE)
            .max_tokens(MAX_TOKENS);

        match self.chat.complete(&prompt).await {
            Ok(completion) => {
                let cost = completion.cost_usd.unwrap_or(0.0);
                let (tokens, source) = match completion.usage {
                    Some(usage) => (usage.total_tokens, UsageSource::Reported),
                    None => (
                        estimate_tokens(question) + estimate_tokens(&completion.text),
                        UsageSource::Estimated,
                    ),
                };
                debug!(
                    backend = %self.id,
                    persona_id = persona.id(),
                    tokens,
                    cost_usd = cost,
                    "Model response"
                );
                ResponseResult::succeeded(&self.id, completion.text, cost, tokens, source)
            }
            Err(e) => {
                warn!(backend = %self.id, persona_id = persona.id(), error = %e, "Model call failed");
                ResponseResult::failed(&self.id, e.to_string())
            }
        }
    }

    fn chat_model(&self) -> Option<Arc<dyn ChatModel>> {
        Some(self.chat.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{human, ScriptedModel};
    use ai_client::TokenUsage;

    #[tokio::test]
    async fn test_reported_usage_is_used() {
        let model = ScriptedModel::new(Provider::OpenAi, "Sounds good.")
            .with_usage(TokenUsage::new(40, 12))
            .with_cost(0.0002);
        let backend = ModelBackend::new(Arc::new(model));

        let result = backend.respond(&human(1, 30), "Do you recycle?").await;
        assert!(result.success);
        assert_eq!(result.tokens, 52);
        assert_eq!(result.cost_usd, 0.0002);
        assert_eq!(result.usage_source, UsageSource::Reported);
        assert_eq!(result.backend_id, "openai");
    }

    #[tokio::test]
    async fn test_missing_usage_is_estimated() {
        let model = ScriptedModel::new(Provider::Ollama, "abcdefghi");
        let backend = ModelBackend::new(Arc::new(model));

        let result = backend.respond(&human(1, 30), "123456").await;
        assert_eq!(result.tokens, 2 + 3);
        assert_eq!(result.cost_usd, 0.0);
        assert_eq!(result.usage_source, UsageSource::Estimated);
    }

    #[tokio::test]
    async fn test_prompt_carries_persona_and_settings() {
        let model = Arc::new(ScriptedModel::new(Provider::Anthropic, "ok"));
        let backend = ModelBackend::new(model.clone());
        backend.respond(&human(4, 52), "What worries you?").await;

        let prompts = model.prompts();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].input, "What worries you?");
        assert_eq!(prompts[0].temperature, Some(TEMPERATURE));
        assert_eq!(prompts[0].max_tokens, Some(MAX_TOKENS));
        assert!(prompts[0]
            .preamble
            .as_deref()
            .is_some_and(|p| p.contains("52-year-old")));
    }

    #[tokio::test]
    async fn test_failure_becomes_data() {
        let model = ScriptedModel::new(Provider::OpenAi, "never").failing_on(0);
        let backend = ModelBackend::new(Arc::new(model));

        let result = backend.respond(&human(1, 30), "Q").await;
        assert!(!result.success);
        assert!(result.text.starts_with("Error: "));
        assert_eq!(result.cost_usd, 0.0);
        assert_eq!(result.tokens, 0);
        assert!(result.error.is_some());
    }
}
