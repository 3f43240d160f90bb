use ai_client::ChatPrompt;
use listening_common::{ListeningError, Result, SurveyResponse, FAILURE_MARKER};
use tracing::{info, warn};

use crate::backend::prompt::{insight_input, INSIGHT_PREAMBLE};
use crate::backend::ResponseBackend;

const INSIGHT_TEMPERATURE: f32 = 0.7;

/// Ask the backend's language model for an analysis of the first responses.
///
/// Fails with `NotConfigured` when the backend has no model or there are no
/// responses. A failed model call is returned as a marked diagnostic string.
pub async fn summarize(
    responses: &[SurveyResponse],
    question: &str,
    backend: &dyn ResponseBackend,
) -> Result<String> {
    let chat = backend.chat_model().ok_or_else(|| {
        ListeningError::NotConfigured(format!(
            "insight generation needs a language-model backend, '{}' has none",
            backend.id()
        ))
    })?;
    if responses.is_empty() {
        return Err(ListeningError::NotConfigured(
            "run a survey before generating insights".to_string(),
        ));
    }

    let prompt = ChatPrompt::new(insight_input(responses, question))
        .preamble(INSIGHT_PREAMBLE)
        .temperature(INSIGHT_TEMPERATURE);

    match chat.complete(&prompt).await {
        Ok(completion) => {
            info!(backend = backend.id(), chars = completion.text.len(), "Insights generated");
            Ok(completion.text)
        }
        Err(e) => {
            warn!(backend = backend.id(), error = %e, "Insight generation failed");
            Ok(format!("{FAILURE_MARKER} insight generation error: {e}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{ModelBackend, SimulationBackend};
    use crate::testing::{human, response_for, ScriptedModel};
    use ai_client::Provider;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_simulation_backend_cannot_summarize() {
        let responses = vec![response_for(human(1, 30), "Q", "A")];
        let err = summarize(&responses, "Q", &SimulationBackend::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ListeningError::NotConfigured(_)));
    }

    #[tokio::test]
    async fn test_returns_model_text_verbatim() {
        let model = Arc::new(ScriptedModel::new(Provider::OpenAi, "Most respondents worry."));
        let backend = ModelBackend::new(model.clone());
        let responses: Vec<_> = (1..=12)
            .map(|id| response_for(human(id, 40), "Q", "A"))
            .collect();

        let text = summarize(&responses, "Q", &backend).await.unwrap();
        assert_eq!(text, "Most respondents worry.");
        let prompt = &model.prompts()[0];
        assert_eq!(prompt.preamble.as_deref(), Some(INSIGHT_PREAMBLE));
        assert_eq!(prompt.input.matches("40-year-old").count(), 10);
    }

    #[tokio::test]
    async fn test_model_failure_is_a_diagnostic_string() {
        let model = ScriptedModel::new(Provider::OpenAi, "unused").failing_on(0);
        let backend = ModelBackend::new(Arc::new(model));
        let responses = vec![response_for(human(1, 30), "Q", "A")];

        let text = summarize(&responses, "Q", &backend).await.unwrap();
        assert!(text.starts_with(FAILURE_MARKER));
    }

    #[tokio::test]
    async fn test_no_responses_is_not_configured() {
        let backend = ModelBackend::new(Arc::new(ScriptedModel::new(Provider::OpenAi, "x")));
        let err = summarize(&[], "Q", &backend).await.unwrap_err();
        assert!(matches!(err, ListeningError::NotConfigured(_)));
    }
}
