//! Response backends: one capability (`respond`) with a language-model
//! variant and a scripted simulation variant.

mod model;
pub mod prompt;
mod simulation;

pub use model::ModelBackend;
pub use simulation::{Segment, SimulationBackend, SIMULATION_BACKEND_ID};

use std::sync::Arc;

use ai_client::{truncate_chars, ChatModel, Provider};
use async_trait::async_trait;
use listening_common::{BackendKind, Config, Domain, ListeningError, Persona, Result};
use serde::Serialize;
use tracing::info;

/// Maximum characters of an error message embedded in a failed response.
pub const ERROR_PREVIEW_CHARS: usize = 50;

/// Where a result's token count came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UsageSource {
    /// Counted by the provider.
    Reported,
    /// Character-based approximation; not billing-accurate.
    Estimated,
    /// No model call was billed.
    Free,
}

/// Outcome of one backend call. Never an `Err`: failures are data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseResult {
    pub success: bool,
    pub text: String,
    pub cost_usd: f64,
    pub tokens: u32,
    pub usage_source: UsageSource,
    pub backend_id: String,
    pub error: Option<String>,
}

impl ResponseResult {
    pub fn succeeded(
        backend_id: impl Into<String>,
        text: impl Into<String>,
        cost_usd: f64,
        tokens: u32,
        usage_source: UsageSource,
    ) -> Self {
        Self {
            success: true,
            text: text.into(),
            cost_usd: cost_usd.max(0.0),
            tokens,
            usage_source,
            backend_id: backend_id.into(),
            error: None,
        }
    }

    /// Failed call: zero cost and tokens, the visible text carries a short
    /// prefix of the error and `error` keeps the whole message.
    pub fn failed(backend_id: impl Into<String>, error: impl Into<String>) -> Self {
        let error = error.into();
        Self {
            success: false,
            text: format!("Error: {}...", truncate_chars(&error, ERROR_PREVIEW_CHARS)),
            cost_usd: 0.0,
            tokens: 0,
            usage_source: UsageSource::Free,
            backend_id: backend_id.into(),
            error: Some(error),
        }
    }
}

#[async_trait]
pub trait ResponseBackend: Send + Sync {
    /// Identifier used for ledger attribution and exports.
    fn id(&self) -> &str;

    /// Produce one in-character answer. Ordinary failures come back as
    /// `success = false`, never as a panic or error.
    async fn respond(&self, persona: &Persona, question: &str) -> ResponseResult;

    /// The underlying language model, for backends that have one.
    fn chat_model(&self) -> Option<Arc<dyn ChatModel>> {
        None
    }
}

/// Backend selection as supplied by the caller.
#[derive(Debug, Clone, Default)]
pub struct BackendConfig {
    pub domain: Domain,
    pub kind: BackendKind,
    pub provider: Option<String>,
    pub endpoint_credential: Option<String>,
    pub model_identifier: Option<String>,
    pub base_url: Option<String>,
}

impl BackendConfig {
    pub fn simulation(domain: Domain) -> Self {
        Self {
            domain,
            kind: BackendKind::Simulation,
            ..Self::default()
        }
    }

    pub fn model(domain: Domain, provider: impl Into<String>, credential: Option<String>) -> Self {
        Self {
            domain,
            kind: BackendKind::Model,
            provider: Some(provider.into()),
            endpoint_credential: credential,
            ..Self::default()
        }
    }

    pub fn with_model_identifier(mut self, model: impl Into<String>) -> Self {
        self.model_identifier = Some(model.into());
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Pick the credential for the configured provider out of the env config.
    pub fn from_config(config: &Config) -> Self {
        let base_url = match config.provider.trim().to_ascii_lowercase().as_str() {
            "ollama" => config.ollama_base_url.clone(),
            _ => None,
        };
        Self {
            domain: config.domain,
            kind: config.backend,
            provider: Some(config.provider.clone()),
            endpoint_credential: config.api_key_for(&config.provider).map(str::to_string),
            model_identifier: config.model.clone(),
            base_url,
        }
    }
}

/// Construct the backend described by `config`.
pub fn build_backend(config: &BackendConfig) -> Result<Arc<dyn ResponseBackend>> {
    let backend: Arc<dyn ResponseBackend> = match config.kind {
        BackendKind::Simulation => Arc::new(SimulationBackend::new()),
        BackendKind::Model => {
            let tag = config.provider.as_deref().ok_or_else(|| {
                ListeningError::Configuration("model backend requires a provider".to_string())
            })?;
            let provider: Provider = tag
                .parse()
                .map_err(|e| ListeningError::Configuration(format!("{e}")))?;
            Arc::new(ModelBackend::from_provider(
                provider,
                config.endpoint_credential.as_deref(),
                config.model_identifier.as_deref(),
                config.base_url.as_deref(),
            )?)
        }
    };

    info!(backend = backend.id(), domain = %config.domain, "Response backend configured");
    Ok(backend)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_result_truncates_error() {
        let long = "x".repeat(200);
        let result = ResponseResult::failed("openai", long.clone());
        assert!(!result.success);
        assert_eq!(result.text, format!("Error: {}...", "x".repeat(50)));
        assert_eq!(result.error.as_deref(), Some(long.as_str()));
        assert_eq!(result.cost_usd, 0.0);
        assert_eq!(result.tokens, 0);
    }

    #[test]
    fn test_build_simulation_backend() {
        let backend = build_backend(&BackendConfig::simulation(Domain::Animals)).unwrap();
        assert_eq!(backend.id(), SIMULATION_BACKEND_ID);
        assert!(backend.chat_model().is_none());
    }

    #[test]
    fn test_model_backend_without_credential_is_rejected() {
        let config = BackendConfig::model(Domain::Humans, "openai", None);
        let err = build_backend(&config).err().unwrap();
        assert!(matches!(err, ListeningError::Configuration(_)));
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        let config = BackendConfig::model(Domain::Humans, "watson", Some("key".into()));
        let err = build_backend(&config).err().unwrap();
        assert!(matches!(err, ListeningError::Configuration(ref m) if m.contains("watson")));
    }

    #[test]
    fn test_ollama_backend_needs_no_credential() {
        let config = BackendConfig::model(Domain::Humans, "ollama", None);
        let backend = build_backend(&config).unwrap();
        assert_eq!(backend.id(), "ollama");
        assert!(backend.chat_model().is_some());
    }

    #[test]
    fn test_from_config_picks_provider_key() {
        let config = Config {
            backend: BackendKind::Model,
            provider: "anthropic".into(),
            anthropic_api_key: Some("sk-ant".into()),
            openai_api_key: Some("sk-openai".into()),
            ..Config::default()
        };
        let backend_config = BackendConfig::from_config(&config);
        assert_eq!(backend_config.endpoint_credential.as_deref(), Some("sk-ant"));
        assert_eq!(backend_config.kind, BackendKind::Model);
        assert!(backend_config.base_url.is_none());
    }

    #[test]
    fn test_from_config_ollama_uses_base_url_and_no_key() {
        let config = Config {
            backend: BackendKind::Model,
            provider: "Ollama".into(),
            model: Some("llama3".into()),
            openai_api_key: Some("sk-openai".into()),
            ollama_base_url: Some("http://gpu-box:11434".into()),
            ..Config::default()
        };
        let backend_config = BackendConfig::from_config(&config);
        assert_eq!(backend_config.base_url.as_deref(), Some("http://gpu-box:11434"));
        assert!(backend_config.endpoint_credential.is_none());
        assert_eq!(backend_config.model_identifier.as_deref(), Some("llama3"));

        let backend = build_backend(&backend_config).unwrap();
        assert_eq!(backend.id(), "ollama");
    }
}
