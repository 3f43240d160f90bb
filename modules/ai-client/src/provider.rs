use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::AiError;
use crate::traits::ChatModel;
use crate::{Claude, Gemini, Ollama, OpenAi};

/// Supported chat providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAi,
    Anthropic,
    Google,
    Ollama,
}

impl Provider {
    pub const ALL: [Provider; 4] = [
        Provider::OpenAi,
        Provider::Anthropic,
        Provider::Google,
        Provider::Ollama,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Anthropic => "anthropic",
            Provider::Google => "google",
            Provider::Ollama => "ollama",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::OpenAi => "gpt-4o-mini",
            Provider::Anthropic => "claude-3-haiku-20240307",
            Provider::Google => "gemini-pro",
            Provider::Ollama => "llama2",
        }
    }

    /// Ollama runs locally and needs no credential.
    pub fn requires_api_key(&self) -> bool {
        !matches!(self, Provider::Ollama)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = AiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAi),
            "anthropic" | "claude" => Ok(Provider::Anthropic),
            "google" | "gemini" => Ok(Provider::Google),
            "ollama" => Ok(Provider::Ollama),
            other => Err(AiError::UnknownProvider(other.to_string())),
        }
    }
}

/// Construct a chat model for `provider`.
///
/// A blank or missing `api_key` is rejected for every provider that needs one.
/// `model` falls back to the provider default; `base_url` overrides the API root.
pub fn build_chat_model(
    provider: Provider,
    api_key: Option<&str>,
    model: Option<&str>,
    base_url: Option<&str>,
) -> Result<Arc<dyn ChatModel>, AiError> {
    let model = model
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(provider.default_model());
    let api_key = api_key.map(str::trim).filter(|k| !k.is_empty());

    if provider.requires_api_key() && api_key.is_none() {
        return Err(AiError::MissingApiKey(provider.to_string()));
    }
    let api_key = api_key.unwrap_or_default();

    let chat: Arc<dyn ChatModel> = match provider {
        Provider::OpenAi => {
            let ai = OpenAi::new(api_key, model);
            Arc::new(match base_url {
                Some(url) => ai.with_base_url(url),
                None => ai,
            })
        }
        Provider::Anthropic => {
            let ai = Claude::new(api_key, model);
            Arc::new(match base_url {
                Some(url) => ai.with_base_url(url),
                None => ai,
            })
        }
        Provider::Google => {
            let ai = Gemini::new(api_key, model);
            Arc::new(match base_url {
                Some(url) => ai.with_base_url(url),
                None => ai,
            })
        }
        Provider::Ollama => {
            let ai = Ollama::new(model);
            Arc::new(match base_url {
                Some(url) => ai.with_base_url(url),
                None => ai,
            })
        }
    };

    Ok(chat)
}
