use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ListeningError, Result};
use crate::types::Domain;

/// Which response backend a session drives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Simulation,
    Model,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Simulation => "simulation",
            BackendKind::Model => "model",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = ListeningError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simulation" | "sim" => Ok(BackendKind::Simulation),
            "model" | "llm" => Ok(BackendKind::Model),
            other => Err(ListeningError::Configuration(format!(
                "unknown backend kind '{other}' (expected 'model' or 'simulation')"
            ))),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Credentials are optional here; the backend decides which ones it needs.
#[derive(Debug, Clone)]
pub struct Config {
    pub domain: Domain,
    pub backend: BackendKind,
    pub provider: String,
    pub model: Option<String>,

    // AI providers
    pub openai_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub google_api_key: Option<String>,
    pub ollama_base_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            domain: Domain::default(),
            backend: BackendKind::default(),
            provider: "openai".to_string(),
            model: None,
            openai_api_key: None,
            anthropic_api_key: None,
            google_api_key: None,
            ollama_base_url: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let config = Self::from_vars(|key| std::env::var(key).ok())?;
        config.log_keys();
        Ok(config)
    }

    /// Build from a variable lookup. Blank values count as unset.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            domain: var("LISTENING_DOMAIN")
                .map(|v| v.parse::<Domain>())
                .transpose()?
                .unwrap_or_default(),
            backend: var("LISTENING_BACKEND")
                .map(|v| v.parse::<BackendKind>())
                .transpose()?
                .unwrap_or_default(),
            provider: var("LISTENING_PROVIDER").unwrap_or_else(|| "openai".to_string()),
            model: var("LISTENING_MODEL"),
            openai_api_key: var("OPENAI_API_KEY"),
            anthropic_api_key: var("ANTHROPIC_API_KEY"),
            google_api_key: var("GOOGLE_API_KEY"),
            ollama_base_url: var("OLLAMA_BASE_URL"),
        })
    }

    /// The credential configured for `provider`, if any.
    pub fn api_key_for(&self, provider: &str) -> Option<&str> {
        match provider.trim().to_ascii_lowercase().as_str() {
            "openai" => self.openai_api_key.as_deref(),
            "anthropic" | "claude" => self.anthropic_api_key.as_deref(),
            "google" | "gemini" => self.google_api_key.as_deref(),
            _ => None,
        }
    }

    pub fn log_keys(&self) {
        fn preview_opt(val: &Option<String>) -> String {
            match val {
                Some(v) if !v.is_empty() => {
                    let head: String = v.chars().take(5).collect();
                    format!("{}...({} chars)", head, v.chars().count())
                }
                _ => "<not set>".to_string(),
            }
        }

        tracing::info!("Config loaded:");
        tracing::info!("  LISTENING_DOMAIN: {}", self.domain);
        tracing::info!("  LISTENING_BACKEND: {}", self.backend);
        tracing::info!("  LISTENING_PROVIDER: {}", self.provider);
        tracing::info!("  OPENAI_API_KEY: {}", preview_opt(&self.openai_api_key));
        tracing::info!("  ANTHROPIC_API_KEY: {}", preview_opt(&self.anthropic_api_key));
        tracing::info!("  GOOGLE_API_KEY: {}", preview_opt(&self.google_api_key));
        tracing::info!("  OLLAMA_BASE_URL: {}", preview_opt(&self.ollama_base_url));
    }
}
