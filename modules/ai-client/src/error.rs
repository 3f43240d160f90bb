use thiserror::Error;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Missing API key for provider {0}")]
    MissingApiKey(String),
}
