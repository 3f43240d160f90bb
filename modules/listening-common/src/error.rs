use thiserror::Error;

/// Prefix for every failure message shown to a collaborator.
pub const FAILURE_MARKER: &str = "[FAILED]";

pub type Result<T> = std::result::Result<T, ListeningError>;

#[derive(Error, Debug)]
pub enum ListeningError {
    /// Missing credential, unknown provider or unknown domain tag.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A survey or insight was requested before its inputs exist.
    #[error("Not configured: {0}")]
    NotConfigured(String),

    #[error("Persona batch is empty; generate personas first")]
    EmptyBatch,

    #[error("Export error: {0}")]
    Export(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl ListeningError {
    /// Render as the message a collaborator displays, with the failure marker.
    pub fn user_message(&self) -> String {
        format!("{FAILURE_MARKER} {self}")
    }
}
