pub mod config;
pub mod error;
pub mod types;

pub use config::{BackendKind, Config};
pub use error::{ListeningError, Result, FAILURE_MARKER};
pub use types::*;
