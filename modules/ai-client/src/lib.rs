pub mod claude;
pub mod error;
pub mod gemini;
pub mod ollama;
pub mod openai;
pub mod provider;
pub mod traits;
pub mod util;

pub use claude::Claude;
pub use error::AiError;
pub use gemini::Gemini;
pub use ollama::Ollama;
pub use openai::OpenAi;
pub use provider::{build_chat_model, Provider};
pub use traits::{ChatModel, ChatPrompt, Completion, TokenUsage};
pub use util::{estimate_tokens, truncate_chars};
