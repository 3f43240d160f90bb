use anyhow::Result;
use tracing::debug;

use super::types::*;
use crate::util::read_json;

const OLLAMA_API_URL: &str = "http://localhost:11434";

pub(crate) struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
}

impl OllamaClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: OLLAMA_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        debug!(model = %request.model, base_url = %self.base_url, "Ollama chat request");

        let response = self
            .http
            .post(format!("{}/api/chat", self.base_url))
            .json(request)
            .send()
            .await?;

        read_json(response, "Ollama").await
    }
}
