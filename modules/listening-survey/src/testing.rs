//! Fixtures shared by unit and integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use ai_client::{ChatModel, ChatPrompt, Completion, Provider, TokenUsage};
use async_trait::async_trait;
use chrono::Utc;
use listening_common::{AnimalPersona, HumanPersona, Persona, SurveyResponse};

/// Chat model that returns a fixed reply and records every prompt.
pub struct ScriptedModel {
    provider: Provider,
    model: String,
    reply: String,
    usage: Option<TokenUsage>,
    cost_usd: Option<f64>,
    failing: Vec<usize>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<ChatPrompt>>,
}

impl ScriptedModel {
    pub fn new(provider: Provider, reply: impl Into<String>) -> Self {
        Self {
            provider,
            model: provider.default_model().to_string(),
            reply: reply.into(),
            usage: None,
            cost_usd: None,
            failing: Vec::new(),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = Some(usage);
        self
    }

    pub fn with_cost(mut self, cost_usd: f64) -> Self {
        self.cost_usd = Some(cost_usd);
        self
    }

    /// Fail the call with this zero-based index.
    pub fn failing_on(mut self, call: usize) -> Self {
        self.failing.push(call);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<ChatPrompt> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    fn provider(&self) -> Provider {
        self.provider
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &ChatPrompt) -> anyhow::Result<Completion> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.clone());

        if self.failing.contains(&call) {
            anyhow::bail!("{} API error (500 Internal Server Error): scripted failure on call {call}", self.provider);
        }

        let mut completion = Completion::text(self.reply.clone());
        if let Some(usage) = self.usage {
            completion = completion.with_usage(usage);
        }
        if let Some(cost) = self.cost_usd {
            completion = completion.with_cost(cost);
        }
        Ok(completion)
    }
}

pub fn human(id: u32, age: u32) -> Persona {
    Persona::Human(HumanPersona {
        id,
        age,
        gender: "female".into(),
        country: "Japan".into(),
        occupation: "Services".into(),
        education: "Secondary education".into(),
        income_level: "$15,000-30,000".into(),
        family_status: "Married".into(),
        language: "Japanese".into(),
        urban_rural: "urban".into(),
        continent: "Asia".into(),
    })
}

pub fn animal(id: u32, diet: &str) -> Persona {
    Persona::Animal(AnimalPersona {
        id,
        species: "Red fox".into(),
        habitat: "Temperate forest".into(),
        size_category: "Medium".into(),
        diet_type: diet.into(),
        activity_pattern: "Nocturnal".into(),
        social_structure: "Solitary".into(),
        lifespan_category: "Medium-lived".into(),
        conservation_status: "Least Concern".into(),
        continent: "Europe".into(),
    })
}

/// A successful response record for `persona`.
pub fn response_for(persona: Persona, question: &str, text: &str) -> SurveyResponse {
    SurveyResponse {
        persona_id: persona.id(),
        persona,
        question: question.to_string(),
        response: text.to_string(),
        success: true,
        cost_usd: 0.0,
        tokens_used: 0,
        backend_id: "simulation".to_string(),
        error: None,
        created_at: Utc::now(),
    }
}
