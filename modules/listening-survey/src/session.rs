//! Explicit per-session state: the current domain, persona batch, backend,
//! response batch and cost ledger.

use std::fmt;
use std::sync::Arc;

use listening_common::{Domain, ListeningError, Persona, Result, SurveyResponse};
use rand::seq::IndexedRandom;
use rand::Rng;
use tokio_util::sync::CancellationToken;
use tracing::info;
use uuid::Uuid;

use crate::backend::{build_backend, BackendConfig, ResponseBackend};
use crate::charts::{self, PersonaChart};
use crate::export::{self, ExportRecord};
use crate::insight;
use crate::ledger::{CostLedger, CostSummary};
use crate::orchestrator::{self, RunSummary};
use crate::sampler::PersonaSampler;
use crate::summary::PersonaSummary;

pub const DEFAULT_SAMPLE_SIZE: usize = 5;

/// A response picked for display, with its persona described in one line.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledResponse {
    pub persona_id: u32,
    pub description: String,
    pub response: String,
    pub success: bool,
}

impl fmt::Display for SampledResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.description, self.response)
    }
}

pub struct SurveySession {
    id: Uuid,
    domain: Domain,
    personas: Vec<Persona>,
    responses: Vec<SurveyResponse>,
    backend: Option<Arc<dyn ResponseBackend>>,
    ledger: CostLedger,
    last_run: Option<RunSummary>,
}

impl SurveySession {
    pub fn new(domain: Domain) -> Self {
        Self {
            id: Uuid::new_v4(),
            domain,
            personas: Vec::new(),
            responses: Vec::new(),
            backend: None,
            ledger: CostLedger::new(),
            last_run: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn personas(&self) -> &[Persona] {
        &self.personas
    }

    pub fn responses(&self) -> &[SurveyResponse] {
        &self.responses
    }

    pub fn ledger(&self) -> &CostLedger {
        &self.ledger
    }

    pub fn cost_summary(&self) -> CostSummary {
        self.ledger.summary()
    }

    pub fn last_run(&self) -> Option<&RunSummary> {
        self.last_run.as_ref()
    }

    pub fn backend_id(&self) -> Option<&str> {
        self.backend.as_deref().map(|b| b.id())
    }

    /// Switch domain. Persona and response batches from the old domain are
    /// dropped; the ledger is kept.
    pub fn set_domain(&mut self, domain: Domain) {
        if domain != self.domain {
            info!(session = %self.id, from = %self.domain, to = %domain, "Domain changed");
        }
        self.domain = domain;
        self.personas.clear();
        self.responses.clear();
        self.last_run = None;
    }

    /// Build and install the backend described by `config`. On error the
    /// previous backend stays in place.
    pub fn configure_backend(&mut self, config: &BackendConfig) -> Result<()> {
        let backend = build_backend(config)?;
        if config.domain != self.domain {
            self.set_domain(config.domain);
        }
        self.backend = Some(backend);
        Ok(())
    }

    pub fn set_backend(&mut self, backend: Arc<dyn ResponseBackend>) {
        self.backend = Some(backend);
    }

    /// Replace the persona batch with `count` fresh personas.
    pub fn generate_personas(&mut self, count: usize) -> Result<PersonaSummary> {
        self.generate_personas_with(count, &mut rand::rng())
    }

    pub fn generate_personas_with<R: Rng + ?Sized>(
        &mut self,
        count: usize,
        rng: &mut R,
    ) -> Result<PersonaSummary> {
        let personas = PersonaSampler::new(self.domain).generate_with(count, rng)?;
        self.personas = personas;
        Ok(self.persona_summary())
    }

    pub fn persona_summary(&self) -> PersonaSummary {
        PersonaSummary::from_personas(self.domain, &self.personas)
    }

    /// Survey the current batch. The new responses replace the previous batch
    /// (also when the run is cancelled part way).
    pub async fn run_survey(
        &mut self,
        question: &str,
        cancel: &CancellationToken,
    ) -> Result<RunSummary> {
        if self.personas.is_empty() {
            return Err(ListeningError::EmptyBatch);
        }
        let backend = self.backend.clone().ok_or_else(|| {
            ListeningError::NotConfigured("configure a response backend first".to_string())
        })?;

        let run = orchestrator::run_survey(
            &self.personas,
            question,
            backend.as_ref(),
            &mut self.ledger,
            cancel,
        )
        .await?;

        self.responses = run.responses;
        self.last_run = Some(run.summary.clone());
        Ok(run.summary)
    }

    /// Model-written analysis of the latest responses.
    pub async fn generate_insights(&self) -> Result<String> {
        let backend = self.backend.as_deref().ok_or_else(|| {
            ListeningError::NotConfigured("configure a response backend first".to_string())
        })?;
        let question = self.last_run.as_ref().map(|r| r.question.as_str()).ok_or_else(|| {
            ListeningError::NotConfigured("run a survey before generating insights".to_string())
        })?;
        insight::summarize(&self.responses, question, backend).await
    }

    /// Up to `n` responses chosen uniformly without replacement.
    pub fn sample_responses(&self, n: usize) -> Vec<SampledResponse> {
        self.sample_responses_with(n, &mut rand::rng())
    }

    pub fn sample_responses_with<R: Rng + ?Sized>(
        &self,
        n: usize,
        rng: &mut R,
    ) -> Vec<SampledResponse> {
        self.responses
            .choose_multiple(rng, n)
            .map(|r| SampledResponse {
                persona_id: r.persona_id,
                description: r.persona.short_description(),
                response: r.response.clone(),
                success: r.success,
            })
            .collect()
    }

    pub fn persona_records(&self) -> Vec<ExportRecord> {
        self.personas.iter().map(export::persona_record).collect()
    }

    pub fn response_records(&self) -> Vec<ExportRecord> {
        self.responses.iter().map(export::response_record).collect()
    }

    pub fn persona_chart(&self) -> PersonaChart {
        match self.domain {
            Domain::Humans => PersonaChart::Ages(charts::age_series(&self.personas)),
            Domain::Animals => PersonaChart::Species(charts::species_counts(&self.personas)),
        }
    }

    pub fn response_lengths(&self) -> Vec<usize> {
        charts::response_lengths(&self.responses)
    }
}
