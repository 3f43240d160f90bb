//! Sequential survey loop: one backend call per persona, in input order.

use std::fmt;

use chrono::{DateTime, Utc};
use listening_common::{ListeningError, Persona, Result, SurveyResponse};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

use crate::backend::ResponseBackend;
use crate::ledger::{CostLedger, USD_TO_JPY};

/// Aggregate view of one survey run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub question: String,
    /// Personas in the batch.
    pub requested: usize,
    /// Responses actually collected; less than `requested` only when cancelled.
    pub total: usize,
    pub successful: usize,
    /// `successful / total`, `0.0` for an empty run.
    pub success_rate: f64,
    pub total_cost_usd: f64,
    pub total_cost_jpy: f64,
    pub total_tokens: u64,
    pub backend_id: String,
    pub cancelled: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunSummary {
    pub fn failed(&self) -> usize {
        self.total - self.successful
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n=== Survey Run Complete ===")?;
        writeln!(f, "Question:     {}", self.question)?;
        writeln!(f, "Backend:      {}", self.backend_id)?;
        writeln!(f, "Responses:    {} / {}", self.total, self.requested)?;
        writeln!(
            f,
            "Successful:   {} ({:.1}%)",
            self.successful,
            self.success_rate * 100.0
        )?;
        writeln!(
            f,
            "Cost:         ${:.6} (~{:.2} JPY)",
            self.total_cost_usd, self.total_cost_jpy
        )?;
        writeln!(f, "Tokens:       {}", self.total_tokens)?;
        if self.cancelled {
            writeln!(f, "Run was cancelled; responses are partial.")?;
        }
        Ok(())
    }
}

/// Responses in persona order plus the run summary.
#[derive(Debug, Clone)]
pub struct SurveyRun {
    pub responses: Vec<SurveyResponse>,
    pub summary: RunSummary,
}

/// Ask every persona `question` through `backend`, one at a time.
///
/// Each result is recorded in `ledger` before the next call starts. A failed
/// call yields a `success = false` response and the loop continues. The token
/// is checked between personas; once cancelled the responses gathered so far
/// are returned with `summary.cancelled` set.
pub async fn run_survey(
    personas: &[Persona],
    question: &str,
    backend: &dyn ResponseBackend,
    ledger: &mut CostLedger,
    cancel: &CancellationToken,
) -> Result<SurveyRun> {
    if personas.is_empty() {
        return Err(ListeningError::EmptyBatch);
    }
    let question = question.trim();
    if question.is_empty() {
        return Err(ListeningError::InvalidArgument(
            "question must not be empty".to_string(),
        ));
    }

    let run_id = Uuid::new_v4();
    let started_at = Utc::now();
    info!(%run_id, backend = backend.id(), personas = personas.len(), "Survey run started");

    let mut responses = Vec::with_capacity(personas.len());
    let mut cancelled = false;

    for persona in personas {
        if cancel.is_cancelled() {
            info!(%run_id, collected = responses.len(), "Survey run cancelled");
            cancelled = true;
            break;
        }

        let result = backend.respond(persona, question).await;
        ledger.record(&result.backend_id, result.cost_usd, result.tokens);

        if !result.success {
            warn!(
                persona_id = persona.id(),
                backend = %result.backend_id,
                error = result.error.as_deref().unwrap_or_default(),
                "Persona response failed"
            );
        }

        responses.push(SurveyResponse {
            persona_id: persona.id(),
            persona: persona.clone(),
            question: question.to_string(),
            response: result.text,
            success: result.success,
            cost_usd: result.cost_usd,
            tokens_used: result.tokens,
            backend_id: result.backend_id,
            error: result.error,
            created_at: Utc::now(),
        });
    }

    let total = responses.len();
    let successful = responses.iter().filter(|r| r.success).count();
    let total_cost_usd: f64 = responses.iter().map(|r| r.cost_usd).sum();
    let total_tokens: u64 = responses.iter().map(|r| u64::from(r.tokens_used)).sum();

    let summary = RunSummary {
        run_id,
        question: question.to_string(),
        requested: personas.len(),
        total,
        successful,
        success_rate: if total == 0 {
            0.0
        } else {
            successful as f64 / total as f64
        },
        total_cost_usd,
        total_cost_jpy: total_cost_usd * USD_TO_JPY,
        total_tokens,
        backend_id: backend.id().to_string(),
        cancelled,
        started_at,
        finished_at: Utc::now(),
    };

    info!(
        %run_id,
        total,
        successful,
        cost_usd = total_cost_usd,
        cancelled,
        "Survey run finished"
    );

    Ok(SurveyRun { responses, summary })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::SimulationBackend;
    use crate::testing::human;
    use std::time::Duration;

    fn simulation() -> SimulationBackend {
        SimulationBackend::new().with_delay(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_empty_batch_is_rejected() {
        let mut ledger = CostLedger::new();
        let err = run_survey(&[], "Q?", &simulation(), &mut ledger, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ListeningError::EmptyBatch));
        assert_eq!(ledger.request_count(), 0);
    }

    #[tokio::test]
    async fn test_blank_question_is_rejected() {
        let mut ledger = CostLedger::new();
        let err = run_survey(
            &[human(1, 30)],
            "   ",
            &simulation(),
            &mut ledger,
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ListeningError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_simulation_run_is_all_successful_and_free() {
        let personas: Vec<_> = (1..=4).map(|id| human(id, 20 + id * 15)).collect();
        let mut ledger = CostLedger::new();
        let run = run_survey(
            &personas,
            "Q?",
            &simulation(),
            &mut ledger,
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(run.summary.total, 4);
        assert_eq!(run.summary.successful, 4);
        assert_eq!(run.summary.success_rate, 1.0);
        assert_eq!(run.summary.total_cost_usd, 0.0);
        assert!(!run.summary.cancelled);
        assert_eq!(ledger.request_count(), 4);
    }

    #[tokio::test]
    async fn test_pre_cancelled_run_returns_nothing() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let mut ledger = CostLedger::new();
        let run = run_survey(&[human(1, 30)], "Q?", &simulation(), &mut ledger, &cancel)
            .await
            .unwrap();

        assert!(run.responses.is_empty());
        assert!(run.summary.cancelled);
        assert_eq!(run.summary.success_rate, 0.0);
        assert_eq!(ledger.request_count(), 0);
    }
}
