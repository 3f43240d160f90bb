//! Survey runs end to end through the orchestrator with scripted backends.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use ai_client::{Provider, TokenUsage};
use async_trait::async_trait;
use listening_common::{Domain, ListeningError, Persona};
use listening_survey::testing::{human, ScriptedModel};
use listening_survey::{
    run_survey, CostLedger, ModelBackend, PersonaSampler, ResponseBackend, ResponseResult,
    SimulationBackend, UsageSource,
};
use tokio_util::sync::CancellationToken;

fn personas(n: u32) -> Vec<Persona> {
    (1..=n).map(|id| human(id, 20 + id)).collect()
}

#[tokio::test]
async fn responses_follow_persona_order() {
    let batch = PersonaSampler::new(Domain::Animals).generate(12).unwrap();
    let backend = SimulationBackend::new().with_delay(Duration::ZERO);
    let mut ledger = CostLedger::new();

    let run = run_survey(&batch, "Q?", &backend, &mut ledger, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(run.responses.len(), 12);
    for (persona, response) in batch.iter().zip(&run.responses) {
        assert_eq!(response.persona_id, persona.id());
        assert_eq!(&response.persona, persona);
        assert_eq!(response.question, "Q?");
    }
}

#[tokio::test]
async fn third_failure_does_not_stop_the_run() {
    let model = ScriptedModel::new(Provider::OpenAi, "Fine.")
        .with_usage(TokenUsage::new(30, 10))
        .with_cost(0.001)
        .failing_on(2);
    let backend = ModelBackend::new(Arc::new(model));
    let mut ledger = CostLedger::new();

    let run = run_survey(
        &personas(5),
        "Q?",
        &backend,
        &mut ledger,
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    let flags: Vec<bool> = run.responses.iter().map(|r| r.success).collect();
    assert_eq!(flags, vec![true, true, false, true, true]);
    assert_eq!(run.summary.successful, 4);
    assert!((run.summary.success_rate - 0.8).abs() < 1e-12);

    let failed = &run.responses[2];
    assert!(failed.response.starts_with("Error: "));
    assert_eq!(failed.cost_usd, 0.0);
    assert_eq!(failed.tokens_used, 0);
    assert!(failed.error.as_deref().unwrap().contains("scripted failure"));
}

#[tokio::test]
async fn ledger_matches_response_costs_and_is_additive() {
    let model = ScriptedModel::new(Provider::OpenAi, "Fine.")
        .with_usage(TokenUsage::new(20, 5))
        .with_cost(0.0025);
    let backend = ModelBackend::new(Arc::new(model));
    let batch = personas(4);

    let mut first = CostLedger::new();
    let run = run_survey(&batch, "Q?", &backend, &mut first, &CancellationToken::new())
        .await
        .unwrap();

    let summed: f64 = run.responses.iter().map(|r| r.cost_usd).sum();
    assert!((first.total_cost_usd() - summed).abs() < 1e-12);
    assert_eq!(first.total_tokens(), 100);
    assert_eq!(first.usage_for("openai").unwrap().requests, 4);

    let mut second = CostLedger::new();
    run_survey(&batch, "Q?", &backend, &mut second, &CancellationToken::new())
        .await
        .unwrap();

    let mut merged = first.clone();
    merged.merge(&second);
    assert!((merged.total_cost_usd() - 2.0 * first.total_cost_usd()).abs() < 1e-12);
    assert_eq!(merged.total_tokens(), 2 * first.total_tokens());
    assert_eq!(merged.request_count(), 8);
}

#[tokio::test]
async fn estimated_usage_is_labelled() {
    let backend = ModelBackend::new(Arc::new(ScriptedModel::new(Provider::Google, "abcdef")));
    let result = backend.respond(&human(1, 40), "abc").await;
    assert_eq!(result.usage_source, UsageSource::Estimated);
    assert_eq!(result.tokens, 1 + 2);
    assert_eq!(result.cost_usd, 0.0);
}

#[tokio::test]
async fn empty_batch_fails_before_any_call() {
    let model = Arc::new(ScriptedModel::new(Provider::OpenAi, "x"));
    let backend = ModelBackend::new(model.clone());
    let mut ledger = CostLedger::new();

    let err = run_survey(&[], "Q?", &backend, &mut ledger, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ListeningError::EmptyBatch));
    assert_eq!(model.calls(), 0);
}

/// Cancels the shared token after a fixed number of answers.
struct CancelAfter {
    limit: usize,
    seen: AtomicUsize,
    cancel: CancellationToken,
}

#[async_trait]
impl ResponseBackend for CancelAfter {
    fn id(&self) -> &str {
        "cancel-after"
    }

    async fn respond(&self, persona: &Persona, _question: &str) -> ResponseResult {
        if self.seen.fetch_add(1, Ordering::SeqCst) + 1 >= self.limit {
            self.cancel.cancel();
        }
        ResponseResult::succeeded(
            "cancel-after",
            format!("answer {}", persona.id()),
            0.01,
            3,
            UsageSource::Reported,
        )
    }
}

#[tokio::test]
async fn cancellation_returns_partial_results() {
    let cancel = CancellationToken::new();
    let backend = CancelAfter {
        limit: 3,
        seen: AtomicUsize::new(0),
        cancel: cancel.clone(),
    };
    let mut ledger = CostLedger::new();

    let run = run_survey(&personas(10), "Q?", &backend, &mut ledger, &cancel)
        .await
        .unwrap();

    assert!(run.summary.cancelled);
    assert_eq!(run.summary.requested, 10);
    assert_eq!(run.responses.len(), 3);
    assert_eq!(run.responses[2].response, "answer 3");
    assert_eq!(ledger.request_count(), 3);
    assert!((ledger.total_cost_usd() - 0.03).abs() < 1e-12);
}
