use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::info;

/// Fixed USD → JPY rate used for display totals.
pub const USD_TO_JPY: f64 = 150.0;

/// Accumulated usage for one backend identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BackendUsage {
    pub cost_usd: f64,
    pub tokens: u64,
    pub requests: u64,
}

impl BackendUsage {
    fn add(&mut self, other: &BackendUsage) {
        self.cost_usd += other.cost_usd;
        self.tokens += other.tokens;
        self.requests += other.requests;
    }
}

/// Running spend and usage totals for a session. Append-only: there is no
/// way to subtract or reset a recorded request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CostLedger {
    total: BackendUsage,
    by_backend: BTreeMap<String, BackendUsage>,
}

impl CostLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one request. Negative or non-finite costs count as zero.
    pub fn record(&mut self, backend_id: &str, cost_usd: f64, tokens: u32) {
        let cost_usd = if cost_usd.is_finite() { cost_usd.max(0.0) } else { 0.0 };
        let entry = BackendUsage {
            cost_usd,
            tokens: u64::from(tokens),
            requests: 1,
        };
        self.total.add(&entry);
        self.by_backend
            .entry(backend_id.to_string())
            .or_default()
            .add(&entry);
    }

    /// Add every total from `other` into this ledger.
    pub fn merge(&mut self, other: &CostLedger) {
        self.total.add(&other.total);
        for (backend, usage) in &other.by_backend {
            self.by_backend.entry(backend.clone()).or_default().add(usage);
        }
    }

    pub fn total_cost_usd(&self) -> f64 {
        self.total.cost_usd
    }

    pub fn total_tokens(&self) -> u64 {
        self.total.tokens
    }

    pub fn request_count(&self) -> u64 {
        self.total.requests
    }

    pub fn usage_for(&self, backend_id: &str) -> Option<&BackendUsage> {
        self.by_backend.get(backend_id)
    }

    pub fn by_backend(&self) -> &BTreeMap<String, BackendUsage> {
        &self.by_backend
    }

    pub fn summary(&self) -> CostSummary {
        CostSummary {
            total_cost_usd: self.total.cost_usd,
            total_cost_jpy: self.total.cost_usd * USD_TO_JPY,
            total_tokens: self.total.tokens,
            requests: self.total.requests,
            cost_per_request: self.total.cost_usd / self.total.requests.max(1) as f64,
            by_backend: self.by_backend.clone(),
        }
    }

    pub fn log_status(&self) {
        info!(
            cost_usd = self.total.cost_usd,
            tokens = self.total.tokens,
            requests = self.total.requests,
            "Cost ledger"
        );
    }
}

/// Point-in-time view of a ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostSummary {
    pub total_cost_usd: f64,
    pub total_cost_jpy: f64,
    pub total_tokens: u64,
    pub requests: u64,
    pub cost_per_request: f64,
    pub by_backend: BTreeMap<String, BackendUsage>,
}

impl fmt::Display for CostSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n=== Cost Summary ===")?;
        writeln!(
            f,
            "Total cost:       ${:.6} (~{:.2} JPY)",
            self.total_cost_usd, self.total_cost_jpy
        )?;
        writeln!(f, "Total tokens:     {}", self.total_tokens)?;
        writeln!(f, "Requests:         {}", self.requests)?;
        writeln!(f, "Cost per request: ${:.6}", self.cost_per_request)?;
        if !self.by_backend.is_empty() {
            writeln!(f, "\nBy backend:")?;
            for (backend, usage) in &self.by_backend {
                writeln!(
                    f,
                    "  {backend}: ${:.6}, {} tokens, {} requests",
                    usage.cost_usd, usage.tokens, usage.requests
                )?;
            }
        }
        Ok(())
    }
}
