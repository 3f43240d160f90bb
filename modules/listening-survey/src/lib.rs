//! Virtual survey core: weighted persona sampling plus a uniform response
//! backend that drives either a language model or a scripted simulation.

pub mod backend;
pub mod charts;
pub mod export;
pub mod insight;
pub mod ledger;
pub mod orchestrator;
pub mod questions;
pub mod sampler;
pub mod session;
pub mod summary;
pub mod tables;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod weighted;

pub use backend::{
    build_backend, BackendConfig, ModelBackend, ResponseBackend, ResponseResult, Segment,
    SimulationBackend, UsageSource,
};
pub use ledger::{BackendUsage, CostLedger, CostSummary};
pub use orchestrator::{run_survey, RunSummary, SurveyRun};
pub use sampler::PersonaSampler;
pub use session::SurveySession;
pub use weighted::WeightedCategory;
