//! Run-level report and counters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::decision::DecisionAnalysis;
use crate::ids::RunId;
use crate::result::PopulationResult;

/// Counters collected while a population is run through the simulator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RunStats {
    /// External language-model calls issued.
    pub external_calls: u64,
    /// Reactions served from the cache.
    pub cache_hits: u64,
    /// Fallback reactions produced after a failure.
    pub fallbacks: u64,
    /// Batches processed.
    pub batches: u64,
    /// Wall-clock duration of the run in milliseconds.
    pub elapsed_ms: u64,
}

/// Everything produced by one end-to-end simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SimulationReport {
    /// Unique identifier of the run.
    pub run_id: RunId,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run finished.
    pub finished_at: DateTime<Utc>,
    /// Analysis the population reacted to.
    pub decision_analysis: DecisionAnalysis,
    /// Aggregated population result.
    pub results: PopulationResult,
    /// Counters for the run.
    pub stats: RunStats,
}
