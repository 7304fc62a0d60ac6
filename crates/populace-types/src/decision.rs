//! Structured decision analysis consumed by the reaction simulator.
//!
//! Produced upstream by the decision analyzer (or supplied by a caller)
//! and treated as read-only by the simulation pipeline.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::RiskLevel;

/// Behavioral-economics interpretation of one business decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DecisionAnalysis {
    /// Decision category (pricing, product, marketing, ...).
    pub decision_type: String,
    /// Main factors that will drive reactions.
    pub key_factors: Vec<String>,
    /// Demographic segments most affected.
    #[serde(default)]
    pub target_demographics: Vec<String>,
    /// Psychological triggers at play (loss aversion, status, ...).
    pub psychological_triggers: Vec<String>,
    /// Scenario text keyed by reaction direction.
    #[serde(default)]
    pub potential_reactions: BTreeMap<String, String>,
    /// Measurable changes extracted from the decision.
    #[serde(default)]
    #[ts(type = "Record<string, unknown>")]
    pub decision_parameters: BTreeMap<String, serde_json::Value>,
    /// Assessed risk level.
    #[serde(default)]
    pub risk_level: RiskLevel,
    /// Analyzer confidence in `[0.0, 1.0]`.
    #[serde(default)]
    pub confidence_score: f64,
    /// Free-text explanation of the analysis.
    #[serde(default)]
    pub reasoning: String,
}
