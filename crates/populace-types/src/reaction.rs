//! Per-individual reaction records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::ReactionType;
use crate::ids::IndividualId;

/// Predicted response of one individual to one decision analysis.
///
/// Created by the reaction simulator and never mutated afterwards.
/// `reaction_strength` and `likelihood_to_act` are always within
/// `[0.0, 1.0]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Reaction {
    /// The individual this reaction belongs to.
    pub individual_id: IndividualId,
    /// Direction of the reaction.
    pub reaction_type: ReactionType,
    /// How strongly the individual feels.
    pub reaction_strength: f64,
    /// Model-supplied explanation.
    pub reasoning: String,
    /// Semi-structured description of actions the individual may take.
    #[ts(type = "Record<string, unknown>")]
    pub behavioral_change: BTreeMap<String, serde_json::Value>,
    /// Probability the individual acts on the reaction.
    pub likelihood_to_act: f64,
}
