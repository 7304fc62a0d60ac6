//! Population-level aggregates derived from a full set of reactions.
//!
//! Everything here is recomputed from scratch for each run. There is no
//! incremental update path.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{ReactionType, RevenueImpact};

/// Aggregated outcome of one population simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PopulationResult {
    /// Number of reactions aggregated.
    pub total_population: u32,
    /// Count of reactions by type.
    pub reactions_summary: ReactionHistogram,
    /// Mean reaction strength, rounded to three decimals.
    pub average_reaction_strength: f64,
    /// Human-readable insights, in a fixed order.
    pub key_insights: Vec<String>,
    /// Named segment counts.
    pub behavioral_segments: BehavioralSegments,
    /// Predicted business outcomes.
    pub predicted_outcomes: PredictedOutcomes,
}

/// Reaction counts by [`ReactionType`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ReactionHistogram {
    /// Positive reactions.
    pub positive: u32,
    /// Negative reactions.
    pub negative: u32,
    /// Neutral reactions.
    pub neutral: u32,
}

impl ReactionHistogram {
    /// Count one reaction of the given type.
    pub const fn record(&mut self, reaction_type: ReactionType) {
        match reaction_type {
            ReactionType::Positive => self.positive = self.positive.saturating_add(1),
            ReactionType::Negative => self.negative = self.negative.saturating_add(1),
            ReactionType::Neutral => self.neutral = self.neutral.saturating_add(1),
        }
    }
}

/// Individuals bucketed by reaction type and strength band.
///
/// Strong means strength above 0.7; moderate means 0.3 to 0.7 inclusive.
/// Weak positive or negative reactions fall in no bucket. Every neutral
/// reaction counts as indifferent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct BehavioralSegments {
    /// Positive with strength above 0.7.
    pub strong_supporters: u32,
    /// Positive with strength in `[0.3, 0.7]`.
    pub moderate_supporters: u32,
    /// Negative with strength above 0.7.
    pub strong_opponents: u32,
    /// Negative with strength in `[0.3, 0.7]`.
    pub moderate_opponents: u32,
    /// All neutral reactions.
    pub indifferent: u32,
}

/// Business outcomes predicted from net sentiment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PredictedOutcomes {
    /// Positive strength minus negative strength, over the population,
    /// rounded to three decimals.
    pub net_sentiment_score: f64,
    /// Percentage in `[0, 100]`.
    pub predicted_adoption_rate: f64,
    /// Percentage in `[0, 100]`; zero unless sentiment is negative.
    pub churn_risk: f64,
    /// Qualitative revenue direction.
    pub revenue_impact: RevenueImpact,
}
