//! Reduction of per-individual reactions into a [`PopulationResult`].

use populace_types::{
    BehavioralSegments, DecisionAnalysis, PopulationResult, PredictedOutcomes, Reaction,
    ReactionHistogram, ReactionType, RevenueImpact, RiskLevel,
};

use crate::error::EngineError;

/// Strength above which a reaction counts as strong.
const STRONG_THRESHOLD: f64 = 0.7;

/// Lower bound (inclusive) of the moderate strength band.
const MODERATE_THRESHOLD: f64 = 0.3;

/// Percentage a reaction type must exceed to dominate the sentiment insight.
const CONSENSUS_PERCENT: f64 = 60.0;

/// Likelihood above which an individual is considered likely to act.
const ACTION_LIKELIHOOD: f64 = 0.7;

/// Percentage of likely actors that triggers the action-potential insight.
const ACTION_PERCENT: f64 = 30.0;

/// Negative percentage that, with high risk, triggers the risk warning.
const RISK_NEGATIVE_PERCENT: f64 = 40.0;

/// Net sentiment beyond which revenue impact is no longer neutral.
const REVENUE_THRESHOLD: f64 = 0.2;

/// Aggregate a full reaction list against the analysis it answered.
///
/// # Errors
///
/// Returns [`EngineError::EmptyPopulation`] when `reactions` is empty.
pub fn aggregate(
    reactions: &[Reaction],
    analysis: &DecisionAnalysis,
) -> Result<PopulationResult, EngineError> {
    if reactions.is_empty() {
        return Err(EngineError::EmptyPopulation);
    }
    let total = u32::try_from(reactions.len())
        .map_err(|e| EngineError::InvalidInput(format!("too many reactions to aggregate: {e}")))?;
    let denominator = f64::from(total);

    let mut histogram = ReactionHistogram::default();
    let mut segments = BehavioralSegments::default();
    let mut strength_sum = 0.0;
    let mut positive_sum = 0.0;
    let mut negative_sum = 0.0;
    let mut likely_to_act: u32 = 0;

    for reaction in reactions {
        let strength = reaction.reaction_strength;
        histogram.record(reaction.reaction_type);
        strength_sum += strength;

        match reaction.reaction_type {
            ReactionType::Positive => {
                positive_sum += strength;
                bump_band(
                    strength,
                    &mut segments.strong_supporters,
                    &mut segments.moderate_supporters,
                );
            }
            ReactionType::Negative => {
                negative_sum += strength;
                bump_band(
                    strength,
                    &mut segments.strong_opponents,
                    &mut segments.moderate_opponents,
                );
            }
            ReactionType::Neutral => {
                segments.indifferent = segments.indifferent.saturating_add(1);
            }
        }

        if reaction.likelihood_to_act > ACTION_LIKELIHOOD {
            likely_to_act = likely_to_act.saturating_add(1);
        }
    }

    let net_sentiment = (positive_sum - negative_sum) / denominator;
    let key_insights = insights(&histogram, likely_to_act, total, analysis.risk_level);

    Ok(PopulationResult {
        total_population: total,
        reactions_summary: histogram,
        average_reaction_strength: round3(strength_sum / denominator),
        key_insights,
        behavioral_segments: segments,
        predicted_outcomes: predict_outcomes(net_sentiment),
    })
}

const fn bump_band(strength: f64, strong: &mut u32, moderate: &mut u32) {
    if strength > STRONG_THRESHOLD {
        *strong = strong.saturating_add(1);
    } else if strength >= MODERATE_THRESHOLD {
        *moderate = moderate.saturating_add(1);
    }
}

/// `count` as a percentage of `total`, computed so whole percentages are exact.
fn percent(count: u32, total: u32) -> f64 {
    f64::from(count) * 100.0 / f64::from(total)
}

fn insights(
    histogram: &ReactionHistogram,
    likely_to_act: u32,
    total: u32,
    risk: RiskLevel,
) -> Vec<String> {
    let positive_pct = percent(histogram.positive, total);
    let negative_pct = percent(histogram.negative, total);
    let mut insights = Vec::new();

    if positive_pct > CONSENSUS_PERCENT {
        insights.push(format!(
            "Strong overall support ({positive_pct:.1}% positive reactions)"
        ));
    } else if negative_pct > CONSENSUS_PERCENT {
        insights.push(format!(
            "Strong overall opposition ({negative_pct:.1}% negative reactions)"
        ));
    } else {
        insights.push("Mixed reactions with no clear consensus".to_owned());
    }

    let action_pct = percent(likely_to_act, total);
    if action_pct > ACTION_PERCENT {
        insights.push(format!(
            "High action potential: {action_pct:.1}% likely to act on their reaction"
        ));
    }

    if risk == RiskLevel::High && negative_pct > RISK_NEGATIVE_PERCENT {
        insights.push("⚠️ High-risk decision with significant negative sentiment".to_owned());
    }

    insights
}

fn predict_outcomes(net_sentiment: f64) -> PredictedOutcomes {
    let churn_risk = if net_sentiment < 0.0 {
        (net_sentiment.abs() * 30.0).clamp(0.0, 100.0)
    } else {
        0.0
    };
    let revenue_impact = if net_sentiment > REVENUE_THRESHOLD {
        RevenueImpact::Positive
    } else if net_sentiment < -REVENUE_THRESHOLD {
        RevenueImpact::Negative
    } else {
        RevenueImpact::Neutral
    };

    PredictedOutcomes {
        net_sentiment_score: round3(net_sentiment),
        predicted_adoption_rate: net_sentiment.mul_add(50.0, 50.0).clamp(0.0, 100.0),
        churn_risk,
        revenue_impact,
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
