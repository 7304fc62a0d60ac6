//! Enumeration types for the Populace simulation.
//!
//! Wire names are lowercase / `snake_case` so JSON produced by the API
//! matches what the dashboard and the language model prompts expect.
//! Request-side preference enums accept any unknown string as `mixed`,
//! and [`Region`] falls back to `us`, so malformed parameters never fail
//! population generation.

use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Individual attribute levels
// ---------------------------------------------------------------------------

/// A three-level trait value (tech-savviness, price-sensitivity).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum TraitLevel {
    /// Low.
    Low,
    /// Medium.
    Medium,
    /// High.
    High,
}

/// Innovation-adoption stage of an individual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum AdoptionStage {
    /// Adopts new products before most peers.
    Early,
    /// Adopts once a product is established.
    Mainstream,
    /// Adopts reluctantly, if at all.
    Late,
}

/// Lifestyle category of an individual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Lifestyle {
    /// City-dwelling professional.
    UrbanProfessional,
    /// Suburban household with family focus.
    SuburbanFamily,
    /// Rural, tradition-oriented.
    RuralTraditional,
    /// In education.
    Student,
    /// Retired.
    Retiree,
    /// Self-employed, venture-minded.
    Entrepreneur,
    /// Spending is tightly constrained.
    BudgetConscious,
    /// Premium-oriented spending.
    LuxuryOriented,
}

/// A core value tag held by an individual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum CoreValue {
    /// Financial and personal safety.
    Security,
    /// Accomplishment and success.
    Achievement,
    /// Ease and time savings.
    Convenience,
    /// Durable, well-made things.
    Quality,
    /// Social standing.
    Status,
    /// Family wellbeing.
    Family,
    /// Environmental impact.
    Environment,
    /// Novelty and progress.
    Innovation,
    /// Established ways of doing things.
    Tradition,
    /// Self-reliance.
    Independence,
    /// Belonging and local ties.
    Community,
    /// Physical and mental health.
    Health,
}

// ---------------------------------------------------------------------------
// Population parameter preferences
// ---------------------------------------------------------------------------

/// Requested income level for a generated population.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum IncomeLevel {
    /// 20k–40k base range.
    Low,
    /// 40k–80k base range.
    Middle,
    /// 80k–200k base range.
    High,
    /// 20k–150k base range.
    #[default]
    #[serde(other)]
    Mixed,
}

/// Requested value of a three-level trait, or `mixed` to let the sampler
/// draw one from demographic weighting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum TraitPreference {
    /// Force `low`.
    Low,
    /// Force `medium`.
    Medium,
    /// Force `high`.
    High,
    /// Sample from demographic weighting.
    #[default]
    #[serde(other)]
    Mixed,
}

impl TraitPreference {
    /// The forced level, or `None` for `mixed`.
    pub const fn fixed(self) -> Option<TraitLevel> {
        match self {
            Self::Low => Some(TraitLevel::Low),
            Self::Medium => Some(TraitLevel::Medium),
            Self::High => Some(TraitLevel::High),
            Self::Mixed => None,
        }
    }
}

/// Requested innovation-adoption stage, or `mixed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum AdoptionPreference {
    /// Force `early`.
    Early,
    /// Force `mainstream`.
    Mainstream,
    /// Force `late`.
    Late,
    /// Sample from age and tech-savviness.
    #[default]
    #[serde(other)]
    Mixed,
}

impl AdoptionPreference {
    /// The forced stage, or `None` for `mixed`.
    pub const fn fixed(self) -> Option<AdoptionStage> {
        match self {
            Self::Early => Some(AdoptionStage::Early),
            Self::Mainstream => Some(AdoptionStage::Mainstream),
            Self::Late => Some(AdoptionStage::Late),
            Self::Mixed => None,
        }
    }
}

/// Region key selecting the city list individuals are placed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum Region {
    /// European capitals and hubs.
    Europe,
    /// Asian metropolitan areas.
    Asia,
    /// A worldwide mix.
    Global,
    /// United States cities. Also the fallback for unknown keys.
    #[default]
    #[serde(other)]
    Us,
}

// ---------------------------------------------------------------------------
// Decision analysis and reactions
// ---------------------------------------------------------------------------

/// Assessed risk level of a business decision.
///
/// Deserialization ignores case and surrounding space; any other label
/// reads as [`RiskLevel::Medium`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum RiskLevel {
    /// Low risk.
    Low,
    /// Medium risk.
    #[default]
    Medium,
    /// High risk.
    High,
}

impl<'de> Deserialize<'de> for RiskLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Self::from_label(&label))
    }
}

impl RiskLevel {
    /// Parse a label, ignoring case. Unknown labels are medium.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "low" => Self::Low,
            "high" => Self::High,
            _ => Self::Medium,
        }
    }

    /// Wire name of the level.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Direction of one individual's reaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum ReactionType {
    /// Welcomes the decision.
    Positive,
    /// Opposes the decision.
    Negative,
    /// Indifferent or undecided.
    #[default]
    Neutral,
}

impl ReactionType {
    /// Parse a model-supplied label, ignoring case and surrounding space.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "positive" => Some(Self::Positive),
            "negative" => Some(Self::Negative),
            "neutral" => Some(Self::Neutral),
            _ => None,
        }
    }
}

/// Qualitative revenue-impact estimate for a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum RevenueImpact {
    /// Net sentiment above +0.2.
    Positive,
    /// Net sentiment below -0.2.
    Negative,
    /// Net sentiment within ±0.2.
    Neutral,
}
