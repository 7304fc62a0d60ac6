//! Synthetic individuals and the parameters used to generate them.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{
    AdoptionPreference, AdoptionStage, CoreValue, IncomeLevel, Lifestyle, Region, TraitLevel,
    TraitPreference,
};
use crate::ids::IndividualId;

/// Maximum number of value tags an individual carries.
pub const MAX_VALUE_TAGS: usize = 5;

// ---------------------------------------------------------------------------
// Individual
// ---------------------------------------------------------------------------

/// One synthetic population member.
///
/// Immutable once generated. Attributes are correlated: income depends on
/// age, occupation on age and income, education on occupation and income,
/// and so on. See `populace-population` for the sampling rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Individual {
    /// Globally unique identifier.
    pub id: IndividualId,
    /// Age in years, within the requested bounds.
    pub age: u32,
    /// Yearly income.
    pub income: u32,
    /// City of residence.
    pub location: String,
    /// Occupation title.
    pub occupation: String,
    /// Highest education level.
    pub education: String,
    /// Comfort with technology.
    pub tech_savviness: TraitLevel,
    /// Sensitivity to price changes.
    pub price_sensitivity: TraitLevel,
    /// Innovation-adoption stage.
    pub innovation_adoption: AdoptionStage,
    /// Big Five personality scores.
    pub personality_traits: PersonalityTraits,
    /// Up to [`MAX_VALUE_TAGS`] distinct value tags.
    pub values: Vec<CoreValue>,
    /// Lifestyle category.
    pub lifestyle: Lifestyle,
}

/// Big Five personality scores, each in `[0.0, 1.0]` with two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PersonalityTraits {
    /// Curiosity and openness to new experiences.
    pub openness: f64,
    /// Organization and dependability.
    pub conscientiousness: f64,
    /// Sociability and assertiveness.
    pub extraversion: f64,
    /// Cooperativeness and warmth.
    pub agreeableness: f64,
    /// Emotional reactivity.
    pub neuroticism: f64,
}

impl PersonalityTraits {
    /// All five scores in canonical order with their names.
    pub const fn named(&self) -> [(&'static str, f64); 5] {
        [
            ("openness", self.openness),
            ("conscientiousness", self.conscientiousness),
            ("extraversion", self.extraversion),
            ("agreeableness", self.agreeableness),
            ("neuroticism", self.neuroticism),
        ]
    }
}

// ---------------------------------------------------------------------------
// PopulationParameters
// ---------------------------------------------------------------------------

/// Population-level parameters shared by every individual in one
/// generation call. Missing fields take the documented defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PopulationParameters {
    /// Minimum age (inclusive). Default 18.
    #[serde(default = "default_age_min")]
    pub age_min: u32,
    /// Maximum age (inclusive). Default 65.
    #[serde(default = "default_age_max")]
    pub age_max: u32,
    /// Requested income level. Default `mixed`.
    #[serde(default)]
    pub income_level: IncomeLevel,
    /// Region key for city selection. Default `us`.
    #[serde(default)]
    pub region: Region,
    /// Requested tech-savviness. Default `mixed`.
    #[serde(default)]
    pub tech_savvy: TraitPreference,
    /// Requested price-sensitivity. Default `mixed`.
    #[serde(default)]
    pub price_sensitive: TraitPreference,
    /// Requested innovation adoption. Default `mixed`.
    #[serde(default)]
    pub innovation: AdoptionPreference,
}

impl PopulationParameters {
    /// Age bounds as `(min, max)`, swapped if given in reverse order.
    pub const fn age_bounds(&self) -> (u32, u32) {
        if self.age_min <= self.age_max {
            (self.age_min, self.age_max)
        } else {
            (self.age_max, self.age_min)
        }
    }
}

impl Default for PopulationParameters {
    fn default() -> Self {
        Self {
            age_min: default_age_min(),
            age_max: default_age_max(),
            income_level: IncomeLevel::default(),
            region: Region::default(),
            tech_savvy: TraitPreference::default(),
            price_sensitive: TraitPreference::default(),
            innovation: AdoptionPreference::default(),
        }
    }
}

const fn default_age_min() -> u32 {
    18
}

const fn default_age_max() -> u32 {
    65
}
