//! Shared type definitions for the Populace simulation.
//!
//! This crate is the single source of truth for all types used across the
//! Populace workspace. Types defined here flow downstream to `TypeScript`
//! via `ts-rs` for the dashboard.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for individuals and runs
//! - [`enums`] -- Attribute levels, parameter preferences, reaction types
//! - [`individual`] -- Synthetic individuals and generation parameters
//! - [`decision`] -- Structured decision analysis
//! - [`reaction`] -- Per-individual reactions
//! - [`result`] -- Population-level aggregates
//! - [`report`] -- Run report and counters

pub mod decision;
pub mod enums;
pub mod ids;
pub mod individual;
pub mod reaction;
pub mod report;
pub mod result;

// Re-export all public types at crate root for convenience.
pub use decision::DecisionAnalysis;
pub use enums::{
    AdoptionPreference, AdoptionStage, CoreValue, IncomeLevel, Lifestyle, ReactionType, Region,
    RevenueImpact, RiskLevel, TraitLevel, TraitPreference,
};
pub use ids::{IndividualId, RunId};
pub use individual::{Individual, MAX_VALUE_TAGS, PersonalityTraits, PopulationParameters};
pub use reaction::Reaction;
pub use report::{RunStats, SimulationReport};
pub use result::{BehavioralSegments, PopulationResult, PredictedOutcomes, ReactionHistogram};

#[cfg(test)]
mod tests {
    //! Integration tests for type exports and `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // Exporting writes the files under `bindings/` relative to the
        // crate root.
        use ts_rs::TS;

        let _ = crate::ids::IndividualId::export_all();
        let _ = crate::ids::RunId::export_all();

        let _ = crate::enums::TraitLevel::export_all();
        let _ = crate::enums::AdoptionStage::export_all();
        let _ = crate::enums::Lifestyle::export_all();
        let _ = crate::enums::CoreValue::export_all();
        let _ = crate::enums::IncomeLevel::export_all();
        let _ = crate::enums::TraitPreference::export_all();
        let _ = crate::enums::AdoptionPreference::export_all();
        let _ = crate::enums::Region::export_all();
        let _ = crate::enums::RiskLevel::export_all();
        let _ = crate::enums::ReactionType::export_all();
        let _ = crate::enums::RevenueImpact::export_all();

        let _ = crate::individual::Individual::export_all();
        let _ = crate::individual::PersonalityTraits::export_all();
        let _ = crate::individual::PopulationParameters::export_all();
        let _ = crate::decision::DecisionAnalysis::export_all();
        let _ = crate::reaction::Reaction::export_all();
        let _ = crate::result::PopulationResult::export_all();
        let _ = crate::result::ReactionHistogram::export_all();
        let _ = crate::result::BehavioralSegments::export_all();
        let _ = crate::result::PredictedOutcomes::export_all();
        let _ = crate::report::RunStats::export_all();
        let _ = crate::report::SimulationReport::export_all();
    }
}
