//! Reaction simulation engine for the Populace workspace.
//!
//! Turns a business decision and a synthetic population into predicted
//! population-level outcomes:
//!
//! 1. [`analyzer`] interprets the decision text with a language model
//! 2. [`simulator`] predicts each individual's reaction (cached, paced,
//!    deadline-bounded, never failing)
//! 3. [`orchestrator`] drives the simulator over the population in batches
//! 4. [`aggregate`] reduces the reactions to a `PopulationResult`
//!
//! [`service::SimulationService`] wires the stages together behind an
//! injected [`llm::CompletionModel`].

pub mod aggregate;
pub mod analyzer;
pub mod cache;
pub mod config;
pub mod error;
pub mod llm;
pub mod orchestrator;
pub mod parse;
pub mod prompt;
pub mod service;
pub mod simulator;
pub mod stats;

pub use aggregate::aggregate;
pub use analyzer::{DecisionAnalyzer, decision_categories, fallback_analysis};
pub use cache::{TtlLruCache, fingerprint};
pub use config::{BackendType, EngineConfig, LlmBackendConfig};
pub use error::EngineError;
pub use llm::{CompletionModel, CompletionRequest, LlmBackend, create_backend};
pub use orchestrator::{BatchOrchestrator, BatchRun};
pub use prompt::{PromptEngine, RenderedPrompt};
pub use service::SimulationService;
pub use simulator::{ReactionCache, ReactionSimulator, fallback_reaction};
