//! End-to-end simulation service.
//!
//! Owns the completion model, prompt engine and both caches, and wires the
//! analyzer, population generator, batch orchestrator and aggregator into
//! the three operations the HTTP layer exposes.

use std::sync::Arc;

use chrono::Utc;
use populace_population::PopulationGenerator;
use populace_types::{
    DecisionAnalysis, Individual, PopulationParameters, RunId, SimulationReport,
};
use tracing::{info, warn};

use crate::aggregate::aggregate;
use crate::analyzer::DecisionAnalyzer;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::llm::CompletionModel;
use crate::orchestrator::BatchOrchestrator;
use crate::prompt::PromptEngine;
use crate::simulator::{ReactionCache, ReactionSimulator};

/// The simulation pipeline behind one completion model.
pub struct SimulationService<M> {
    model: Arc<M>,
    prompts: Arc<PromptEngine>,
    reaction_cache: Arc<ReactionCache>,
    analyzer: DecisionAnalyzer<M>,
    config: EngineConfig,
}

impl<M: CompletionModel> SimulationService<M> {
    /// Build the service, loading prompt templates per `config`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] for invalid settings and
    /// [`EngineError::Template`] when a template fails to load.
    pub fn new(model: Arc<M>, config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let prompts = Arc::new(PromptEngine::new(config.templates_dir.as_deref())?);
        let reaction_cache = Arc::new(ReactionCache::new(
            config.reaction_cache_capacity,
            config.cache_ttl,
        ));
        let analyzer = DecisionAnalyzer::new(Arc::clone(&model), Arc::clone(&prompts), &config);

        Ok(Self {
            model,
            prompts,
            reaction_cache,
            analyzer,
            config,
        })
    }

    /// Name of the completion model, for logging and health output.
    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Analyze a free-text decision.
    ///
    /// # Errors
    ///
    /// See [`DecisionAnalyzer::analyze`].
    pub async fn analyze_decision(&self, decision: &str) -> Result<DecisionAnalysis, EngineError> {
        self.analyzer.analyze(decision, None).await
    }

    /// Generate a population, capping `size` at the configured maximum.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidInput`] when `size` is zero.
    pub fn generate_population(
        &self,
        size: usize,
        params: PopulationParameters,
        seed: Option<u64>,
    ) -> Result<Vec<Individual>, EngineError> {
        if size == 0 {
            return Err(EngineError::InvalidInput(
                "population size must be at least 1".to_owned(),
            ));
        }
        let capped = size.min(self.config.max_population_size);
        if capped < size {
            warn!(
                requested = size,
                max = self.config.max_population_size,
                "population size capped"
            );
        }
        Ok(PopulationGenerator::new(params).generate_seeded(capped, seed))
    }

    /// Analyze a decision and simulate the population's reaction to it.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EmptyPopulation`] or
    /// [`EngineError::InvalidInput`] for missing inputs, and any error
    /// from the analysis step.
    pub async fn run_simulation(
        &self,
        decision: &str,
        population: &[Individual],
    ) -> Result<SimulationReport, EngineError> {
        if population.is_empty() {
            return Err(EngineError::EmptyPopulation);
        }
        let started_at = Utc::now();
        let analysis = self.analyze_decision(decision).await?;
        let mut report = self.simulate_with_analysis(population, analysis).await?;
        report.started_at = started_at;
        Ok(report)
    }

    /// Simulate the population against an analysis the caller already has.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EmptyPopulation`] for an empty population.
    pub async fn simulate_with_analysis(
        &self,
        population: &[Individual],
        analysis: DecisionAnalysis,
    ) -> Result<SimulationReport, EngineError> {
        let run_id = RunId::new();
        let started_at = Utc::now();
        info!(%run_id, individuals = population.len(), decision_type = %analysis.decision_type, "simulation run starting");

        // Fresh simulator per run so its counters describe this run alone.
        let simulator = ReactionSimulator::new(
            Arc::clone(&self.model),
            Arc::clone(&self.prompts),
            Arc::clone(&self.reaction_cache),
            &self.config,
        );
        let orchestrator = BatchOrchestrator::new(
            simulator,
            self.config.max_concurrent_calls,
            self.config.batch_pause,
        );

        let run = orchestrator
            .run(population, &analysis, self.config.default_batch_size)
            .await?;
        let results = aggregate(&run.reactions, &analysis)?;

        info!(
            %run_id,
            net_sentiment = results.predicted_outcomes.net_sentiment_score,
            fallbacks = run.stats.fallbacks,
            "simulation run finished"
        );

        Ok(SimulationReport {
            run_id,
            started_at,
            finished_at: Utc::now(),
            decision_analysis: analysis,
            results,
            stats: run.stats,
        })
    }
}
